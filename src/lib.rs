/// TabFrame - In-Memory Columnar Tables
///
/// A columnar table of named, typed columns with total value coercion,
/// relational filtering, decimal-accurate column arithmetic, stable
/// multi-key sorting and grouping by composite key.

pub mod error;
pub mod element;
pub mod column;
pub mod expr;
pub mod sort;
pub mod table;
pub mod group;
pub mod records;

pub use error::{Result, TableError};
pub use element::{DataType, Element, INT_NAN, STRING_NAN};
pub use column::{Column, ColumnData};
pub use expr::{ArithmeticOperator, FilterValue, RelationalOperator};
pub use sort::{SortKey, SortOrder};
pub use table::{Predicate, RowValues, Schema, Table};
pub use records::{Orient, RecordOptions, INDEX_HEADER};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_complete_workflow() {
        let _ = env_logger::builder().is_test(true).try_init();

        // Load an order sheet the way a delimited-text reader hands it over
        let rows = vec![
            vec!["product", "quantity", "price", "shipped"],
            vec!["Widget", "10", "9.99", "true"],
            vec!["Gadget", "5", "19.99", "false"],
            vec!["Doohickey", "15", "4.99", "true"],
            vec!["Gizmo", "?", "12.5", "0"],
        ];
        let types = [DataType::String, DataType::Int, DataType::Float, DataType::Bool];
        let mut table = Table::load_records(&rows, None, &types).unwrap();
        assert_eq!(table.size(), (4, 4));

        // Derive a total column
        let total = table
            .column("quantity")
            .unwrap()
            .arithmetic(ArithmeticOperator::Multiplication, table.column("price").unwrap())
            .unwrap();
        table.add_col("total", total, None).unwrap();
        assert_eq!(
            table.column("total").unwrap().records(),
            vec!["99.9", "99.95", "74.85", "NaN"]
        );

        // Add a late order by name
        let mut row = HashMap::new();
        row.insert("product".to_string(), Element::from("Sprocket"));
        row.insert("quantity".to_string(), Element::from(2));
        row.insert("price".to_string(), Element::from(1.25));
        table.set(table.nrows(), row).unwrap();
        assert_eq!(table.nrows(), 5);
        assert!(!table.cell(4, "shipped").unwrap().as_bool());

        // Shipped orders over 50, most valuable first
        let mut big = table
            .filter(&[
                Predicate::new("shipped", RelationalOperator::Equal, true),
                Predicate::new("total", RelationalOperator::GreaterThan, 50),
            ])
            .unwrap();
        big.arrange(&[SortKey::descending("total")]).unwrap();
        assert_eq!(big.column("product").unwrap().records(), vec!["Widget", "Doohickey"]);

        // Group by shipping state and hand the groups to a writer as text
        let groups = table.groups(&["shipped"]).unwrap();
        assert_eq!(groups["true"].nrows(), 2);
        assert_eq!(groups["false"].nrows(), 3);

        let text = groups["false"].records(RecordOptions::rows().with_index(true));
        assert_eq!(text[0], vec!["Index", "product", "quantity", "price", "shipped", "total"]);
        assert_eq!(text[1], vec!["1", "Gadget", "5", "19.99", "false", "99.95"]);
        assert_eq!(text[3][1], "Sprocket");
    }

    #[test]
    fn test_groups_by_age() {
        let table = Table::from_data(vec![
            ("name", ColumnData::from(vec!["a", "b", "c"])),
            ("age", ColumnData::from(vec![20i64, 30, 20])),
        ])
        .unwrap();

        let groups = table.groups(&["age"]).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["20"].column("name").unwrap().records(), vec!["a", "c"]);
        assert_eq!(groups["30"].column("name").unwrap().records(), vec!["b"]);
        for group in groups.values() {
            assert_eq!(group.names(), vec!["name", "age"]);
        }
    }

    #[test]
    fn test_groups_partition_every_row() {
        let colors: Vec<&str> = (0..10).map(|i| if i % 3 == 0 { "red" } else { "blue" }).collect();
        let ids: Vec<i64> = (0..10).collect();
        let table = Table::from_data(vec![
            ("color", ColumnData::from(colors)),
            ("id", ColumnData::from(ids)),
        ])
        .unwrap();

        let groups = table.groups(&["color"]).unwrap();
        assert_eq!(groups.len(), 2);

        let mut seen: Vec<i64> = groups
            .values()
            .flat_map(|g| g.column("id").unwrap().ints())
            .collect();
        seen.sort();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_arrange_single_key() {
        let mut table = Table::from_data(vec![("n", ColumnData::from(vec![3i64, 1, 2]))]).unwrap();
        table.arrange(&[SortKey::ascending("n")]).unwrap();
        assert_eq!(table.column("n").unwrap().ints(), vec![1, 2, 3]);

        table.arrange(&[SortKey::descending("n")]).unwrap();
        assert_eq!(table.column("n").unwrap().ints(), vec![3, 2, 1]);
    }

    #[test]
    fn test_filter_less_than_complements_greater_or_equal() {
        let values = vec![5i64, INT_NAN, -2, 7, 3, INT_NAN, 4];
        let column = Column::from_values("v", DataType::Int, values.clone());

        let below = column.filter_positions(RelationalOperator::LessThan, &FilterValue::from(4)).unwrap();
        let above = column
            .filter_positions(RelationalOperator::GreaterOrEqual, &FilterValue::from(4))
            .unwrap();

        assert_eq!(below, vec![2, 4]);
        assert!(below.iter().all(|i| !above.contains(i)));
        let present = values.iter().filter(|&&v| v != INT_NAN).count();
        assert_eq!(below.len() + above.len(), present);
    }

    #[test]
    fn test_text_round_trip() {
        let table = Table::from_data(vec![
            ("city", ColumnData::from(vec!["Oslo", "", "Rome"])),
            ("pop", ColumnData::from(vec![709_000i64, INT_NAN, 2_873_000])),
            ("area", ColumnData::from(vec![454.0, 0.1, f64::NAN])),
            ("capital", ColumnData::from(vec![true, false, true])),
        ])
        .unwrap();

        let text = table.records(RecordOptions::rows());
        let rebuilt = Table::load_records(&text, None, &table.types()).unwrap();
        assert_eq!(rebuilt, table);
    }
}
