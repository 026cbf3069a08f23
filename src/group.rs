/// TabFrame Grouping
///
/// Partitions a table by the composite text value of one or more columns.

use crate::element::DataType;
use crate::error::{Result, TableError};
use crate::expr::{ArithmeticOperator, FilterValue, RelationalOperator};
use crate::table::Table;
use std::collections::HashMap;

impl Table {
    /// Split the rows into groups keyed by the concatenated text of the
    /// named columns.
    ///
    /// Each group is an independent copy of the matching rows with every
    /// original column, in original order. Key parts are joined without a
    /// separator, so `("1", "23")` and `("12", "3")` share the key `"123"`.
    ///
    /// ```
    /// use tabframe::{ColumnData, Table};
    ///
    /// let table = Table::from_data(vec![
    ///     ("name", ColumnData::from(vec!["a", "b", "c"])),
    ///     ("age", ColumnData::from(vec![20i64, 30, 20])),
    /// ])
    /// .unwrap();
    ///
    /// let groups = table.groups(&["age"]).unwrap();
    /// assert_eq!(groups.len(), 2);
    /// assert_eq!(groups["20"].column("name").unwrap().records(), vec!["a", "c"]);
    /// assert_eq!(groups["30"].nrows(), 1);
    /// ```
    pub fn groups(&self, names: &[&str]) -> Result<HashMap<String, Table>> {
        let Some((first, rest)) = names.split_first() else {
            return Err(TableError::EmptyInput("groups needs at least one column".to_string()));
        };

        let mut key = self.column(first)?.clone();
        key.set_type(DataType::String);
        key.set_name(format!("_{}", first));
        for name in rest {
            let mut part = self.column(name)?.clone();
            part.set_type(DataType::String);
            key = key.arithmetic(ArithmeticOperator::Addition, &part)?;
        }

        let mut groups = HashMap::new();
        for value in key.records() {
            if groups.contains_key(&value) {
                continue;
            }
            let rows = key.filter_positions(RelationalOperator::Equal, &FilterValue::from(value.as_str()))?;
            groups.insert(value, self.subset(&rows)?);
        }
        log::debug!("grouped {} rows by {:?} into {} groups", self.nrows(), names, groups.len());
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnData;

    fn sales() -> Table {
        Table::from_data(vec![
            ("region", ColumnData::from(vec!["north", "south", "north", "south", "north"])),
            ("year", ColumnData::from(vec![2023i64, 2023, 2024, 2023, 2023])),
            ("paid", ColumnData::from(vec![true, false, true, true, false])),
            ("amount", ColumnData::from(vec![10.0, 20.5, 30.0, 5.5, 1.0])),
        ])
        .unwrap()
    }

    #[test]
    fn test_groups_single_column() {
        let groups = sales().groups(&["region"]).unwrap();
        assert_eq!(groups.len(), 2);

        let north = &groups["north"];
        assert_eq!(north.column("amount").unwrap().floats(), vec![10.0, 30.0, 1.0]);
        assert_eq!(north.names(), vec!["region", "year", "paid", "amount"]);
        assert_eq!(groups["south"].nrows(), 2);
    }

    #[test]
    fn test_groups_composite_key() {
        let groups = sales().groups(&["region", "year"]).unwrap();
        let mut keys: Vec<&str> = groups.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["north2023", "north2024", "south2023"]);
        assert_eq!(groups["north2023"].column("amount").unwrap().floats(), vec![10.0, 1.0]);
    }

    #[test]
    fn test_groups_bool_key() {
        let groups = sales().groups(&["paid", "region"]).unwrap();
        assert_eq!(groups["truenorth"].nrows(), 2);
        assert_eq!(groups["falsesouth"].nrows(), 1);
        assert_eq!(groups.values().map(Table::nrows).sum::<usize>(), 5);
    }

    #[test]
    fn test_groups_missing_key_value() {
        let table = Table::from_data(vec![
            ("k", ColumnData::from(vec!["a", "", "a", "null"])),
            ("v", ColumnData::from(vec![1i64, 2, 3, 4])),
        ])
        .unwrap();
        let groups = table.groups(&["k"]).unwrap();
        assert_eq!(groups["NaN"].column("v").unwrap().ints(), vec![2, 4]);
    }

    #[test]
    fn test_groups_errors() {
        let table = sales();
        assert!(matches!(table.groups(&[]), Err(TableError::EmptyInput(_))));
        assert_eq!(
            table.groups(&["region", "nope"]),
            Err(TableError::ColumnNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_groups_empty_table() {
        let table = Table::from_data(vec![("k", ColumnData::from(Vec::<i64>::new()))]).unwrap();
        assert!(table.groups(&["k"]).unwrap().is_empty());
    }
}
