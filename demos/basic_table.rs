/// Basic Table Operations Example
///
/// This example demonstrates:
/// - Building a table from typed vectors
/// - Appending, updating and reading rows
/// - Adding, renaming and dropping columns
/// - Extracting the contents as text

use tabframe::{ColumnData, Element, RecordOptions, Table};
use std::collections::HashMap;

fn print_table(table: &Table) {
    for row in table.records(RecordOptions::rows().with_index(true)) {
        println!("   {}", row.join("\t"));
    }
    println!();
}

fn main() -> tabframe::Result<()> {
    env_logger::init();
    println!("=== TabFrame Basic Table Example ===\n");

    // 1. Create a table
    println!("1. Creating table...");
    let mut users = Table::from_data(vec![
        ("id", ColumnData::from(vec![1i64, 2, 3])),
        ("name", ColumnData::from(vec!["Alice", "Bob", "Charlie"])),
        ("age", ColumnData::from(vec!["30", "unknown", "25"])),
    ])?;
    println!("   {} rows x {} columns\n", users.nrows(), users.ncols());
    print_table(&users);

    // 2. Convert a text column
    println!("2. Converting 'age' to int...");
    let mut age = users.column("age")?.clone();
    age.set_type(tabframe::DataType::Int);
    users.add_col("age", age, None)?;
    println!("   Bob's age is missing: {}\n", users.cell(1, "age")?.is_nan());

    // 3. Append a row by name
    println!("3. Appending a row...");
    let mut row = HashMap::new();
    row.insert("id".to_string(), Element::from(4));
    row.insert("name".to_string(), Element::from("Diana"));
    users.set(users.nrows(), row)?;
    print_table(&users);

    // 4. Update a row in place
    println!("4. Updating Bob...");
    users.set(1, vec![Element::from(2), Element::from("Robert"), Element::from("41")])?;
    println!("   Row 1: {:?}\n", users.row(1)?);

    // 5. Column edits
    println!("5. Adding, renaming and dropping columns...");
    users.add_col("active", vec![true, false], Some(Element::from(true)))?;
    users.rename(vec![("name", "full_name")]);
    users.drop_cols(&["id"]);
    println!("   Schema: {:?}\n", users.schema());
    print_table(&users);

    println!("=== Example Complete ===");
    Ok(())
}
