/// Filtering and Sorting Example
///
/// This example demonstrates:
/// - Loading a table from rows of text
/// - Filtering with AND / OR predicates
/// - Predicates loaded from JSON
/// - Multi-key sorting and column arithmetic

use tabframe::{
    ArithmeticOperator, DataType, Predicate, RecordOptions, RelationalOperator, SortKey, Table,
};

fn print_table(table: &Table) {
    for row in table.records(RecordOptions::rows()) {
        println!("   {}", row.join("\t"));
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== TabFrame Filtering Example ===\n");

    let rows = vec![
        vec!["product", "category", "quantity", "price"],
        vec!["Widget", "tools", "10", "9.99"],
        vec!["Gadget", "toys", "5", "19.99"],
        vec!["Doohickey", "tools", "15", "4.99"],
        vec!["Thingamajig", "toys", "", "24.5"],
        vec!["Whatsit", "garden", "8", "12.0"],
    ];
    let types = [DataType::String, DataType::String, DataType::Int, DataType::Float];
    let mut products = Table::load_records(&rows, None, &types)?;
    print_table(&products);

    // 1. AND
    println!("1. Tools cheaper than 10...");
    let cheap_tools = products.filter(&[
        Predicate::new("category", RelationalOperator::Equal, "tools"),
        Predicate::new("price", RelationalOperator::LessThan, 10.0),
    ])?;
    print_table(&cheap_tools);

    // 2. OR
    println!("2. Toys, or anything whose name starts with 'W'...");
    let toys_or_w = products.filter(&[
        Predicate::new("category", RelationalOperator::Equal, "toys"),
        Predicate::new("product", RelationalOperator::StartsWith, "W").or(),
    ])?;
    print_table(&toys_or_w);

    // 3. Predicates from JSON
    println!("3. Predicates from JSON...");
    let json = r#"[{"column": "category", "operator": "NotIn", "value": ["toys"]}]"#;
    let predicates: Vec<Predicate> = serde_json::from_str(json)?;
    print_table(&products.filter(&predicates)?);

    // 4. Arithmetic
    println!("4. Adding a total column...");
    let total = products
        .column("quantity")?
        .arithmetic(ArithmeticOperator::Multiplication, products.column("price")?)?;
    products.add_col("total", total, None)?;
    print_table(&products);

    // 5. Sorting
    println!("5. Sorting by category, then total descending...");
    products.arrange(&[SortKey::ascending("category"), SortKey::descending("total")])?;
    print_table(&products);

    println!("=== Example Complete ===");
    Ok(())
}
