/// Grouping Example
///
/// This example demonstrates:
/// - Grouping rows by one and by several columns
/// - Summarising each group
/// - Concatenating groups back into one table

use tabframe::{ColumnData, SortKey, Table};

fn main() -> tabframe::Result<()> {
    env_logger::init();
    println!("=== TabFrame Grouping Example ===\n");

    let sales = Table::from_data(vec![
        ("region", ColumnData::from(vec!["north", "south", "north", "east", "south", "north"])),
        ("year", ColumnData::from(vec![2023i64, 2023, 2024, 2024, 2024, 2023])),
        ("amount", ColumnData::from(vec![120.0, 80.5, 99.9, 45.0, 60.25, 10.0])),
    ])?;

    // 1. One key column
    println!("1. Grouping by region...");
    let by_region = sales.groups(&["region"])?;
    let mut regions: Vec<&String> = by_region.keys().collect();
    regions.sort();
    for region in regions {
        let group = &by_region[region];
        let total: f64 = group.column("amount")?.floats().iter().sum();
        println!("   {:<6} rows={} total={:.2}", region, group.nrows(), total);
    }
    println!();

    // 2. Composite key
    println!("2. Grouping by region and year...");
    let by_region_year = sales.groups(&["region", "year"])?;
    let mut keys: Vec<&String> = by_region_year.keys().collect();
    keys.sort();
    for key in keys {
        println!("   {:<10} rows={}", key, by_region_year[key].nrows());
    }
    println!();

    // 3. Reassemble
    println!("3. Concatenating the groups back together...");
    let mut combined = Table::default();
    for group in by_region.values() {
        if combined.ncols() == 0 {
            combined = group.clone();
        } else {
            combined.concat(group, false)?;
        }
    }
    combined.arrange(&[SortKey::ascending("region"), SortKey::ascending("year")])?;
    println!("   {} rows, same as the source: {}", combined.nrows(), combined.nrows() == sales.nrows());

    println!("\n=== Example Complete ===");
    Ok(())
}
