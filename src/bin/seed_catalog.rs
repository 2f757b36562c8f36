//! Load the default product catalog into the diary database

use caldiary::config;
use caldiary::db::{migrations, seed, Database};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = config::database_path();
    println!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&db_path)?;
    database.with_conn(migrations::run_migrations)?;

    let report = database.with_conn_mut(seed::seed_default_catalog)?;
    println!("Catalog seeded:");
    println!("  Added:   {}", report.added);
    println!("  Skipped: {}", report.skipped);
    println!("  Total:   {}", report.total);

    Ok(())
}
