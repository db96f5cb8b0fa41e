//! # Default Catalog Seeder
//!
//! Writes the default cuts into a SQLite database or a JSON catalog file.
//!
//! ## Usage
//! ```bash
//! # Seed ./cleaver_dev.db (default)
//! cargo run -p cleaver-db --bin seed
//!
//! # Specify database path
//! cargo run -p cleaver-db --bin seed -- --db ./data/cleaver.db
//!
//! # Seed a JSON catalog file instead
//! cargo run -p cleaver-db --bin seed -- --catalog ./data/catalog.json
//! ```
//!
//! Existing data is never overwritten.

use std::env;
use std::path::PathBuf;

use cleaver_db::seed::default_catalog;
use cleaver_db::{migrations, Database, DbConfig, JsonCatalogStore};

enum Target {
    Database(String),
    CatalogFile(PathBuf),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut target = Target::Database(String::from("./cleaver_dev.db"));

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    target = Target::Database(args[i + 1].clone());
                    i += 1;
                }
            }
            "--catalog" | "-c" => {
                if i + 1 < args.len() {
                    target = Target::CatalogFile(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Cleaver Default Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>        Database file path (default: ./cleaver_dev.db)");
                println!("  -c, --catalog <PATH>   Seed a JSON catalog file instead");
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    let catalog = default_catalog();

    println!("🌱 Cleaver Catalog Seeder");
    println!("=========================");

    match target {
        Target::Database(db_path) => {
            println!("Database: {}", db_path);
            println!();

            let db = Database::new(DbConfig::new(&db_path)).await?;
            if !db.health_check().await {
                eprintln!("✗ Database did not answer");
                std::process::exit(1);
            }
            println!("✓ Connected to database");
            let (total, applied) = migrations::migration_status(db.pool()).await?;
            println!("✓ Migrations applied ({}/{})", applied, total);

            let existing = db.products().count().await?;
            if existing > 0 {
                println!("⚠ Database already has {} products", existing);
                println!("  Skipping seed to avoid overwriting prices.");
                return Ok(());
            }

            db.products().replace_all(&catalog).await?;
            db.close().await;
        }
        Target::CatalogFile(path) => {
            println!("Catalog file: {}", path.display());
            println!();

            let store = JsonCatalogStore::new(&path).seed_default(false);
            if let Some(existing) = store.read()? {
                println!("⚠ Catalog file already has {} products", existing.len());
                println!("  Skipping seed to avoid overwriting prices.");
                return Ok(());
            }

            store.write(&catalog)?;
        }
    }

    println!("✓ Seeded {} products", catalog.len());
    for product in catalog.products() {
        println!("  {}  {:<20} {:>8}/kg", product.code, product.name, product.price_per_kg.to_string());
    }

    Ok(())
}
