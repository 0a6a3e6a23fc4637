//! # Seed Data Generator
//!
//! Populates the database with demo numbering schemes for development.
//!
//! ## Usage
//! ```bash
//! # Seed into the default development database
//! cargo run -p aurum-db --bin seed
//!
//! # Specify database path
//! cargo run -p aurum-db --bin seed -- --db ./data/aurum.db
//! ```
//!
//! ## Generated Schemes
//! Creates a small set of realistic scheme configurations:
//! - "Retail Invoices" (default): monthly reset, `INV-{year}{month}-{seq}`
//! - "Wholesale Orders": yearly reset, `WS/{year}/{seq}`
//! - "Credit Notes": never resets, plain running counter
//! - "Daily Counter": daily reset, full date in the number
//!
//! After seeding, a preview of each scheme is printed so the operator can
//! eyeball the formats before wiring them into invoice flows.

use std::env;

use aurum_core::{NewScheme, ResetFrequency, DEFAULT_TENANT_ID};
use aurum_db::{Database, DbConfig};

/// Demo scheme configurations: (name, prefix, format, frequency, default).
const SCHEMES: &[(&str, &str, &str, ResetFrequency, bool)] = &[
    (
        "Retail Invoices",
        "INV-",
        "{prefix}{year}{month:02d}-{sequence:04d}",
        ResetFrequency::Monthly,
        true,
    ),
    (
        "Wholesale Orders",
        "WS/",
        "{prefix}{year}/{sequence:05d}",
        ResetFrequency::Yearly,
        false,
    ),
    (
        "Credit Notes",
        "CN-",
        "{prefix}{sequence:06d}",
        ResetFrequency::Never,
        false,
    ),
    (
        "Daily Counter",
        "D",
        "{prefix}{year}{month:02d}{day:02d}-{sequence:03d}",
        ResetFrequency::Daily,
        false,
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./aurum_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Aurum Billing Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./aurum_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Aurum Billing Seed Data Generator");
    println!("====================================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing schemes
    let existing = db.schemes().list(DEFAULT_TENANT_ID).await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} schemes", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Create schemes
    println!();
    println!("Creating schemes...");

    let mut created = Vec::new();
    for (name, prefix, format, frequency, is_default) in SCHEMES {
        let new = NewScheme {
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            name: name.to_string(),
            prefix: prefix.to_string(),
            suffix: String::new(),
            number_format: format.to_string(),
            sequence_reset_frequency: *frequency,
            is_active: true,
            is_default: *is_default,
        };

        match db.schemes().create(&new).await {
            Ok(scheme) => {
                println!("  ✓ {} ({})", scheme.name, scheme.number_format);
                created.push(scheme);
            }
            Err(e) => {
                eprintln!("  ✗ Failed to create {}: {}", name, e);
            }
        }
    }

    // Show previews
    println!();
    println!("Previewing next numbers...");
    for scheme in &created {
        let preview = db.schemes().preview(&scheme.id, 3).await?;
        println!("  {}: {}", scheme.name, preview.numbers.join(", "));
    }

    if let Some(default) = db.schemes().get_default(DEFAULT_TENANT_ID).await? {
        println!();
        println!("Default scheme: {}", default.name);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
