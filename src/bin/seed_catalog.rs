//! Maintenance binary that migrates the database and seeds the base
//! category taxonomy, optionally with demo data for local development.

use anyhow::{Context, Result};
use aromara::{config::ConfigLoader, db, seeds, telemetry};
use clap::Parser;
use migration::{Migrator, MigratorTrait};

#[derive(Parser, Debug)]
#[command(
    name = "seed_catalog",
    about = "Run migrations and seed the Aromara catalog"
)]
struct Args {
    /// Also create a demo supplier, buyer, products, and a sample inquiry
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loader = ConfigLoader::new();
    let config = loader.load().context("loading configuration")?;

    telemetry::init_tracing(&config).context("initializing telemetry")?;

    let db = db::init_pool(&config)
        .await
        .context("initializing database connection pool")?;

    Migrator::up(&db, None)
        .await
        .context("running migrations")?;

    seeds::seed_categories(&db)
        .await
        .context("seeding categories")?;

    if args.demo {
        seeds::seed_demo_data(&db)
            .await
            .context("seeding demo data")?;
    }

    println!("Seeding completed for profile '{}'.", config.profile);

    Ok(())
}
