//! Seed a PostgreSQL database with the demo recipe catalogue.
//!
//! The database URL comes from `--database-url` or, when omitted, from the
//! `RECIPES_DATABASE_URL` setting. Pending migrations are applied first.

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use recipe_catalogue::domain::{CatalogueSeeder, SeedReport};
use recipe_catalogue::outbound::persistence::{
    DbPool, DieselCategoryRepository, DieselFavoriteRepository, DieselRecipeRepository,
    DieselUserRepository, PoolConfig, run_pending_migrations,
};
use recipe_catalogue::outbound::security::Argon2PasswordHasher;
use recipe_catalogue::settings::AppSettings;

#[derive(Debug, Parser)]
#[command(name = "seed-catalogue", about = "Seed the demo recipe catalogue")]
struct Args {
    /// PostgreSQL connection string.
    #[arg(long)]
    database_url: Option<String>,
}

fn database_url(args: Args) -> Result<String> {
    if let Some(url) = args.database_url {
        return Ok(url);
    }
    let settings = AppSettings::load_from_iter([OsString::from("seed-catalogue")])
        .wrap_err("failed to load settings")?;
    settings
        .database_url()
        .map(str::to_owned)
        .ok_or_else(|| eyre!("no database configured; pass --database-url"))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let url = database_url(Args::parse())?;
    run_pending_migrations(&url)
        .await
        .wrap_err("failed to apply migrations")?;
    let pool = DbPool::new(PoolConfig::new(url.as_str()).with_max_size(2))
        .await
        .wrap_err("failed to build database pool")?;

    let seeder = CatalogueSeeder::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselCategoryRepository::new(pool.clone())),
        Arc::new(DieselRecipeRepository::new(pool.clone())),
        Arc::new(DieselFavoriteRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::new()),
    );
    match seeder.seed().await.wrap_err("seeding failed")? {
        SeedReport::Skipped => info!("catalogue already seeded"),
        SeedReport::Applied {
            users,
            categories,
            recipes,
            favorites,
        } => info!(users, categories, recipes, favorites, "catalogue seeded"),
    }
    Ok(())
}
