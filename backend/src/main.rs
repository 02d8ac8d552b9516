//! Backend entry-point: loads settings, prepares storage, and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use recipe_catalogue::inbound::http::health::HealthState;
use recipe_catalogue::outbound::keto::{KetoHttpIdentity, KetoHttpSource};
use recipe_catalogue::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use recipe_catalogue::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let keto = KetoHttpSource::new(
        settings.keto_base_url()?,
        settings.keto_timeout(),
        KetoHttpIdentity {
            host: settings.keto_host().to_owned(),
            api_key: settings.keto_api_key.clone(),
        },
    )
    .wrap_err("failed to build keto client")?;

    let mut config = ServerConfig::new(settings.bind_addr()?, Arc::new(keto))
        .with_demo_data(settings.seed_demo_data);
    if let Some(database_url) = settings.database_url() {
        let applied = run_pending_migrations(database_url)
            .await
            .wrap_err("failed to apply migrations")?;
        info!(applied, "database schema up to date");
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    server.await?;
    Ok(())
}
