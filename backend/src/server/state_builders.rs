//! Builders for HTTP state ports.

use std::sync::Arc;

use recipe_catalogue::domain::ports::KetoRecipeSource;
use recipe_catalogue::domain::{CatalogueSeeder, SeedError, SeedReport};
use recipe_catalogue::inbound::http::state::HttpStatePorts;
use recipe_catalogue::outbound::memory::InMemoryCatalogue;
use recipe_catalogue::outbound::persistence::{
    DbPool, DieselAccessTokenRepository, DieselCategoryRepository, DieselFavoriteRepository,
    DieselRecipeRepository, DieselUserRepository,
};
use recipe_catalogue::outbound::security::Argon2PasswordHasher;
use tracing::info;

use super::ServerConfig;

fn memory_ports(keto: Arc<dyn KetoRecipeSource>) -> HttpStatePorts {
    let store = Arc::new(InMemoryCatalogue::new());
    HttpStatePorts {
        users: store.clone(),
        tokens: store.clone(),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        categories: store.clone(),
        recipes: store.clone(),
        favorites: store,
        keto,
    }
}

fn diesel_ports(pool: &DbPool, keto: Arc<dyn KetoRecipeSource>) -> HttpStatePorts {
    HttpStatePorts {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        tokens: Arc::new(DieselAccessTokenRepository::new(pool.clone())),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        categories: Arc::new(DieselCategoryRepository::new(pool.clone())),
        recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
        favorites: Arc::new(DieselFavoriteRepository::new(pool.clone())),
        keto,
    }
}

/// Select Diesel adapters when a pool is configured, otherwise a fresh
/// in-memory store.
pub(super) fn build_ports(config: &ServerConfig) -> HttpStatePorts {
    match &config.db_pool {
        Some(pool) => diesel_ports(pool, config.keto.clone()),
        None => {
            info!("no database configured; using the in-memory catalogue");
            memory_ports(config.keto.clone())
        }
    }
}

/// Apply the demo dataset through the same ports the handlers use.
pub(super) async fn seed_demo_data(ports: &HttpStatePorts) -> Result<SeedReport, SeedError> {
    CatalogueSeeder::new(
        ports.users.clone(),
        ports.categories.clone(),
        ports.recipes.clone(),
        ports.favorites.clone(),
        ports.hasher.clone(),
    )
    .seed()
    .await
}
