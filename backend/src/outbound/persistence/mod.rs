//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories only translate between Diesel rows and domain types. Rows
//! (`models.rs`) and table definitions (`schema.rs`) stay private to this
//! module. Connections come from a `bb8` pool through `diesel-async`.
//!
//! ```ignore
//! use recipe_catalogue::outbound::persistence::{DbPool, PoolConfig, DieselRecipeRepository};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/recipes")).await?;
//! let recipes = DieselRecipeRepository::new(pool);
//! ```

mod diesel_category_repository;
mod diesel_error_mapping;
mod diesel_favorite_repository;
mod diesel_recipe_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod relations;
mod schema;

pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_favorite_repository::DieselFavoriteRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_user_repository::{DieselAccessTokenRepository, DieselUserRepository};
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
