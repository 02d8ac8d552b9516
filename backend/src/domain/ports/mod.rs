//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Services depend only on these traits. Outbound adapters implement them
//! for PostgreSQL, for the in-process store, and for the keto upstream.

mod macros;
pub(crate) use macros::define_port_error;

mod access_token_repository;
mod catalogue_error;
mod category_repository;
mod favorite_repository;
mod keto_recipe_source;
mod password_hasher;
mod recipe_repository;
mod user_repository;

pub use access_token_repository::AccessTokenRepository;
pub use catalogue_error::CatalogueRepositoryError;
pub use category_repository::CategoryRepository;
pub use favorite_repository::FavoriteRepository;
pub use keto_recipe_source::{KetoCategoryId, KetoRecipeSource, KetoSourceError};
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use recipe_repository::{RecipeExportRow, RecipeQuery, RecipeRepository};
pub use user_repository::{AccountRepositoryError, UserRepository};

#[cfg(test)]
pub use access_token_repository::MockAccessTokenRepository;
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
#[cfg(test)]
pub use favorite_repository::MockFavoriteRepository;
#[cfg(test)]
pub use keto_recipe_source::MockKetoRecipeSource;
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
