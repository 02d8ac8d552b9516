//! Port for favorite persistence.
//!
//! Adapters must enforce uniqueness of `(user_id, recipe_id)` at the storage
//! boundary and surface violations as [`CatalogueRepositoryError::Duplicate`].
use async_trait::async_trait;

use crate::domain::{Favorite, FavoriteDetails, FavoriteId, FavoriteScope, RecipeId, UserId};

use super::CatalogueRepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Favorites visible within `scope`, ordered by id, with relations loaded.
    async fn list(&self, scope: FavoriteScope)
    -> Result<Vec<FavoriteDetails>, CatalogueRepositoryError>;

    /// Fetch a favorite by identifier.
    async fn find_by_id(&self, id: FavoriteId) -> Result<Option<Favorite>, CatalogueRepositoryError>;

    /// Fetch a favorite with relations loaded.
    async fn find_details(
        &self,
        id: FavoriteId,
    ) -> Result<Option<FavoriteDetails>, CatalogueRepositoryError>;

    /// Whether `user_id` already favorited `recipe_id`.
    async fn exists(&self, user_id: UserId, recipe_id: RecipeId)
    -> Result<bool, CatalogueRepositoryError>;

    /// Insert a favorite.
    async fn create(
        &self,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<Favorite, CatalogueRepositoryError>;

    /// Delete a favorite. Returns `false` when it does not exist.
    async fn delete(&self, id: FavoriteId) -> Result<bool, CatalogueRepositoryError>;
}
