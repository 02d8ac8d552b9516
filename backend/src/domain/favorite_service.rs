//! Favorite use-cases and the one-favorite-per-recipe guard.

use std::sync::Arc;

use tracing::info;

use super::authorization::{Action, FavoriteScope, ensure_allowed};
use super::catalogue_errors::{map_account_error, map_catalogue_error};
use super::ports::{CatalogueRepositoryError, FavoriteRepository, RecipeRepository, UserRepository};
use super::{
    Error, Favorite, FavoriteDetails, FavoriteId, Principal, RecipeId, User, UserId,
};

fn already_favorited() -> Error {
    Error::conflict("already favorited")
}

/// Enforces at most one favorite per `(user, recipe)` pair.
///
/// The existence check is a fast path. Concurrent duplicates are caught by
/// the storage uniqueness constraint and reported the same way.
#[derive(Clone)]
pub struct FavoriteUniquenessGuard {
    favorites: Arc<dyn FavoriteRepository>,
}

impl FavoriteUniquenessGuard {
    pub fn new(favorites: Arc<dyn FavoriteRepository>) -> Self {
        Self { favorites }
    }

    /// Create the favorite unless the pair already exists.
    ///
    /// # Errors
    /// `conflict` ("already favorited") when the pair exists; nothing is
    /// written in that case.
    pub async fn try_create(&self, user_id: UserId, recipe_id: RecipeId) -> Result<Favorite, Error> {
        let exists = self
            .favorites
            .exists(user_id, recipe_id)
            .await
            .map_err(map_catalogue_error)?;
        if exists {
            return Err(already_favorited());
        }
        self.favorites
            .create(user_id, recipe_id)
            .await
            .map_err(|err| match err {
                CatalogueRepositoryError::Duplicate { .. } => already_favorited(),
                other => map_catalogue_error(other),
            })
    }
}

/// Favorites as seen by users and admins.
#[derive(Clone)]
pub struct FavoriteService {
    favorites: Arc<dyn FavoriteRepository>,
    recipes: Arc<dyn RecipeRepository>,
    users: Arc<dyn UserRepository>,
    guard: FavoriteUniquenessGuard,
}

impl FavoriteService {
    pub fn new(
        favorites: Arc<dyn FavoriteRepository>,
        recipes: Arc<dyn RecipeRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        let guard = FavoriteUniquenessGuard::new(Arc::clone(&favorites));
        Self {
            favorites,
            recipes,
            users,
            guard,
        }
    }

    /// Favorites visible to `principal`: all for admins, own for users.
    ///
    /// # Errors
    /// `not_found` when the visible set is empty.
    pub async fn list(&self, principal: &Principal) -> Result<Vec<FavoriteDetails>, Error> {
        let scope = FavoriteScope::for_principal(principal);
        let favorites = self.favorites.list(scope).await.map_err(map_catalogue_error)?;
        if favorites.is_empty() {
            return Err(Error::not_found("no favorites found"));
        }
        Ok(favorites)
    }

    /// Favorite a recipe on behalf of the calling user.
    pub async fn add(
        &self,
        principal: &Principal,
        recipe_id: RecipeId,
    ) -> Result<FavoriteDetails, Error> {
        ensure_allowed(principal, Action::CreateFavorite)?;
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await
            .map_err(map_catalogue_error)?;
        if recipe.is_none() {
            return Err(Error::not_found("recipe not found"));
        }
        let favorite = self.guard.try_create(principal.id(), recipe_id).await?;
        info!(favorite_id = %favorite.id, user = %principal.id(), recipe = %recipe_id, "favorite added");
        self.favorites
            .find_details(favorite.id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::internal("favorite vanished after creation"))
    }

    /// Remove one of the caller's favorites.
    pub async fn remove(&self, principal: &Principal, id: FavoriteId) -> Result<(), Error> {
        let favorite = self
            .favorites
            .find_by_id(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found("favorite not found"))?;
        ensure_allowed(
            principal,
            Action::DeleteFavorite {
                owner: favorite.user_id,
            },
        )?;
        let deleted = self.favorites.delete(id).await.map_err(map_catalogue_error)?;
        if !deleted {
            return Err(Error::not_found("favorite not found"));
        }
        info!(favorite_id = %id, "favorite removed");
        Ok(())
    }

    /// An account and its favorites, for admins.
    pub async fn for_user(
        &self,
        principal: &Principal,
        user_id: UserId,
    ) -> Result<(User, Vec<FavoriteDetails>), Error> {
        ensure_allowed(principal, Action::ViewUserFavorites)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        let favorites = self
            .favorites
            .list(FavoriteScope::OwnedBy(user_id))
            .await
            .map_err(map_catalogue_error)?;
        Ok((user, favorites))
    }
}
