//! In-process storage adapter.
//!
//! [`InMemoryCatalogue`] implements every repository port over one mutex
//! guarded state. It backs the server when no database URL is configured and
//! gives integration tests a real store without PostgreSQL. Uniqueness and
//! referential rules mirror the SQL schema: duplicate emails, category names,
//! token digests, and `(user, recipe)` favorites are rejected, categories
//! that still own recipes cannot be deleted, and deleting a recipe removes
//! its favorites.

mod accounts;
mod catalogue;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::domain::ports::{AccountRepositoryError, CatalogueRepositoryError};
use crate::domain::{
    Category, Favorite, FavoriteDetails, Recipe, RecipeDetails, StoredAccount, User, UserId,
};

/// Shared in-memory store. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryCatalogue {
    state: Arc<Mutex<CatalogueState>>,
    clock: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct CatalogueState {
    users: BTreeMap<i64, StoredAccount>,
    tokens: HashMap<String, UserId>,
    categories: BTreeMap<i64, Category>,
    recipes: BTreeMap<i64, Recipe>,
    favorites: BTreeMap<i64, Favorite>,
    next_user: i64,
    next_category: i64,
    next_recipe: i64,
    next_favorite: i64,
}

impl InMemoryCatalogue {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every new recipe with `now` instead of the wall clock.
    pub fn with_fixed_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.unwrap_or_else(Utc::now)
    }

    fn lock_catalogue(&self) -> Result<MutexGuard<'_, CatalogueState>, CatalogueRepositoryError> {
        self.state
            .lock()
            .map_err(|_| CatalogueRepositoryError::connection("in-memory store lock poisoned"))
    }

    fn lock_accounts(&self) -> Result<MutexGuard<'_, CatalogueState>, AccountRepositoryError> {
        self.state
            .lock()
            .map_err(|_| AccountRepositoryError::connection("in-memory store lock poisoned"))
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl CatalogueState {
    fn user(&self, id: UserId) -> Option<User> {
        self.users.get(&id.get()).map(|stored| stored.user.clone())
    }

    fn recipe_details(&self, recipe: &Recipe) -> RecipeDetails {
        let favorited_by_count = self
            .favorites
            .values()
            .filter(|favorite| favorite.recipe_id == recipe.id)
            .count() as u64;
        RecipeDetails {
            recipe: recipe.clone(),
            category: recipe
                .category_id
                .and_then(|id| self.categories.get(&id.get()).cloned()),
            creator: self.user(recipe.user_id),
            favorited_by_count,
        }
    }

    fn favorite_details(&self, favorite: &Favorite) -> Option<FavoriteDetails> {
        let user = self.user(favorite.user_id)?;
        let recipe = self.recipes.get(&favorite.recipe_id.get())?;
        Some(FavoriteDetails {
            id: favorite.id,
            user,
            recipe: self.recipe_details(recipe),
        })
    }
}
