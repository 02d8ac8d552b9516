//! Favorite links between users and recipes.

use super::{FavoriteId, RecipeDetails, RecipeId, User, UserId};

/// A stored favorite. At most one exists per `(user_id, recipe_id)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Favorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub recipe_id: RecipeId,
}

/// A favorite with its owner and recipe loaded for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteDetails {
    pub id: FavoriteId,
    pub user: User,
    pub recipe: RecipeDetails,
}
