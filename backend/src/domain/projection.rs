//! External representations of catalogue entities.
//!
//! Projections only reshape data that is already loaded. A relation that was
//! not loaded renders as `null`.

use serde::Serialize;

use super::{Category, FavoriteDetails, RecipeDetails, Role, User};

/// `{id, name}` rendering of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub id: i64,
    pub name: String,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.get(),
            name: category.name.clone(),
        }
    }
}

/// `{id, name}` rendering of a user embedded in a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummaryView {
    pub id: i64,
    pub name: String,
}

impl From<&User> for UserSummaryView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name.clone(),
        }
    }
}

/// `{id, name, email}` rendering of a user embedded in a favorite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserContactView {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserContactView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// The caller's own account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for AccountView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Full recipe rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeView {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub category: Option<CategoryView>,
    pub creator: Option<UserSummaryView>,
    pub favorited_by_count: u64,
}

impl From<&RecipeDetails> for RecipeView {
    fn from(details: &RecipeDetails) -> Self {
        let recipe = &details.recipe;
        Self {
            id: recipe.id.get(),
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            category: details.category.as_ref().map(CategoryView::from),
            creator: details.creator.as_ref().map(UserSummaryView::from),
            favorited_by_count: details.favorited_by_count,
        }
    }
}

/// `{id, user, recipe}` rendering of a favorite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteView {
    pub id: i64,
    pub user: UserContactView,
    pub recipe: RecipeView,
}

impl From<&FavoriteDetails> for FavoriteView {
    fn from(details: &FavoriteDetails) -> Self {
        Self {
            id: details.id.get(),
            user: UserContactView::from(&details.user),
            recipe: RecipeView::from(&details.recipe),
        }
    }
}
