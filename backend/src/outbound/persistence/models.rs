//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types live next to the rows they read.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Category, CategoryId, Favorite, FavoriteId, Recipe, RecipeId, Role, StoredAccount, User,
    UserId,
};

use super::schema::{access_tokens, categories, favorites, recipes, users};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl UserRow {
    /// Convert into a domain account. Unknown roles are rejected.
    pub(crate) fn into_stored(self) -> Result<StoredAccount, String> {
        let role: Role = self
            .role
            .parse()
            .map_err(|_| format!("user {} has unknown role {}", self.id, self.role))?;
        Ok(StoredAccount {
            user: User {
                id: UserId::new(self.id),
                name: self.name,
                email: self.email,
                role,
            },
            password_hash: self.password_hash,
        })
    }

    pub(crate) fn into_user(self) -> Result<User, String> {
        self.into_stored().map(|stored| stored.user)
    }
}

/// Insertable struct for creating accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

/// Insertable struct for issued tokens.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = access_tokens)]
pub(crate) struct NewAccessTokenRow<'a> {
    pub user_id: i64,
    pub token_hash: &'a str,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// Row struct for reading from the categories table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: i64,
    pub name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub(crate) struct NewCategoryRow<'a> {
    pub name: &'a str,
}

/// Row struct for reading from the recipes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub category_id: Option<i64>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Self {
            id: RecipeId::new(row.id),
            title: row.title,
            description: row.description,
            ingredients: row.ingredients,
            instructions: row.instructions,
            category_id: row.category_id.map(CategoryId::new),
            user_id: UserId::new(row.user_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub ingredients: &'a str,
    pub instructions: &'a str,
    pub category_id: Option<i64>,
    pub user_id: i64,
}

/// Partial recipe update. `None` skips a column; `Some(None)` writes NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
pub(crate) struct RecipeChangeset<'a> {
    pub title: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub ingredients: Option<&'a str>,
    pub instructions: Option<&'a str>,
    pub category_id: Option<Option<i64>>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the favorites table.
#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FavoriteRow {
    pub id: i64,
    pub user_id: i64,
    pub recipe_id: i64,
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Self {
            id: FavoriteId::new(row.id),
            user_id: UserId::new(row.user_id),
            recipe_id: RecipeId::new(row.recipe_id),
        }
    }
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = favorites)]
pub(crate) struct NewFavoriteRow {
    pub user_id: i64,
    pub recipe_id: i64,
}
