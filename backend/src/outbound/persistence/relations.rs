//! Batched relation loading for recipe and favorite reads.
//!
//! Pages are small, so relations are fetched with one `IN (...)` query per
//! table rather than per row.

use std::collections::{HashMap, HashSet};

use diesel::dsl::count;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::CatalogueRepositoryError;
use crate::domain::{Category, Recipe, RecipeDetails, User};

use super::diesel_error_mapping::map_catalogue_diesel_error;
use super::models::{CategoryRow, RecipeRow, UserRow};
use super::schema::{categories, favorites, users};

fn unique<T: Copy + Eq + std::hash::Hash>(ids: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

/// Load users by id, keyed by raw id.
pub(crate) async fn load_users(
    conn: &mut AsyncPgConnection,
    ids: impl Iterator<Item = i64>,
) -> Result<HashMap<i64, User>, CatalogueRepositoryError> {
    let ids = unique(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<UserRow> = users::table
        .filter(users::id.eq_any(&ids))
        .select(UserRow::as_select())
        .load(&mut *conn)
        .await
        .map_err(map_catalogue_diesel_error)?;
    rows.into_iter()
        .map(|row| {
            row.into_user()
                .map(|user| (user.id.get(), user))
                .map_err(CatalogueRepositoryError::query)
        })
        .collect()
}

async fn load_categories(
    conn: &mut AsyncPgConnection,
    ids: Vec<i64>,
) -> Result<HashMap<i64, Category>, CatalogueRepositoryError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<CategoryRow> = categories::table
        .filter(categories::id.eq_any(&ids))
        .select(CategoryRow::as_select())
        .load(&mut *conn)
        .await
        .map_err(map_catalogue_diesel_error)?;
    Ok(rows.into_iter().map(|row| (row.id, row.into())).collect())
}

async fn load_favorite_counts(
    conn: &mut AsyncPgConnection,
    recipe_ids: &[i64],
) -> Result<HashMap<i64, u64>, CatalogueRepositoryError> {
    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let counts: Vec<(i64, i64)> = favorites::table
        .filter(favorites::recipe_id.eq_any(recipe_ids))
        .group_by(favorites::recipe_id)
        .select((favorites::recipe_id, count(favorites::id)))
        .load(&mut *conn)
        .await
        .map_err(map_catalogue_diesel_error)?;
    Ok(counts
        .into_iter()
        .map(|(recipe_id, total)| (recipe_id, u64::try_from(total).unwrap_or_default()))
        .collect())
}

/// Attach category, creator, and favorite count to each row, keeping order.
pub(crate) async fn load_recipe_details(
    conn: &mut AsyncPgConnection,
    rows: Vec<RecipeRow>,
) -> Result<Vec<RecipeDetails>, CatalogueRepositoryError> {
    let recipe_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let categories = load_categories(conn, unique(rows.iter().filter_map(|row| row.category_id))).await?;
    let creators = load_users(conn, rows.iter().map(|row| row.user_id)).await?;
    let counts = load_favorite_counts(conn, &recipe_ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let category = row.category_id.and_then(|id| categories.get(&id).cloned());
            let creator = creators.get(&row.user_id).cloned();
            let favorited_by_count = counts.get(&row.id).copied().unwrap_or_default();
            RecipeDetails {
                recipe: Recipe::from(row),
                category,
                creator,
                favorited_by_count,
            }
        })
        .collect())
}
