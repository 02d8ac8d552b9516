//! PostgreSQL-backed `FavoriteRepository`.
//!
//! `(user_id, recipe_id)` uniqueness is enforced by the
//! `favorites_user_id_recipe_id_key` constraint; violations surface as
//! [`CatalogueRepositoryError::Duplicate`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{CatalogueRepositoryError, FavoriteRepository};
use crate::domain::{Favorite, FavoriteDetails, FavoriteId, FavoriteScope, RecipeId, UserId};

use super::diesel_error_mapping::{catalogue_pool_error, map_catalogue_diesel_error};
use super::models::{FavoriteRow, NewFavoriteRow, RecipeRow};
use super::pool::DbPool;
use super::relations::{load_recipe_details, load_users};
use super::schema::{favorites, recipes};

/// Diesel-backed favorite repository.
#[derive(Clone)]
pub struct DieselFavoriteRepository {
    pool: DbPool,
}

impl DieselFavoriteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn attach_relations(
    conn: &mut AsyncPgConnection,
    rows: Vec<FavoriteRow>,
) -> Result<Vec<FavoriteDetails>, CatalogueRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let recipe_ids: Vec<i64> = rows.iter().map(|row| row.recipe_id).collect();
    let recipe_rows: Vec<RecipeRow> = recipes::table
        .filter(recipes::id.eq_any(&recipe_ids))
        .select(RecipeRow::as_select())
        .load(&mut *conn)
        .await
        .map_err(map_catalogue_diesel_error)?;
    let recipes = load_recipe_details(conn, recipe_rows).await?;
    let owners = load_users(conn, rows.iter().map(|row| row.user_id)).await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let user = owners.get(&row.user_id)?.clone();
            let recipe = recipes
                .iter()
                .find(|details| details.recipe.id.get() == row.recipe_id)?
                .clone();
            Some(FavoriteDetails {
                id: FavoriteId::new(row.id),
                user,
                recipe,
            })
        })
        .collect())
}

#[async_trait]
impl FavoriteRepository for DieselFavoriteRepository {
    async fn list(
        &self,
        scope: FavoriteScope,
    ) -> Result<Vec<FavoriteDetails>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let mut query = favorites::table
            .select(FavoriteRow::as_select())
            .order_by(favorites::id.asc())
            .into_boxed();
        if let FavoriteScope::OwnedBy(owner) = scope {
            query = query.filter(favorites::user_id.eq(owner.get()));
        }
        let rows: Vec<FavoriteRow> = query
            .load(&mut conn)
            .await
            .map_err(map_catalogue_diesel_error)?;
        attach_relations(&mut conn, rows).await
    }

    async fn find_by_id(&self, id: FavoriteId) -> Result<Option<Favorite>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let row: Option<FavoriteRow> = favorites::table
            .find(id.get())
            .select(FavoriteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_catalogue_diesel_error)?;
        Ok(row.map(Favorite::from))
    }

    async fn find_details(
        &self,
        id: FavoriteId,
    ) -> Result<Option<FavoriteDetails>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let row: Option<FavoriteRow> = favorites::table
            .find(id.get())
            .select(FavoriteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_catalogue_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(attach_relations(&mut conn, vec![row]).await?.pop())
    }

    async fn exists(
        &self,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        diesel::select(diesel::dsl::exists(
            favorites::table
                .filter(favorites::user_id.eq(user_id.get()))
                .filter(favorites::recipe_id.eq(recipe_id.get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_catalogue_diesel_error)
    }

    async fn create(
        &self,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<Favorite, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let row: FavoriteRow = diesel::insert_into(favorites::table)
            .values(&NewFavoriteRow {
                user_id: user_id.get(),
                recipe_id: recipe_id.get(),
            })
            .returning(FavoriteRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_catalogue_diesel_error)?;
        Ok(row.into())
    }

    async fn delete(&self, id: FavoriteId) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let deleted = diesel::delete(favorites::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_catalogue_diesel_error)?;
        Ok(deleted > 0)
    }
}
