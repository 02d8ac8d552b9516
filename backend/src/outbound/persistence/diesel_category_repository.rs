//! PostgreSQL-backed `CategoryRepository`.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogueRepositoryError, CategoryRepository};
use crate::domain::{Category, CategoryId, CategoryName};

use super::diesel_error_mapping::{catalogue_pool_error, map_catalogue_diesel_error};
use super::models::{CategoryRow, NewCategoryRow};
use super::pool::DbPool;
use super::schema::{categories, recipes};

/// Diesel-backed category repository.
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let rows: Vec<CategoryRow> = categories::table
            .select(CategoryRow::as_select())
            .order_by(categories::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_catalogue_diesel_error)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let row: Option<CategoryRow> = categories::table
            .find(id.get())
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_catalogue_diesel_error)?;
        Ok(row.map(Category::from))
    }

    async fn find_by_name(
        &self,
        name: &CategoryName,
    ) -> Result<Option<Category>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let row: Option<CategoryRow> = categories::table
            .filter(categories::name.eq(name.as_str()))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_catalogue_diesel_error)?;
        Ok(row.map(Category::from))
    }

    async fn create(&self, name: &CategoryName) -> Result<Category, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let row: CategoryRow = diesel::insert_into(categories::table)
            .values(&NewCategoryRow {
                name: name.as_str(),
            })
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_catalogue_diesel_error)?;
        Ok(row.into())
    }

    async fn rename(
        &self,
        id: CategoryId,
        name: &CategoryName,
    ) -> Result<Option<Category>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let row: Option<CategoryRow> = diesel::update(categories::table.find(id.get()))
            .set((
                categories::name.eq(name.as_str()),
                categories::updated_at.eq(Utc::now()),
            ))
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_catalogue_diesel_error)?;
        Ok(row.map(Category::from))
    }

    async fn delete(&self, id: CategoryId) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let deleted = diesel::delete(categories::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_catalogue_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn count_recipes(&self, id: CategoryId) -> Result<u64, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let total: i64 = recipes::table
            .filter(recipes::category_id.eq(id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_catalogue_diesel_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}
