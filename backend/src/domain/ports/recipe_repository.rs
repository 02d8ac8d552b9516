//! Port for recipe persistence, querying, and export.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::{
    CategoryId, RecipeDetails, RecipeDraft, RecipeId, RecipePatch, RecipePredicate, TitleSort,
    UserId,
};

use super::CatalogueRepositoryError;

/// A filtered, ordered, paginated recipe query.
///
/// Without a title sort, adapters order by id so pages stay stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeQuery {
    pub predicate: RecipePredicate,
    pub sort: Option<TitleSort>,
    pub page: PageRequest,
}

/// One flattened row of the CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeExportRow {
    pub id: RecipeId,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub category_name: Option<String>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Run a query and return one page plus the total match count.
    async fn find_page(
        &self,
        query: &RecipeQuery,
    ) -> Result<Page<RecipeDetails>, CatalogueRepositoryError>;

    /// Fetch a recipe with relations loaded.
    async fn find_by_id(&self, id: RecipeId)
    -> Result<Option<RecipeDetails>, CatalogueRepositoryError>;

    /// Every recipe filed under a category, ordered by id.
    async fn list_by_category(
        &self,
        id: CategoryId,
    ) -> Result<Vec<RecipeDetails>, CatalogueRepositoryError>;

    /// Insert a recipe authored by `author`.
    async fn create(
        &self,
        draft: &RecipeDraft,
        author: UserId,
    ) -> Result<RecipeId, CatalogueRepositoryError>;

    /// Apply a partial update. Returns `false` when the recipe does not exist.
    async fn update(&self, id: RecipeId, patch: &RecipePatch)
    -> Result<bool, CatalogueRepositoryError>;

    /// Delete a recipe and its favorites. Returns `false` when it does not
    /// exist.
    async fn delete(&self, id: RecipeId) -> Result<bool, CatalogueRepositoryError>;

    /// Up to `limit` export rows with ids greater than `after`, ordered by id.
    async fn export_batch(
        &self,
        after: Option<RecipeId>,
        limit: u32,
    ) -> Result<Vec<RecipeExportRow>, CatalogueRepositoryError>;
}
