//! Port for category persistence.
use async_trait::async_trait;

use crate::domain::{Category, CategoryId, CategoryName};

use super::CatalogueRepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Every category ordered by id.
    async fn list(&self) -> Result<Vec<Category>, CatalogueRepositoryError>;

    /// Fetch a category by identifier.
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, CatalogueRepositoryError>;

    /// Fetch a category by exact name.
    async fn find_by_name(
        &self,
        name: &CategoryName,
    ) -> Result<Option<Category>, CatalogueRepositoryError>;

    /// Insert a category. Name collisions yield
    /// [`CatalogueRepositoryError::Duplicate`].
    async fn create(&self, name: &CategoryName) -> Result<Category, CatalogueRepositoryError>;

    /// Rename a category. Returns `None` when it does not exist.
    async fn rename(
        &self,
        id: CategoryId,
        name: &CategoryName,
    ) -> Result<Option<Category>, CatalogueRepositoryError>;

    /// Delete a category. Returns `false` when it does not exist. Categories
    /// still referenced by recipes yield [`CatalogueRepositoryError::Dependency`].
    async fn delete(&self, id: CategoryId) -> Result<bool, CatalogueRepositoryError>;

    /// Number of recipes filed under the category.
    async fn count_recipes(&self, id: CategoryId) -> Result<u64, CatalogueRepositoryError>;
}
