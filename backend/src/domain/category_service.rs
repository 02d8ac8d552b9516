//! Category use-cases.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use super::authorization::{Action, ensure_allowed};
use super::catalogue_errors::map_catalogue_error;
use super::ports::{CatalogueRepositoryError, CategoryRepository, RecipeRepository};
use super::{Category, CategoryId, CategoryName, Error, Principal, RecipeDetails};

fn category_not_found() -> Error {
    Error::not_found("category not found")
}

fn name_taken() -> Error {
    Error::conflict("category name already taken")
        .with_details(json!({ "field": "name", "code": "taken" }))
}

fn map_write_error(err: CatalogueRepositoryError) -> Error {
    match err {
        CatalogueRepositoryError::Duplicate { .. } => name_taken(),
        other => map_catalogue_error(other),
    }
}

/// Reads and admin-only writes over categories.
#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    recipes: Arc<dyn RecipeRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>, recipes: Arc<dyn RecipeRepository>) -> Self {
        Self { categories, recipes }
    }

    /// Every category. An empty catalogue is reported as `not_found`.
    pub async fn list(&self) -> Result<Vec<Category>, Error> {
        let categories = self.categories.list().await.map_err(map_catalogue_error)?;
        if categories.is_empty() {
            return Err(Error::not_found("no categories found"));
        }
        Ok(categories)
    }

    pub async fn show(&self, id: CategoryId) -> Result<Category, Error> {
        self.categories
            .find_by_id(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(category_not_found)
    }

    /// A category and every recipe filed under it.
    pub async fn recipes(&self, id: CategoryId) -> Result<(Category, Vec<RecipeDetails>), Error> {
        let category = self.show(id).await?;
        let recipes = self
            .recipes
            .list_by_category(id)
            .await
            .map_err(map_catalogue_error)?;
        Ok((category, recipes))
    }

    pub async fn create(&self, principal: &Principal, name: &CategoryName) -> Result<Category, Error> {
        ensure_allowed(principal, Action::CreateCategory)?;
        if self
            .categories
            .find_by_name(name)
            .await
            .map_err(map_catalogue_error)?
            .is_some()
        {
            return Err(name_taken());
        }
        let category = self.categories.create(name).await.map_err(map_write_error)?;
        info!(category_id = %category.id, "category created");
        Ok(category)
    }

    pub async fn rename(
        &self,
        principal: &Principal,
        id: CategoryId,
        name: &CategoryName,
    ) -> Result<Category, Error> {
        ensure_allowed(principal, Action::UpdateCategory)?;
        let existing = self
            .categories
            .find_by_name(name)
            .await
            .map_err(map_catalogue_error)?;
        if existing.is_some_and(|category| category.id != id) {
            return Err(name_taken());
        }
        self.categories
            .rename(id, name)
            .await
            .map_err(map_write_error)?
            .ok_or_else(category_not_found)
    }

    /// Delete a category that no recipe references.
    ///
    /// # Errors
    /// `conflict` while recipes are still filed under the category.
    pub async fn delete(&self, principal: &Principal, id: CategoryId) -> Result<(), Error> {
        ensure_allowed(principal, Action::DeleteCategory)?;
        let in_use = self
            .categories
            .count_recipes(id)
            .await
            .map_err(map_catalogue_error)?;
        if in_use > 0 {
            return Err(Error::conflict("category still has recipes")
                .with_details(json!({ "recipes": in_use })));
        }
        let deleted = self.categories.delete(id).await.map_err(|err| match err {
            CatalogueRepositoryError::Dependency { .. } => {
                Error::conflict("category still has recipes")
            }
            other => map_catalogue_error(other),
        })?;
        if !deleted {
            return Err(category_not_found());
        }
        info!(category_id = %id, "category deleted");
        Ok(())
    }
}
