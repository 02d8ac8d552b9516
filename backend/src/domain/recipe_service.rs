//! Recipe use-cases other than listing and search.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use super::authorization::{Action, ensure_allowed};
use super::catalogue_errors::map_catalogue_error;
use super::ports::{CatalogueRepositoryError, CategoryRepository, RecipeRepository};
use super::{CategoryId, Error, Principal, RecipeDetails, RecipeDraft, RecipeId, RecipePatch};

fn recipe_not_found() -> Error {
    Error::not_found("recipe not found")
}

fn unknown_category() -> Error {
    Error::invalid_request("selected category does not exist")
        .with_details(json!({ "field": "category_id", "code": "unknown" }))
}

fn map_write_error(err: CatalogueRepositoryError) -> Error {
    match err {
        CatalogueRepositoryError::Dependency { .. } => unknown_category(),
        other => map_catalogue_error(other),
    }
}

/// Show plus admin-only writes over recipes.
#[derive(Clone)]
pub struct RecipeService {
    recipes: Arc<dyn RecipeRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl RecipeService {
    pub fn new(recipes: Arc<dyn RecipeRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { recipes, categories }
    }

    pub async fn show(&self, id: RecipeId) -> Result<RecipeDetails, Error> {
        self.recipes
            .find_by_id(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(recipe_not_found)
    }

    /// Create a recipe authored by the acting admin.
    pub async fn create(
        &self,
        principal: &Principal,
        draft: &RecipeDraft,
    ) -> Result<RecipeDetails, Error> {
        ensure_allowed(principal, Action::CreateRecipe)?;
        self.ensure_category_exists(draft.category_id).await?;
        let id = self
            .recipes
            .create(draft, principal.id())
            .await
            .map_err(map_write_error)?;
        info!(recipe_id = %id, author = %principal.id(), "recipe created");
        self.show(id).await
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: RecipeId,
        patch: &RecipePatch,
    ) -> Result<RecipeDetails, Error> {
        ensure_allowed(principal, Action::UpdateRecipe)?;
        if let Some(category_id) = patch.category_id {
            self.ensure_category_exists(category_id).await?;
        }
        if !patch.is_empty() {
            let updated = self
                .recipes
                .update(id, patch)
                .await
                .map_err(map_write_error)?;
            if !updated {
                return Err(recipe_not_found());
            }
        }
        self.show(id).await
    }

    pub async fn delete(&self, principal: &Principal, id: RecipeId) -> Result<(), Error> {
        ensure_allowed(principal, Action::DeleteRecipe)?;
        let deleted = self.recipes.delete(id).await.map_err(map_catalogue_error)?;
        if !deleted {
            return Err(recipe_not_found());
        }
        info!(recipe_id = %id, "recipe deleted");
        Ok(())
    }

    async fn ensure_category_exists(&self, id: Option<CategoryId>) -> Result<(), Error> {
        let Some(id) = id else {
            return Ok(());
        };
        self.categories
            .find_by_id(id)
            .await
            .map_err(map_catalogue_error)?
            .map(|_| ())
            .ok_or_else(unknown_category)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockCategoryRepository, MockRecipeRepository};
    use crate::domain::test_fixtures::{admin, category, member, recipe_details};
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> RecipeDraft {
        RecipeDraft::try_from_parts("Pancakes", None, "Flour", "Whisk", Some(CategoryId::new(1)))
            .expect("valid draft")
    }

    fn service(recipes: MockRecipeRepository, categories: MockCategoryRepository) -> RecipeService {
        RecipeService::new(Arc::new(recipes), Arc::new(categories))
    }

    #[rstest]
    #[tokio::test]
    async fn members_cannot_write_and_storage_is_untouched(draft: RecipeDraft) {
        let svc = service(MockRecipeRepository::new(), MockCategoryRepository::new());
        let principal = member(2);

        let outcomes = [
            svc.create(&principal, &draft).await.err(),
            svc.update(&principal, RecipeId::new(1), &RecipePatch::default())
                .await
                .err(),
            svc.delete(&principal, RecipeId::new(1)).await.err(),
        ];
        for error in outcomes {
            let error = error.expect("members are refused");
            assert_eq!(error.code(), ErrorCode::Forbidden);
            assert_eq!(
                error.details(),
                Some(&serde_json::json!({"reason": "admin_required"}))
            );
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_attributes_the_acting_admin(draft: RecipeDraft) {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_id()
            .returning(|id| Ok(Some(category(id.get(), "Breakfast"))));
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_create()
            .withf(|_, author| *author == admin().id())
            .times(1)
            .returning(|_, _| Ok(RecipeId::new(10)));
        recipes
            .expect_find_by_id()
            .with(eq(RecipeId::new(10)))
            .returning(|_| Ok(Some(recipe_details(10, "Pancakes", None))));

        let created = service(recipes, categories)
            .create(&admin(), &draft)
            .await
            .expect("admin may create");
        assert_eq!(created.recipe.id, RecipeId::new(10));
    }

    #[rstest]
    #[tokio::test]
    async fn create_rejects_unknown_categories(draft: RecipeDraft) {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(|_| Ok(None));
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_create().never();

        let error = service(recipes, categories)
            .create(&admin(), &draft)
            .await
            .expect_err("unknown category");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&serde_json::json!({"field": "category_id", "code": "unknown"}))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_recipe_is_not_found() {
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_update().returning(|_, _| Ok(false));
        let patch = RecipePatch::try_from_parts(Some("Crepes"), None, None, None, None)
            .expect("valid patch");

        let error = service(recipes, MockCategoryRepository::new())
            .update(&admin(), RecipeId::new(99), &patch)
            .await
            .expect_err("missing recipe");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn clearing_the_category_skips_the_existence_check() {
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_update().returning(|_, _| Ok(true));
        recipes
            .expect_find_by_id()
            .returning(|id| Ok(Some(recipe_details(id.get(), "Pancakes", None))));
        let patch =
            RecipePatch::try_from_parts(None, None, None, None, Some(None)).expect("valid patch");

        let updated = service(recipes, MockCategoryRepository::new())
            .update(&admin(), RecipeId::new(1), &patch)
            .await
            .expect("update succeeds");
        assert!(updated.category.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn delete_of_missing_recipe_is_not_found() {
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_delete().returning(|_| Ok(false));
        let error = service(recipes, MockCategoryRepository::new())
            .delete(&admin(), RecipeId::new(5))
            .await
            .expect_err("missing recipe");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
