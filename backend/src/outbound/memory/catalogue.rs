//! Category, recipe, and favorite ports over the in-memory store.

use std::cmp::Ordering;

use async_trait::async_trait;
use pagination::Page;

use crate::domain::ports::{
    CatalogueRepositoryError, CategoryRepository, FavoriteRepository, RecipeExportRow,
    RecipeQuery, RecipeRepository,
};
use crate::domain::{
    Category, CategoryId, CategoryName, Favorite, FavoriteDetails, FavoriteId, FavoriteScope,
    Recipe, RecipeDetails, RecipeDocument, RecipeDraft, RecipeId, RecipePatch, TitleSort, UserId,
};

use super::{CatalogueState, InMemoryCatalogue, next_id};

#[async_trait]
impl CategoryRepository for InMemoryCatalogue {
    async fn list(&self) -> Result<Vec<Category>, CatalogueRepositoryError> {
        Ok(self.lock_catalogue()?.categories.values().cloned().collect())
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, CatalogueRepositoryError> {
        Ok(self.lock_catalogue()?.categories.get(&id.get()).cloned())
    }

    async fn find_by_name(
        &self,
        name: &CategoryName,
    ) -> Result<Option<Category>, CatalogueRepositoryError> {
        let state = self.lock_catalogue()?;
        Ok(state
            .categories
            .values()
            .find(|category| category.name == name.as_str())
            .cloned())
    }

    async fn create(&self, name: &CategoryName) -> Result<Category, CatalogueRepositoryError> {
        let mut state = self.lock_catalogue()?;
        ensure_unique_name(&state, name, None)?;
        let id = next_id(&mut state.next_category);
        let category = Category {
            id: CategoryId::new(id),
            name: name.as_str().to_owned(),
        };
        state.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn rename(
        &self,
        id: CategoryId,
        name: &CategoryName,
    ) -> Result<Option<Category>, CatalogueRepositoryError> {
        let mut state = self.lock_catalogue()?;
        ensure_unique_name(&state, name, Some(id))?;
        Ok(state.categories.get_mut(&id.get()).map(|category| {
            category.name = name.as_str().to_owned();
            category.clone()
        }))
    }

    async fn delete(&self, id: CategoryId) -> Result<bool, CatalogueRepositoryError> {
        let mut state = self.lock_catalogue()?;
        if count_in_category(&state, id) > 0 {
            return Err(CatalogueRepositoryError::dependency("recipes_category_id_fkey"));
        }
        Ok(state.categories.remove(&id.get()).is_some())
    }

    async fn count_recipes(&self, id: CategoryId) -> Result<u64, CatalogueRepositoryError> {
        Ok(count_in_category(&*self.lock_catalogue()?, id))
    }
}

fn ensure_unique_name(
    state: &CatalogueState,
    name: &CategoryName,
    except: Option<CategoryId>,
) -> Result<(), CatalogueRepositoryError> {
    let clash = state
        .categories
        .values()
        .any(|category| category.name == name.as_str() && Some(category.id) != except);
    if clash {
        Err(CatalogueRepositoryError::duplicate("categories_name_key"))
    } else {
        Ok(())
    }
}

fn count_in_category(state: &CatalogueState, id: CategoryId) -> u64 {
    state
        .recipes
        .values()
        .filter(|recipe| recipe.category_id == Some(id))
        .count() as u64
}

/// Same keys as the PostgreSQL adapter's C-collation sort: ASCII-folded bytes
/// first, then raw bytes. `lower()` under the C collation leaves non-ASCII
/// letters alone, so they are not folded here either.
fn compare_titles(a: &Recipe, b: &Recipe) -> Ordering {
    a.title
        .to_ascii_lowercase()
        .cmp(&b.title.to_ascii_lowercase())
        .then_with(|| a.title.cmp(&b.title))
}

fn ensure_category(
    state: &CatalogueState,
    id: Option<CategoryId>,
) -> Result<(), CatalogueRepositoryError> {
    match id {
        Some(id) if !state.categories.contains_key(&id.get()) => {
            Err(CatalogueRepositoryError::dependency("recipes_category_id_fkey"))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl RecipeRepository for InMemoryCatalogue {
    async fn find_page(
        &self,
        query: &RecipeQuery,
    ) -> Result<Page<RecipeDetails>, CatalogueRepositoryError> {
        let state = self.lock_catalogue()?;
        let mut matched: Vec<&Recipe> = state
            .recipes
            .values()
            .filter(|recipe| {
                let category_name = recipe
                    .category_id
                    .and_then(|id| state.categories.get(&id.get()))
                    .map(|category| category.name.as_str());
                query.predicate.matches(&RecipeDocument {
                    title: &recipe.title,
                    description: recipe.description.as_deref(),
                    ingredients: &recipe.ingredients,
                    instructions: &recipe.instructions,
                    category_name,
                })
            })
            .collect();
        match query.sort {
            Some(TitleSort::Ascending) => {
                matched.sort_by(|a, b| compare_titles(a, b).then(a.id.cmp(&b.id)));
            }
            Some(TitleSort::Descending) => {
                matched.sort_by(|a, b| compare_titles(b, a).then(a.id.cmp(&b.id)));
            }
            None => {}
        }
        let total = matched.len() as u64;
        let items = query
            .page
            .window(&matched)
            .into_iter()
            .map(|recipe| state.recipe_details(recipe))
            .collect();
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeDetails>, CatalogueRepositoryError> {
        let state = self.lock_catalogue()?;
        Ok(state
            .recipes
            .get(&id.get())
            .map(|recipe| state.recipe_details(recipe)))
    }

    async fn list_by_category(
        &self,
        id: CategoryId,
    ) -> Result<Vec<RecipeDetails>, CatalogueRepositoryError> {
        let state = self.lock_catalogue()?;
        Ok(state
            .recipes
            .values()
            .filter(|recipe| recipe.category_id == Some(id))
            .map(|recipe| state.recipe_details(recipe))
            .collect())
    }

    async fn create(
        &self,
        draft: &RecipeDraft,
        author: UserId,
    ) -> Result<RecipeId, CatalogueRepositoryError> {
        let created_at = self.now();
        let mut state = self.lock_catalogue()?;
        ensure_category(&state, draft.category_id)?;
        if !state.users.contains_key(&author.get()) {
            return Err(CatalogueRepositoryError::dependency("recipes_user_id_fkey"));
        }
        let id = RecipeId::new(next_id(&mut state.next_recipe));
        state.recipes.insert(
            id.get(),
            Recipe {
                id,
                title: draft.title.clone(),
                description: draft.description.clone(),
                ingredients: draft.ingredients.clone(),
                instructions: draft.instructions.clone(),
                category_id: draft.category_id,
                user_id: author,
                created_at,
            },
        );
        Ok(id)
    }

    async fn update(
        &self,
        id: RecipeId,
        patch: &RecipePatch,
    ) -> Result<bool, CatalogueRepositoryError> {
        let mut state = self.lock_catalogue()?;
        if let Some(category_id) = patch.category_id {
            ensure_category(&state, category_id)?;
        }
        Ok(state
            .recipes
            .get_mut(&id.get())
            .map(|recipe| patch.apply_to(recipe))
            .is_some())
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, CatalogueRepositoryError> {
        let mut state = self.lock_catalogue()?;
        if state.recipes.remove(&id.get()).is_none() {
            return Ok(false);
        }
        state.favorites.retain(|_, favorite| favorite.recipe_id != id);
        Ok(true)
    }

    async fn export_batch(
        &self,
        after: Option<RecipeId>,
        limit: u32,
    ) -> Result<Vec<RecipeExportRow>, CatalogueRepositoryError> {
        let state = self.lock_catalogue()?;
        let start = after.map_or(i64::MIN, |id| id.get().saturating_add(1));
        Ok(state
            .recipes
            .range(start..)
            .take(limit as usize)
            .map(|(_, recipe)| {
                let author = state.user(recipe.user_id);
                RecipeExportRow {
                    id: recipe.id,
                    title: recipe.title.clone(),
                    description: recipe.description.clone(),
                    ingredients: recipe.ingredients.clone(),
                    instructions: recipe.instructions.clone(),
                    category_name: recipe
                        .category_id
                        .and_then(|id| state.categories.get(&id.get()))
                        .map(|category| category.name.clone()),
                    author_name: author.as_ref().map(|user| user.name.clone()),
                    author_email: author.map(|user| user.email),
                    created_at: recipe.created_at,
                }
            })
            .collect())
    }
}

#[async_trait]
impl FavoriteRepository for InMemoryCatalogue {
    async fn list(
        &self,
        scope: FavoriteScope,
    ) -> Result<Vec<FavoriteDetails>, CatalogueRepositoryError> {
        let state = self.lock_catalogue()?;
        Ok(state
            .favorites
            .values()
            .filter(|favorite| scope.includes(favorite.user_id))
            .filter_map(|favorite| state.favorite_details(favorite))
            .collect())
    }

    async fn find_by_id(&self, id: FavoriteId) -> Result<Option<Favorite>, CatalogueRepositoryError> {
        Ok(self.lock_catalogue()?.favorites.get(&id.get()).copied())
    }

    async fn find_details(
        &self,
        id: FavoriteId,
    ) -> Result<Option<FavoriteDetails>, CatalogueRepositoryError> {
        let state = self.lock_catalogue()?;
        Ok(state
            .favorites
            .get(&id.get())
            .and_then(|favorite| state.favorite_details(favorite)))
    }

    async fn exists(
        &self,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, CatalogueRepositoryError> {
        let state = self.lock_catalogue()?;
        Ok(state
            .favorites
            .values()
            .any(|favorite| favorite.user_id == user_id && favorite.recipe_id == recipe_id))
    }

    async fn create(
        &self,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<Favorite, CatalogueRepositoryError> {
        let mut state = self.lock_catalogue()?;
        let duplicate = state
            .favorites
            .values()
            .any(|favorite| favorite.user_id == user_id && favorite.recipe_id == recipe_id);
        if duplicate {
            return Err(CatalogueRepositoryError::duplicate(
                "favorites_user_id_recipe_id_key",
            ));
        }
        if !state.recipes.contains_key(&recipe_id.get()) {
            return Err(CatalogueRepositoryError::dependency("favorites_recipe_id_fkey"));
        }
        if !state.users.contains_key(&user_id.get()) {
            return Err(CatalogueRepositoryError::dependency("favorites_user_id_fkey"));
        }
        let favorite = Favorite {
            id: FavoriteId::new(next_id(&mut state.next_favorite)),
            user_id,
            recipe_id,
        };
        state.favorites.insert(favorite.id.get(), favorite);
        Ok(favorite)
    }

    async fn delete(&self, id: FavoriteId) -> Result<bool, CatalogueRepositoryError> {
        Ok(self.lock_catalogue()?.favorites.remove(&id.get()).is_some())
    }
}
