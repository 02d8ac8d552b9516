//! Recipe listing and search.
//!
//! Listing ANDs optional field filters and returns whatever page results,
//! empty or not. Search ORs one required term across every field and reports
//! an empty page as `not_found`. The two paths differ on purpose; callers
//! rely on both behaviours.

use std::sync::Arc;

use pagination::{Page, PageRequest};
use serde_json::json;

use super::catalogue_errors::map_catalogue_error;
use super::ports::{RecipeQuery, RecipeRepository};
use super::{Error, RecipeDetails, RecipeFilters, RecipePredicate};

/// Requested title ordering.
///
/// Titles compare with ASCII letters folded, then byte-wise, with the id
/// as the final tie-breaker. Every adapter sorts the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSort {
    /// `a` to `z`.
    Ascending,
    /// `z` to `a`.
    Descending,
}

impl TitleSort {
    /// Parse `asc` or `desc` in any case. Other values mean "no sort".
    ///
    /// # Examples
    /// ```
    /// use recipe_catalogue::domain::TitleSort;
    ///
    /// assert_eq!(TitleSort::parse(Some("DESC")), Some(TitleSort::Descending));
    /// assert_eq!(TitleSort::parse(Some("sideways")), None);
    /// assert_eq!(TitleSort::parse(None), None);
    /// ```
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let raw = raw?.trim();
        if raw.eq_ignore_ascii_case("asc") {
            Some(Self::Ascending)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(Self::Descending)
        } else {
            None
        }
    }
}

/// Listing and search over recipes.
#[derive(Clone)]
pub struct RecipeSearchEngine {
    recipes: Arc<dyn RecipeRepository>,
}

impl RecipeSearchEngine {
    /// Engine reading through the given repository.
    pub fn new(recipes: Arc<dyn RecipeRepository>) -> Self {
        Self { recipes }
    }

    /// Page through recipes matching every present filter, ordered by id.
    pub async fn list(
        &self,
        filters: &RecipeFilters,
        page: PageRequest,
    ) -> Result<Page<RecipeDetails>, Error> {
        let query = RecipeQuery {
            predicate: filters.build(),
            sort: None,
            page,
        };
        self.recipes
            .find_page(&query)
            .await
            .map_err(map_catalogue_error)
    }

    /// Page through recipes matching `query` in any field.
    ///
    /// # Errors
    /// - `invalid_request` when `query` is missing or blank.
    /// - `not_found` when the requested page is empty.
    pub async fn search(
        &self,
        query: Option<&str>,
        sort: Option<TitleSort>,
        page: PageRequest,
    ) -> Result<Page<RecipeDetails>, Error> {
        let term = query
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .ok_or_else(|| {
                Error::invalid_request("search query is required")
                    .with_details(json!({ "field": "query", "code": "required" }))
            })?;
        let query = RecipeQuery {
            predicate: RecipePredicate::search(term),
            sort,
            page,
        };
        let results = self
            .recipes
            .find_page(&query)
            .await
            .map_err(map_catalogue_error)?;
        if results.is_empty() {
            return Err(Error::not_found("no matching recipes"));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{CatalogueRepositoryError, MockRecipeRepository};
    use crate::domain::test_fixtures::recipe_details;
    use crate::domain::{Combinator, RecipeField};
    use rstest::rstest;

    fn engine(mock: MockRecipeRepository) -> RecipeSearchEngine {
        RecipeSearchEngine::new(Arc::new(mock))
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    #[tokio::test]
    async fn search_requires_a_query(#[case] query: Option<&str>) {
        let error = engine(MockRecipeRepository::new())
            .search(query, None, PageRequest::default())
            .await
            .expect_err("query is required");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "search query is required");
    }

    #[rstest]
    #[tokio::test]
    async fn search_ors_the_term_and_passes_sort() {
        let mut mock = MockRecipeRepository::new();
        mock.expect_find_page()
            .withf(|query| {
                query.predicate.combinator() == Combinator::Any
                    && query.predicate.clauses().len() == RecipeField::ALL.len()
                    && query.predicate.clauses().iter().all(|c| c.needle() == "pan")
                    && query.sort == Some(TitleSort::Descending)
            })
            .times(1)
            .returning(|query| Ok(Page::new(vec![recipe_details(1, "Pancakes", None)], query.page, 1)));

        let page = engine(mock)
            .search(Some(" pan "), Some(TitleSort::Descending), PageRequest::default())
            .await
            .expect("search succeeds");
        assert_eq!(page.items().len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_search_page_is_not_found() {
        let mut mock = MockRecipeRepository::new();
        mock.expect_find_page()
            .returning(|query| Ok(Page::new(Vec::new(), query.page, 0)));

        let error = engine(mock)
            .search(Some("zzz"), None, PageRequest::default())
            .await
            .expect_err("nothing matches");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "no matching recipes");
    }

    #[rstest]
    #[tokio::test]
    async fn empty_listing_is_a_successful_page() {
        let mut mock = MockRecipeRepository::new();
        mock.expect_find_page()
            .withf(|query| query.predicate.combinator() == Combinator::All && query.sort.is_none())
            .returning(|query| Ok(Page::new(Vec::new(), query.page, 0)));

        let filters = RecipeFilters {
            title: Some("zzz".to_owned()),
            ..RecipeFilters::default()
        };
        let page = engine(mock)
            .list(&filters, PageRequest::default())
            .await
            .expect("listing never reports absence");
        assert!(page.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn repository_failures_are_mapped() {
        let mut mock = MockRecipeRepository::new();
        mock.expect_find_page()
            .returning(|_| Err(CatalogueRepositoryError::connection("refused")));

        let error = engine(mock)
            .list(&RecipeFilters::default(), PageRequest::default())
            .await
            .expect_err("connection failure");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
