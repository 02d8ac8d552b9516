//! PostgreSQL-backed `RecipeRepository`.
//!
//! Recipe predicates become boxed `ILIKE` filters. Needles are escaped so
//! `%`, `_`, and `\` match literally. The category-name clause is a subquery
//! over `categories`, which keeps the page query free of joins and lets the
//! count query reuse the same filter.

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Nullable, Text};
use diesel_async::RunQueryDsl;
use pagination::Page;

use crate::domain::ports::{
    CatalogueRepositoryError, RecipeExportRow, RecipeQuery, RecipeRepository,
};
use crate::domain::{
    CategoryId, Combinator, FieldMatch, RecipeDetails, RecipeDraft, RecipeField, RecipeId,
    RecipePatch, RecipePredicate, TitleSort, UserId,
};

use super::diesel_error_mapping::{catalogue_pool_error, map_catalogue_diesel_error};
use super::models::{NewRecipeRow, RecipeChangeset, RecipeRow};
use super::pool::DbPool;
use super::relations::load_recipe_details;
use super::schema::{categories, recipes, users};

type RecipeFilter = Box<dyn BoxableExpression<recipes::table, Pg, SqlType = Nullable<Bool>>>;

/// Title sort keys under the C collation, so ordering does not depend on the
/// database locale: ASCII-folded bytes first, then raw bytes.
const FOLDED_TITLE: &str = r#"lower(recipes.title COLLATE "C")"#;
const RAW_TITLE: &str = r#"recipes.title COLLATE "C""#;

fn sorted<'a, ST>(
    query: recipes::BoxedQuery<'a, Pg, ST>,
    sort: Option<TitleSort>,
) -> recipes::BoxedQuery<'a, Pg, ST> {
    match sort {
        Some(TitleSort::Ascending) => query.order_by((
            sql::<Text>(FOLDED_TITLE).asc(),
            sql::<Text>(RAW_TITLE).asc(),
            recipes::id.asc(),
        )),
        Some(TitleSort::Descending) => query.order_by((
            sql::<Text>(FOLDED_TITLE).desc(),
            sql::<Text>(RAW_TITLE).desc(),
            recipes::id.asc(),
        )),
        None => query.order_by(recipes::id.asc()),
    }
}

/// Escape LIKE metacharacters and wrap the needle in `%` wildcards.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn clause_filter(clause: &FieldMatch) -> RecipeFilter {
    let pattern = contains_pattern(clause.needle());
    match clause.field() {
        RecipeField::Title => Box::new(recipes::title.ilike(pattern).nullable()),
        RecipeField::Description => Box::new(recipes::description.ilike(pattern).nullable()),
        RecipeField::Ingredients => Box::new(recipes::ingredients.ilike(pattern).nullable()),
        RecipeField::Instructions => Box::new(recipes::instructions.ilike(pattern).nullable()),
        RecipeField::CategoryName => Box::new(
            recipes::category_id
                .eq_any(
                    categories::table
                        .filter(categories::name.ilike(pattern))
                        .select(categories::id.nullable()),
                )
                .nullable(),
        ),
    }
}

/// Translate a predicate. `None` means "no WHERE clause".
fn predicate_filter(predicate: &RecipePredicate) -> Option<RecipeFilter> {
    let mut clauses = predicate.clauses().iter().map(clause_filter);
    let first = clauses.next()?;
    let combinator = predicate.combinator();
    Some(clauses.fold(first, |acc, next| match combinator {
        Combinator::All => Box::new(acc.and(next)),
        Combinator::Any => Box::new(acc.or(next)),
    }))
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Diesel-backed recipe repository.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn find_page(
        &self,
        query: &RecipeQuery,
    ) -> Result<Page<RecipeDetails>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;

        let total: i64 = match predicate_filter(&query.predicate) {
            Some(filter) => recipes::table.filter(filter).count().get_result(&mut conn).await,
            None => recipes::table.count().get_result(&mut conn).await,
        }
        .map_err(map_catalogue_diesel_error)?;

        let mut page_query = recipes::table.select(RecipeRow::as_select()).into_boxed();
        if let Some(filter) = predicate_filter(&query.predicate) {
            page_query = page_query.filter(filter);
        }
        let rows: Vec<RecipeRow> = sorted(page_query, query.sort)
            .limit(i64::from(query.page.limit()))
            .offset(saturating_i64(query.page.offset()))
            .load(&mut conn)
            .await
            .map_err(map_catalogue_diesel_error)?;

        let items = load_recipe_details(&mut conn, rows).await?;
        Ok(Page::new(
            items,
            query.page,
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    async fn find_by_id(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeDetails>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let row: Option<RecipeRow> = recipes::table
            .find(id.get())
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_catalogue_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(load_recipe_details(&mut conn, vec![row]).await?.pop())
    }

    async fn list_by_category(
        &self,
        id: CategoryId,
    ) -> Result<Vec<RecipeDetails>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let rows: Vec<RecipeRow> = recipes::table
            .filter(recipes::category_id.eq(id.get()))
            .select(RecipeRow::as_select())
            .order_by(recipes::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_catalogue_diesel_error)?;
        load_recipe_details(&mut conn, rows).await
    }

    async fn create(
        &self,
        draft: &RecipeDraft,
        author: UserId,
    ) -> Result<RecipeId, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let id: i64 = diesel::insert_into(recipes::table)
            .values(&NewRecipeRow {
                title: &draft.title,
                description: draft.description.as_deref(),
                ingredients: &draft.ingredients,
                instructions: &draft.instructions,
                category_id: draft.category_id.map(CategoryId::get),
                user_id: author.get(),
            })
            .returning(recipes::id)
            .get_result(&mut conn)
            .await
            .map_err(map_catalogue_diesel_error)?;
        Ok(RecipeId::new(id))
    }

    async fn update(
        &self,
        id: RecipeId,
        patch: &RecipePatch,
    ) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let changeset = RecipeChangeset {
            title: patch.title.as_deref(),
            description: patch.description.as_ref().map(Option::as_deref),
            ingredients: patch.ingredients.as_deref(),
            instructions: patch.instructions.as_deref(),
            category_id: patch.category_id.map(|id| id.map(CategoryId::get)),
            updated_at: Utc::now(),
        };
        let updated = diesel::update(recipes::table.find(id.get()))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_catalogue_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let deleted = diesel::delete(recipes::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_catalogue_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn export_batch(
        &self,
        after: Option<RecipeId>,
        limit: u32,
    ) -> Result<Vec<RecipeExportRow>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(catalogue_pool_error)?;
        let mut batch = recipes::table
            .inner_join(users::table)
            .left_join(categories::table)
            .select((
                RecipeRow::as_select(),
                categories::name.nullable(),
                users::name,
                users::email,
            ))
            .order_by(recipes::id.asc())
            .limit(i64::from(limit))
            .into_boxed();
        if let Some(after) = after {
            batch = batch.filter(recipes::id.gt(after.get()));
        }
        let rows: Vec<(RecipeRow, Option<String>, String, String)> = batch
            .load(&mut conn)
            .await
            .map_err(map_catalogue_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(row, category_name, author_name, author_email)| RecipeExportRow {
                id: RecipeId::new(row.id),
                title: row.title,
                description: row.description,
                ingredients: row.ingredients,
                instructions: row.instructions,
                category_name,
                author_name: Some(author_name),
                author_email: Some(author_email),
                created_at: row.created_at,
            })
            .collect())
    }
}
