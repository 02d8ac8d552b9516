//! Category endpoints.
//!
//! ```text
//! GET /api/categories
//! GET /api/categories/{id}
//! GET /api/categories/{id}/recipes
//! POST /api/categories {"name":"Breakfast"}
//! PUT /api/categories/{id} {"name":"Brunch"}
//! DELETE /api/categories/{id}
//! ```
//!
//! Reads are public. Writes need an admin bearer token.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CategoryId, CategoryName, CategoryView, RecipeView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{CategoryViewSchema, ErrorSchema, RecipeViewSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_category_validation_error;

/// Request body for creating or renaming a category.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CategoryRequest {
    #[schema(example = "Breakfast")]
    pub name: String,
}

impl CategoryRequest {
    fn validated(&self) -> ApiResult<CategoryName> {
        CategoryName::new(&self.name).map_err(map_category_validation_error)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryListResponse {
    #[schema(value_type = Vec<CategoryViewSchema>)]
    pub categories: Vec<CategoryView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Category created successfully")]
    pub message: Option<&'static str>,
    #[schema(value_type = CategoryViewSchema)]
    pub category: CategoryView,
}

/// A category name and the recipes filed under it.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryRecipesResponse {
    #[schema(example = "Breakfast")]
    pub category: String,
    #[schema(value_type = Vec<RecipeViewSchema>)]
    pub recipes: Vec<RecipeView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Category deleted successfully")]
    pub message: &'static str,
}

/// List every category.
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories", body = CategoryListResponse),
        (status = 404, description = "No categories exist", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "listCategories",
    security([])
)]
#[get("/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<CategoryListResponse>> {
    let categories = state.categories.list().await?;
    Ok(web::Json(CategoryListResponse {
        categories: categories.iter().map(CategoryView::from).collect(),
    }))
}

/// Fetch one category.
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 404, description = "Unknown category", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "showCategory",
    security([])
)]
#[get("/categories/{id}")]
pub async fn show_category(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<CategoryResponse>> {
    let category = state.categories.show(CategoryId::new(path.into_inner())).await?;
    Ok(web::Json(CategoryResponse {
        message: None,
        category: CategoryView::from(&category),
    }))
}

/// List the recipes filed under a category.
#[utoipa::path(
    get,
    path = "/api/categories/{id}/recipes",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category recipes", body = CategoryRecipesResponse),
        (status = 404, description = "Unknown category", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "categoryRecipes",
    security([])
)]
#[get("/categories/{id}/recipes")]
pub async fn category_recipes(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<CategoryRecipesResponse>> {
    let (category, recipes) = state
        .categories
        .recipes(CategoryId::new(path.into_inner()))
        .await?;
    Ok(web::Json(CategoryRecipesResponse {
        category: category.name,
        recipes: recipes.iter().map(RecipeView::from).collect(),
    }))
}

/// Create a category.
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin required", body = ErrorSchema),
        (status = 409, description = "Name already taken", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "createCategory",
    security(("BearerAuth" = []))
)]
#[post("/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<HttpResponse> {
    let name = payload.validated()?;
    let category = state.categories.create(&caller.principal(), &name).await?;
    Ok(HttpResponse::Created().json(CategoryResponse {
        message: Some("Category created successfully"),
        category: CategoryView::from(&category),
    }))
}

/// Rename a category.
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category renamed", body = CategoryResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin required", body = ErrorSchema),
        (status = 404, description = "Unknown category", body = ErrorSchema),
        (status = 409, description = "Name already taken", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "updateCategory",
    security(("BearerAuth" = []))
)]
#[put("/categories/{id}")]
pub async fn update_category(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<web::Json<CategoryResponse>> {
    let name = payload.validated()?;
    let category = state
        .categories
        .rename(&caller.principal(), CategoryId::new(path.into_inner()), &name)
        .await?;
    Ok(web::Json(CategoryResponse {
        message: Some("Category updated successfully"),
        category: CategoryView::from(&category),
    }))
}

/// Delete a category no recipe references.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin required", body = ErrorSchema),
        (status = 404, description = "Unknown category", body = ErrorSchema),
        (status = 409, description = "Category still has recipes", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "deleteCategory",
    security(("BearerAuth" = []))
)]
#[delete("/categories/{id}")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    state
        .categories
        .delete(&caller.principal(), CategoryId::new(path.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse {
        message: "Category deleted successfully",
    }))
}
