//! Pass-through endpoints for the third-party keto recipes API.
//!
//! ```text
//! GET /api/keto/categories
//! GET /api/keto/recipes?category=3
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::keto_category;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct KetoRecipesQuery {
    /// Upstream category id, 1 or more.
    #[param(value_type = i64, minimum = 1, example = 3)]
    pub category: Option<String>,
}

/// Upstream keto categories.
#[utoipa::path(
    get,
    path = "/api/keto/categories",
    responses(
        (status = 200, description = "Upstream payload", body = serde_json::Value),
        (status = 502, description = "Upstream failure", body = ErrorSchema)
    ),
    tags = ["keto"],
    operation_id = "ketoCategories",
    security([])
)]
#[get("/keto/categories")]
pub async fn keto_categories(state: web::Data<HttpState>) -> ApiResult<web::Json<Value>> {
    Ok(web::Json(state.keto.categories().await?))
}

/// Upstream keto recipes for one category.
#[utoipa::path(
    get,
    path = "/api/keto/recipes",
    params(KetoRecipesQuery),
    responses(
        (status = 200, description = "Upstream payload", body = serde_json::Value),
        (status = 400, description = "Missing or invalid category", body = ErrorSchema),
        (status = 502, description = "Upstream failure", body = ErrorSchema)
    ),
    tags = ["keto"],
    operation_id = "ketoRecipes",
    security([])
)]
#[get("/keto/recipes")]
pub async fn keto_recipes(
    state: web::Data<HttpState>,
    query: web::Query<KetoRecipesQuery>,
) -> ApiResult<web::Json<Value>> {
    let category = keto_category(query.category.as_deref())?;
    Ok(web::Json(state.keto.recipes(category).await?))
}
