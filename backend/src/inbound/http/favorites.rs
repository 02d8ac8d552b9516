//! Favorite endpoints.
//!
//! ```text
//! GET /api/favorites
//! POST /api/favorites {"recipe_id":3}
//! DELETE /api/favorites/{id}
//! ```
//!
//! Admins see every favorite; users see and manage their own. Only users
//! may favorite recipes.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{FavoriteId, FavoriteView, RecipeId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, FavoriteViewSchema};
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/favorites`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateFavoriteRequest {
    #[schema(example = 3)]
    pub recipe_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteListResponse {
    #[schema(value_type = Vec<FavoriteViewSchema>)]
    pub favorites: Vec<FavoriteView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteCreatedResponse {
    #[schema(example = "Favorite added successfully")]
    pub message: &'static str,
    #[schema(value_type = FavoriteViewSchema)]
    pub favorite: FavoriteView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteRemovedResponse {
    #[schema(example = "Favorite removed successfully")]
    pub message: &'static str,
}

/// List the favorites visible to the caller.
#[utoipa::path(
    get,
    path = "/api/favorites",
    responses(
        (status = 200, description = "Favorites", body = FavoriteListResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No favorites visible", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "listFavorites",
    security(("BearerAuth" = []))
)]
#[get("/favorites")]
pub async fn list_favorites(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<FavoriteListResponse>> {
    let favorites = state.favorites.list(&caller.principal()).await?;
    Ok(web::Json(FavoriteListResponse {
        favorites: favorites.iter().map(FavoriteView::from).collect(),
    }))
}

/// Favorite a recipe.
#[utoipa::path(
    post,
    path = "/api/favorites",
    request_body = CreateFavoriteRequest,
    responses(
        (status = 201, description = "Favorite added", body = FavoriteCreatedResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Only users may favorite", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema),
        (status = 409, description = "Already favorited", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "createFavorite",
    security(("BearerAuth" = []))
)]
#[post("/favorites")]
pub async fn create_favorite(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreateFavoriteRequest>,
) -> ApiResult<HttpResponse> {
    let recipe_id = RecipeId::new(payload.recipe_id);
    let favorite = state.favorites.add(&caller.principal(), recipe_id).await?;
    Ok(HttpResponse::Created().json(FavoriteCreatedResponse {
        message: "Favorite added successfully",
        favorite: FavoriteView::from(&favorite),
    }))
}

/// Remove one of the caller's favorites.
#[utoipa::path(
    delete,
    path = "/api/favorites/{id}",
    params(("id" = i64, Path, description = "Favorite id")),
    responses(
        (status = 200, description = "Favorite removed", body = FavoriteRemovedResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner or not a user", body = ErrorSchema),
        (status = 404, description = "Unknown favorite", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "deleteFavorite",
    security(("BearerAuth" = []))
)]
#[delete("/favorites/{id}")]
pub async fn delete_favorite(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<web::Json<FavoriteRemovedResponse>> {
    state
        .favorites
        .remove(&caller.principal(), FavoriteId::new(path.into_inner()))
        .await?;
    Ok(web::Json(FavoriteRemovedResponse {
        message: "Favorite removed successfully",
    }))
}
