//! Admin view of another account's favorites.
//!
//! ```text
//! GET /api/users/{id}/favorites
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{FavoriteView, UserContactView, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, FavoriteViewSchema, UserContactViewSchema};
use crate::inbound::http::state::HttpState;

/// An account and every favorite it owns. The list may be empty.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserFavoritesResponse {
    #[schema(value_type = UserContactViewSchema)]
    pub user: UserContactView,
    #[schema(value_type = Vec<FavoriteViewSchema>)]
    pub favorites: Vec<FavoriteView>,
}

/// List a user's favorites.
#[utoipa::path(
    get,
    path = "/api/users/{id}/favorites",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User favorites", body = UserFavoritesResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin required", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "userFavorites",
    security(("BearerAuth" = []))
)]
#[get("/users/{id}/favorites")]
pub async fn user_favorites(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserFavoritesResponse>> {
    let (user, favorites) = state
        .favorites
        .for_user(&caller.principal(), UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(UserFavoritesResponse {
        user: UserContactView::from(&user),
        favorites: favorites.iter().map(FavoriteView::from).collect(),
    }))
}
