//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod categories;
pub mod error;
pub mod export;
pub mod favorites;
pub mod health;
pub mod keto;
pub mod recipes;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::{Scope, web};

use self::error::{json_error_handler, path_error_handler, query_error_handler};

/// Build the `/api` scope with every catalogue endpoint and the extractor
/// configuration that renders malformed input as the JSON error envelope.
///
/// Literal recipe paths are registered ahead of `/recipes/{id}`.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(health::ping)
        .service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::current_user)
        .service(categories::list_categories)
        .service(categories::create_category)
        .service(categories::category_recipes)
        .service(categories::show_category)
        .service(categories::update_category)
        .service(categories::delete_category)
        .service(recipes::search_recipes)
        .service(export::export_csv)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::show_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(favorites::list_favorites)
        .service(favorites::create_favorite)
        .service(favorites::delete_favorite)
        .service(users::user_favorites)
        .service(keto::keto_categories)
        .service(keto::keto_recipes)
}
