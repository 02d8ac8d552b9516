//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `inbound::http`, the schema
//! mirrors of domain projections, and the bearer token security scheme. The
//! document backs Swagger UI in debug builds and the `openapi-dump` binary.

use crate::inbound::http::schemas::{
    AccountViewSchema, CategoryViewSchema, ErrorCodeSchema, ErrorSchema, FavoriteViewSchema,
    PageMetaSchema, RecipeViewSchema, RoleSchema, UserContactViewSchema, UserSummaryViewSchema,
};
use crate::inbound::http::{auth, categories, export, favorites, health, keto, recipes, users};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                Http::builder()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Opaque token issued by POST /api/register or POST /api/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe catalogue API",
        description = "Recipes, categories, favorites, CSV export, and a keto recipes pass-through.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        health::ready,
        health::live,
        health::ping,
        auth::register,
        auth::login,
        auth::logout,
        auth::current_user,
        categories::list_categories,
        categories::show_category,
        categories::category_recipes,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        recipes::list_recipes,
        recipes::search_recipes,
        recipes::show_recipe,
        recipes::create_recipe,
        recipes::update_recipe,
        recipes::delete_recipe,
        export::export_csv,
        favorites::list_favorites,
        favorites::create_favorite,
        favorites::delete_favorite,
        users::user_favorites,
        keto::keto_categories,
        keto::keto_recipes,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RoleSchema,
        AccountViewSchema,
        CategoryViewSchema,
        UserSummaryViewSchema,
        UserContactViewSchema,
        RecipeViewSchema,
        FavoriteViewSchema,
        PageMetaSchema,
    )),
    tags(
        (name = "accounts", description = "Registration and bearer tokens"),
        (name = "categories", description = "Recipe categories"),
        (name = "recipes", description = "Recipes, search, and export"),
        (name = "favorites", description = "Per-user favorites"),
        (name = "users", description = "Admin views of other accounts"),
        (name = "keto", description = "Third-party keto recipes"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
