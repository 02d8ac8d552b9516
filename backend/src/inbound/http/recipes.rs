//! Recipe endpoints.
//!
//! ```text
//! GET /api/recipes?title=pan&category=breakfast&page=1&per_page=10
//! GET /api/recipes/search?query=pan&sort_title=asc
//! GET /api/recipes/{id}
//! POST /api/recipes {"title":"Pancakes","ingredients":"Flour","instructions":"Fry"}
//! PUT /api/recipes/{id} {"category_id":null}
//! DELETE /api/recipes/{id}
//! ```
//!
//! Listing and search share the `{recipes, meta}` envelope. Writes need an
//! admin bearer token.

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::{Page, PageMeta};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    CategoryId, RecipeDetails, RecipeDraft, RecipeFilters, RecipeId, RecipePatch, RecipeView,
    TitleSort,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, PageMetaSchema, RecipeViewSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_recipe_validation_error, page_request};

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Optional listing filters; every present filter must match.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListQuery {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    /// Case-insensitive substring of the category name.
    pub category: Option<String>,
    #[param(minimum = 1)]
    pub page: Option<u32>,
    #[param(minimum = 1, maximum = 100)]
    pub per_page: Option<u32>,
}

/// Free-text search across every recipe field.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeSearchQuery {
    /// Required search term.
    pub query: Option<String>,
    /// `asc` or `desc`; anything else leaves results unsorted.
    pub sort_title: Option<String>,
    #[param(minimum = 1)]
    pub page: Option<u32>,
    #[param(minimum = 1, maximum = 100)]
    pub per_page: Option<u32>,
}

/// Request body for `POST /api/recipes`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateRecipeRequest {
    #[schema(example = "Pancakes")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "Flour, Eggs, Milk")]
    pub ingredients: String,
    #[schema(example = "Whisk and fry.")]
    pub instructions: String,
    pub category_id: Option<i64>,
}

/// Request body for `PUT /api/recipes/{id}`. Omitted fields stay unchanged;
/// an explicit `null` clears `description` or `category_id`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<i64>)]
    pub category_id: Option<Option<i64>>,
}

/// One page of recipes and its position in the full result set.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecipePageResponse {
    #[schema(value_type = Vec<RecipeViewSchema>)]
    pub recipes: Vec<RecipeView>,
    #[schema(value_type = PageMetaSchema)]
    pub meta: PageMeta,
}

impl From<Page<RecipeDetails>> for RecipePageResponse {
    fn from(page: Page<RecipeDetails>) -> Self {
        Self {
            meta: page.meta(),
            recipes: page.items().iter().map(RecipeView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecipeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Recipe created successfully")]
    pub message: Option<&'static str>,
    #[schema(value_type = RecipeViewSchema)]
    pub recipe: RecipeView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecipeDeletedResponse {
    #[schema(example = "Recipe deleted successfully")]
    pub message: &'static str,
}

/// List recipes, filtered and paginated.
#[utoipa::path(
    get,
    path = "/api/recipes",
    params(RecipeListQuery),
    responses(
        (status = 200, description = "Recipes page, possibly empty", body = RecipePageResponse),
        (status = 400, description = "Invalid pagination", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security([])
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    query: web::Query<RecipeListQuery>,
) -> ApiResult<web::Json<RecipePageResponse>> {
    let RecipeListQuery {
        title,
        description,
        ingredients,
        instructions,
        category,
        page,
        per_page,
    } = query.into_inner();
    let request = page_request(page, per_page)?;
    let filters = RecipeFilters {
        title,
        description,
        ingredients,
        instructions,
        category,
    };
    let page = state.search.list(&filters, request).await?;
    Ok(web::Json(RecipePageResponse::from(page)))
}

/// Search recipes by a term matched against every field.
#[utoipa::path(
    get,
    path = "/api/recipes/search",
    params(RecipeSearchQuery),
    responses(
        (status = 200, description = "Matching recipes", body = RecipePageResponse),
        (status = 400, description = "Missing query or invalid pagination", body = ErrorSchema),
        (status = 404, description = "No matching recipes", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "searchRecipes",
    security([])
)]
#[get("/recipes/search")]
pub async fn search_recipes(
    state: web::Data<HttpState>,
    query: web::Query<RecipeSearchQuery>,
) -> ApiResult<web::Json<RecipePageResponse>> {
    let RecipeSearchQuery {
        query,
        sort_title,
        page,
        per_page,
    } = query.into_inner();
    let request = page_request(page, per_page)?;
    let sort = TitleSort::parse(sort_title.as_deref());
    let page = state.search.search(query.as_deref(), sort, request).await?;
    Ok(web::Json(RecipePageResponse::from(page)))
}

/// Fetch one recipe.
#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "showRecipe",
    security([])
)]
#[get("/recipes/{id}")]
pub async fn show_recipe(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let details = state.recipes.show(RecipeId::new(path.into_inner())).await?;
    Ok(web::Json(RecipeResponse {
        message: None,
        recipe: RecipeView::from(&details),
    }))
}

/// Create a recipe authored by the calling admin.
#[utoipa::path(
    post,
    path = "/api/recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin required", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe",
    security(("BearerAuth" = []))
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreateRecipeRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let draft = RecipeDraft::try_from_parts(
        &body.title,
        body.description.as_deref(),
        &body.ingredients,
        &body.instructions,
        body.category_id.map(CategoryId::new),
    )
    .map_err(map_recipe_validation_error)?;
    let details = state.recipes.create(&caller.principal(), &draft).await?;
    Ok(HttpResponse::Created().json(RecipeResponse {
        message: Some("Recipe created successfully"),
        recipe: RecipeView::from(&details),
    }))
}

/// Partially update a recipe.
#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin required", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe",
    security(("BearerAuth" = []))
)]
#[put("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
    payload: web::Json<UpdateRecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let body = payload.into_inner();
    let patch = RecipePatch::try_from_parts(
        body.title.as_deref(),
        body.description.as_ref().map(Option::as_deref),
        body.ingredients.as_deref(),
        body.instructions.as_deref(),
        body.category_id.map(|id| id.map(CategoryId::new)),
    )
    .map_err(map_recipe_validation_error)?;
    let details = state
        .recipes
        .update(&caller.principal(), RecipeId::new(path.into_inner()), &patch)
        .await?;
    Ok(web::Json(RecipeResponse {
        message: Some("Recipe updated successfully"),
        recipe: RecipeView::from(&details),
    }))
}

/// Delete a recipe and every favorite pointing at it.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe deleted", body = RecipeDeletedResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin required", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe",
    security(("BearerAuth" = []))
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeDeletedResponse>> {
    state
        .recipes
        .delete(&caller.principal(), RecipeId::new(path.into_inner()))
        .await?;
    Ok(web::Json(RecipeDeletedResponse {
        message: "Recipe deleted successfully",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{TestCatalogue, bearer};
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn app(
        catalogue: &TestCatalogue,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        actix_test::init_service(
            App::new().app_data(catalogue.data()).service(
                web::scope("/api")
                    .service(search_recipes)
                    .service(list_recipes)
                    .service(show_recipe)
                    .service(create_recipe)
                    .service(update_recipe)
                    .service(delete_recipe),
            ),
        )
        .await
    }

    async fn get_json(
        app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
        uri: &str,
    ) -> (StatusCode, Value) {
        let response =
            actix_test::call_service(app, actix_test::TestRequest::get().uri(uri).to_request()).await;
        let status = response.status();
        let body: Value = actix_test::read_body_json(response).await;
        (status, body)
    }

    fn titles(body: &Value) -> Vec<&str> {
        body["recipes"]
            .as_array()
            .map(|recipes| recipes.iter().filter_map(|r| r["title"].as_str()).collect())
            .unwrap_or_default()
    }

    #[actix_web::test]
    async fn search_orders_by_title_and_reports_misses() {
        let catalogue = TestCatalogue::new();
        let (admin, _) = catalogue.sign_in(Role::Admin, "admin@mail.com").await;
        catalogue.recipe("Waffles", None, &admin).await;
        catalogue.recipe("Pancakes", None, &admin).await;
        let app = app(&catalogue).await;

        let (status, body) = get_json(&app, "/api/recipes/search?query=pan").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), ["Pancakes"]);

        let (status, body) =
            get_json(&app, "/api/recipes/search?query=about&sort_title=desc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), ["Waffles", "Pancakes"]);

        let (status, _) = get_json(&app, "/api/recipes/search?query=zzz").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get_json(&app, "/api/recipes/search").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "query");
    }

    #[actix_web::test]
    async fn listing_paginates_and_allows_empty_pages() {
        let catalogue = TestCatalogue::new();
        let (admin, _) = catalogue.sign_in(Role::Admin, "admin@mail.com").await;
        for title in ["One", "Two", "Three", "Four", "Five"] {
            catalogue.recipe(title, None, &admin).await;
        }
        let app = app(&catalogue).await;

        let mut sizes = Vec::new();
        for page in 1..=3 {
            let (status, body) =
                get_json(&app, &format!("/api/recipes?per_page=2&page={page}")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["meta"]["total"], 5);
            assert_eq!(body["meta"]["last_page"], 3);
            sizes.push(titles(&body).len());
        }
        assert_eq!(sizes, [2, 2, 1]);

        let (status, body) = get_json(&app, "/api/recipes?title=missing").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recipes"], json!([]));
    }

    #[actix_web::test]
    async fn repeated_reads_return_identical_bodies_and_past_end_pages_differ() {
        let catalogue = TestCatalogue::new();
        let (admin, _) = catalogue.sign_in(Role::Admin, "admin@mail.com").await;
        for title in ["Pancakes", "Pan Pizza", "Waffles", "Omelette", "Porridge"] {
            catalogue.recipe(title, None, &admin).await;
        }
        let app = app(&catalogue).await;

        for uri in [
            "/api/recipes?per_page=2&page=2",
            "/api/recipes/search?query=pan&sort_title=asc",
        ] {
            let first = actix_test::call_and_read_body(
                &app,
                actix_test::TestRequest::get().uri(uri).to_request(),
            )
            .await;
            let second = actix_test::call_and_read_body(
                &app,
                actix_test::TestRequest::get().uri(uri).to_request(),
            )
            .await;
            assert!(!first.is_empty(), "{uri} returned a body");
            assert_eq!(first, second, "{uri} is repeatable");
        }

        let (status, body) = get_json(&app, "/api/recipes?per_page=2&page=4").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recipes"], json!([]));
        assert_eq!(body["meta"]["current_page"], 4);
        assert_eq!(body["meta"]["last_page"], 3);
        assert_eq!(body["meta"]["total"], 5);

        let (status, body) =
            get_json(&app, "/api/recipes/search?query=pan&per_page=2&page=4").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }

    #[rstest]
    #[case("/api/recipes?page=0")]
    #[case("/api/recipes?per_page=101")]
    #[case("/api/recipes/search?query=pan&per_page=0")]
    #[actix_web::test]
    async fn pagination_bounds_are_enforced(#[case] uri: &str) {
        let catalogue = TestCatalogue::new();
        let app = app(&catalogue).await;
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
    }

    #[actix_web::test]
    async fn listing_filters_are_anded() {
        let catalogue = TestCatalogue::new();
        let (admin, _) = catalogue.sign_in(Role::Admin, "admin@mail.com").await;
        let breakfast = catalogue.category("Breakfast").await;
        catalogue.recipe("Pancakes", Some(&breakfast), &admin).await;
        catalogue.recipe("Pan Pizza", None, &admin).await;
        let app = app(&catalogue).await;

        let (_, body) = get_json(&app, "/api/recipes?title=pan&category=break").await;
        assert_eq!(titles(&body), ["Pancakes"]);
    }

    #[actix_web::test]
    async fn admin_writes_round_trip_through_the_api() {
        let catalogue = TestCatalogue::new();
        let (_, token) = catalogue.sign_in(Role::Admin, "admin@mail.com").await;
        let breakfast = catalogue.category("Breakfast").await;
        let app = app(&catalogue).await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/recipes")
                .insert_header(bearer(&token))
                .set_json(json!({
                    "title": "Pancakes",
                    "ingredients": "Flour",
                    "instructions": "Fry",
                    "category_id": breakfast.id.get(),
                }))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let created: Value = actix_test::read_body_json(created).await;
        assert_eq!(created["message"], "Recipe created successfully");
        assert_eq!(created["recipe"]["creator"]["name"], "admin");
        let id = created["recipe"]["id"].as_i64().expect("id");

        let cleared = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/recipes/{id}"))
                .insert_header(bearer(&token))
                .set_json(json!({ "category_id": null }))
                .to_request(),
        )
        .await;
        assert_eq!(cleared.status(), StatusCode::OK);
        let cleared: Value = actix_test::read_body_json(cleared).await;
        assert_eq!(cleared["recipe"]["category"], Value::Null);
        assert_eq!(cleared["recipe"]["title"], "Pancakes");

        let deleted = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/recipes/{id}"))
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(deleted.status(), StatusCode::OK);

        let (status, _) = get_json(&app, &format!("/api/recipes/{id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn unknown_categories_are_invalid_on_create() {
        let catalogue = TestCatalogue::new();
        let (_, token) = catalogue.sign_in(Role::Admin, "admin@mail.com").await;
        let app = app(&catalogue).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/recipes")
                .insert_header(bearer(&token))
                .set_json(json!({
                    "title": "Pancakes",
                    "ingredients": "Flour",
                    "instructions": "Fry",
                    "category_id": 42,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "category_id");
    }

    #[actix_web::test]
    async fn members_cannot_write_recipes() {
        let catalogue = TestCatalogue::new();
        let (_, token) = catalogue.sign_in(Role::User, "member@mail.com").await;
        let app = app(&catalogue).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/recipes")
                .insert_header(bearer(&token))
                .set_json(json!({
                    "title": "Pancakes",
                    "ingredients": "Flour",
                    "instructions": "Fry",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[case(json!({}), None)]
    #[case(json!({ "category_id": null }), Some(None))]
    #[case(json!({ "category_id": 4 }), Some(Some(4)))]
    fn update_bodies_distinguish_null_from_absent(
        #[case] body: Value,
        #[case] expected: Option<Option<i64>>,
    ) {
        let request: UpdateRecipeRequest = serde_json::from_value(body).expect("valid body");
        assert_eq!(request.category_id, expected);
    }
}
