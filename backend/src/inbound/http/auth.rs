//! Bearer authentication and account endpoints.
//!
//! ```text
//! POST /api/register {"name":"Ada","email":"ada@mail.com","password":"correct horse"}
//! POST /api/login {"email":"ada@mail.com","password":"correct horse"}
//! POST /api/logout
//! GET /api/user
//! ```
//!
//! [`Authenticated`] resolves `Authorization: Bearer <token>` before the
//! handler body runs, so a missing or unknown token never reaches a service.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, get, post, web};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{
    AccountView, AuthenticatedSession, Error, LoginCredentials, Principal, Registration, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{AccountViewSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_account_validation_error;

const BEARER_PREFIX: &str = "bearer ";

fn missing_token() -> Error {
    Error::unauthorized("authentication required")
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(req: &HttpRequest) -> Option<Zeroizing<String>> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let scheme = header.get(..BEARER_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    let token = header[BEARER_PREFIX.len()..].trim();
    (!token.is_empty()).then(|| Zeroizing::new(token.to_owned()))
}

/// The caller behind a valid bearer token.
pub struct Authenticated {
    user: User,
    token: Zeroizing<String>,
}

impl Authenticated {
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn principal(&self) -> Principal {
        Principal::new(self.user.id, self.user.role)
    }

    /// The raw token presented with the request.
    pub(crate) fn token(&self) -> &str {
        &self.token
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let token = token.ok_or_else(missing_token)?;
            let user = state.accounts.authenticate(&token).await?;
            Ok(Self { user, token })
        })
    }
}

/// Registration request body for `POST /api/register`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@mail.com")]
    pub email: String,
    #[schema(example = "correct horse")]
    pub password: String,
}

/// Login request body for `POST /api/login`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin@mail.com")]
    pub email: String,
    #[schema(example = "password")]
    pub password: String,
}

/// An account and the bearer token issued for it.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    #[schema(value_type = AccountViewSchema)]
    pub user: AccountView,
    /// Present as `Authorization: Bearer <token>` on later requests.
    pub token: String,
}

impl From<AuthenticatedSession> for SessionResponse {
    fn from(session: AuthenticatedSession) -> Self {
        Self {
            user: AccountView::from(&session.user),
            token: session.token.as_str().to_owned(),
        }
    }
}

/// Create a `user` account and sign it in.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = SessionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let password = Zeroizing::new(password);
    let registration = Registration::try_from_parts(&name, &email, &password)
        .map_err(map_account_validation_error)?;
    let session = state.accounts.register(&registration).await?;
    Ok(HttpResponse::Created().json(SessionResponse::from(session)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let password = Zeroizing::new(password);
    let credentials = LoginCredentials::try_from_parts(&email, &password)
        .map_err(map_account_validation_error)?;
    let session = state.accounts.login(&credentials).await?;
    Ok(web::Json(SessionResponse::from(session)))
}

/// Revoke the bearer token used for this request.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Token revoked"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "logout",
    security(("BearerAuth" = []))
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    state.accounts.logout(caller.token()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Logged out successfully" })))
}

/// Return the authenticated account.
#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "Current account", body = AccountViewSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "currentUser",
    security(("BearerAuth" = []))
)]
#[get("/user")]
pub async fn current_user(caller: Authenticated) -> web::Json<AccountView> {
    web::Json(AccountView::from(caller.user()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{TestCatalogue, bearer};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;

    fn account_routes() -> actix_web::Scope {
        web::scope("/api")
            .service(register)
            .service(login)
            .service(logout)
            .service(current_user)
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Token abc"))]
    #[case(Some("Bearer "))]
    #[case(Some("Bearer not-a-real-token"))]
    #[actix_web::test]
    async fn rejects_missing_or_unknown_tokens(#[case] header: Option<&str>) {
        let catalogue = TestCatalogue::new();
        let app = test::init_service(
            App::new()
                .app_data(catalogue.data())
                .service(account_routes()),
        )
        .await;
        let mut request = test::TestRequest::get().uri("/api/user");
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["code"], "unauthorized");
    }

    #[actix_web::test]
    async fn registration_signs_the_new_account_in() {
        let catalogue = TestCatalogue::new();
        let app = test::init_service(
            App::new()
                .app_data(catalogue.data())
                .service(account_routes()),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/register")
                .set_json(json!({
                    "name": "Ada",
                    "email": "ada@mail.com",
                    "password": "correct horse",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["user"]["role"], "user");
        assert_eq!(body["user"]["email"], "ada@mail.com");
        let token = body["token"].as_str().expect("token issued").to_owned();

        let me = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/user")
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::OK);
        let me: Value = test::read_body_json(me).await;
        assert_eq!(me["name"], "Ada");
    }

    #[rstest]
    #[case(json!({"name": "", "email": "a@mail.com", "password": "long enough"}), "name", "required")]
    #[case(json!({"name": "Ada", "email": "nope", "password": "long enough"}), "email", "malformed")]
    #[case(json!({"name": "Ada", "email": "a@mail.com", "password": "short"}), "password", "too_short")]
    #[actix_web::test]
    async fn registration_validates_fields(
        #[case] payload: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let catalogue = TestCatalogue::new();
        let app = test::init_service(
            App::new()
                .app_data(catalogue.data())
                .service(account_routes()),
        )
        .await;
        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/register")
                .set_json(payload)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn logout_revokes_the_token() {
        let catalogue = TestCatalogue::new();
        let (_, token) = catalogue.sign_in(Role::User, "member@mail.com").await;
        let app = test::init_service(
            App::new()
                .app_data(catalogue.data())
                .service(account_routes()),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/logout")
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "Logged out successfully");

        let again = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/user")
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(again.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn login_failures_do_not_reveal_which_part_was_wrong() {
        let catalogue = TestCatalogue::new();
        let app = test::init_service(
            App::new()
                .app_data(catalogue.data())
                .service(account_routes()),
        )
        .await;
        let register_request = test::TestRequest::post()
            .uri("/api/register")
            .set_json(json!({
                "name": "Ada",
                "email": "ada@mail.com",
                "password": "correct horse",
            }))
            .to_request();
        let created = test::call_service(&app, register_request).await;
        assert_eq!(created.status(), StatusCode::CREATED);

        let mut messages = Vec::new();
        for (email, password) in [
            ("ada@mail.com", "wrong horse"),
            ("nobody@mail.com", "correct horse"),
        ] {
            let response = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/login")
                    .set_json(json!({ "email": email, "password": password }))
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body: Value = test::read_body_json(response).await;
            messages.push(body["message"].clone());
        }
        assert_eq!(messages[0], messages[1]);
    }
}
