//! Server harness and shared world for the catalogue behaviour suites.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. Dropping the world stops the server
//! even if a step panics.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use async_trait::async_trait;
use awc::Client;
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

use recipe_catalogue::Trace;
use recipe_catalogue::domain::ports::{
    AccessTokenRepository, KetoCategoryId, KetoRecipeSource, KetoSourceError, UserRepository,
};
use recipe_catalogue::domain::{EmailAddress, IssuedToken, NewAccount, Role, UserName};
use recipe_catalogue::inbound::http::api_scope;
use recipe_catalogue::inbound::http::state::{HttpState, HttpStatePorts};
use recipe_catalogue::outbound::memory::InMemoryCatalogue;
use recipe_catalogue::outbound::security::Argon2PasswordHasher;

/// Keto source answering from canned payloads.
struct CannedKeto;

#[async_trait]
impl KetoRecipeSource for CannedKeto {
    async fn list_categories(&self) -> Result<Value, KetoSourceError> {
        Ok(json!([{ "id": 1, "category": "Breakfast Recipes" }]))
    }

    async fn list_recipes(&self, category: KetoCategoryId) -> Result<Value, KetoSourceError> {
        Ok(json!([{ "recipe": "Keto Bread", "category": { "id": category.get() } }]))
    }
}

/// Response captured by the last request.
#[derive(Default)]
pub(crate) struct LastResponse {
    pub(crate) status: Option<u16>,
    pub(crate) content_disposition: Option<String>,
    pub(crate) text: String,
    pub(crate) json: Option<Value>,
}

#[derive(Default)]
struct Scenario {
    tokens: HashMap<String, String>,
    categories: HashMap<String, i64>,
    recipes: HashMap<String, i64>,
    last: LastResponse,
}

pub(crate) struct CatalogueWorld {
    runtime: Runtime,
    local: LocalSet,
    base_url: String,
    server: ServerHandle,
    store: Arc<InMemoryCatalogue>,
    scenario: RefCell<Scenario>,
}

impl Drop for CatalogueWorld {
    fn drop(&mut self) {
        let server = self.server.clone();
        self.local.block_on(&self.runtime, async move {
            server.stop(true).await;
        });
    }
}

fn spawn_server(state: HttpState) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let data = web::Data::new(state);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Trace)
            .service(api_scope())
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((format!("http://{addr}"), handle))
}

impl CatalogueWorld {
    pub(crate) fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");
        let local = LocalSet::new();
        let store = Arc::new(InMemoryCatalogue::new());
        let state = HttpState::new(HttpStatePorts {
            users: store.clone(),
            tokens: store.clone(),
            hasher: Arc::new(Argon2PasswordHasher::new()),
            categories: store.clone(),
            recipes: store.clone(),
            favorites: store.clone(),
            keto: Arc::new(CannedKeto),
        });
        let (base_url, server) = local
            .block_on(&runtime, async move { spawn_server(state) })
            .expect("server starts");
        Self {
            runtime,
            local,
            base_url,
            server,
            store,
            scenario: RefCell::new(Scenario::default()),
        }
    }

    /// Store an account named `label` with a fresh bearer token.
    pub(crate) fn sign_in(&self, label: &str, role: Role) {
        let store = self.store.clone();
        let email = format!("{label}@mail.com");
        let name = label.to_owned();
        let token = self.local.block_on(&self.runtime, async move {
            let account = NewAccount {
                name: UserName::new(name).expect("fixture name"),
                email: EmailAddress::new(email).expect("fixture email"),
                role,
                password_hash: "unused".to_owned(),
            };
            let user = UserRepository::create(&*store, &account)
                .await
                .expect("account stored");
            let token = IssuedToken::generate();
            AccessTokenRepository::store(&*store, user.id, token.digest())
                .await
                .expect("token stored");
            token.plaintext().to_owned()
        });
        self.scenario
            .borrow_mut()
            .tokens
            .insert(label.to_owned(), token);
    }

    /// Send a request, optionally as `caller`, and capture the response.
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        caller: Option<&str>,
        payload: Option<Value>,
    ) {
        let token = caller.map(|label| {
            self.scenario
                .borrow()
                .tokens
                .get(label)
                .cloned()
                .expect("caller signed in")
        });
        let url = format!("{}{path}", self.base_url);
        let last = self.local.block_on(&self.runtime, async move {
            let mut request = Client::default().request(method, url);
            if let Some(token) = token {
                request = request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
            }
            let mut response = match payload {
                Some(payload) => request.send_json(&payload).await.expect("json request"),
                None => request.send().await.expect("request"),
            };
            let status = response.status().as_u16();
            let content_disposition = response
                .headers()
                .get(header::CONTENT_DISPOSITION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.body().await.expect("body");
            let text = String::from_utf8(body.to_vec()).expect("utf-8 body");
            LastResponse {
                status: Some(status),
                content_disposition,
                json: serde_json::from_str(&text).ok(),
                text,
            }
        });
        self.scenario.borrow_mut().last = last;
    }

    pub(crate) fn create_category(&self, name: &str) {
        self.request(
            Method::POST,
            "/api/categories",
            Some("admin"),
            Some(json!({ "name": name })),
        );
        let id = self.json()["category"]["id"]
            .as_i64()
            .expect("category id");
        self.scenario
            .borrow_mut()
            .categories
            .insert(name.to_owned(), id);
    }

    pub(crate) fn create_recipe(&self, title: &str, category: Option<&str>) {
        let category_id = category.map(|name| self.category_id(name));
        self.request(
            Method::POST,
            "/api/recipes",
            Some("admin"),
            Some(json!({
                "title": title,
                "description": format!("All about {title}"),
                "ingredients": "Flour, Eggs",
                "instructions": "Mix and cook.",
                "category_id": category_id,
            })),
        );
        assert_eq!(self.status(), 201, "recipe created: {}", self.text());
        let id = self.json()["recipe"]["id"].as_i64().expect("recipe id");
        self.scenario
            .borrow_mut()
            .recipes
            .insert(title.to_owned(), id);
    }

    pub(crate) fn category_id(&self, name: &str) -> i64 {
        *self
            .scenario
            .borrow()
            .categories
            .get(name)
            .expect("category created")
    }

    pub(crate) fn recipe_id(&self, title: &str) -> i64 {
        *self
            .scenario
            .borrow()
            .recipes
            .get(title)
            .expect("recipe created")
    }

    pub(crate) fn status(&self) -> u16 {
        self.scenario.borrow().last.status.expect("a request was sent")
    }

    pub(crate) fn json(&self) -> Value {
        self.scenario
            .borrow()
            .last
            .json
            .clone()
            .expect("JSON response body")
    }

    pub(crate) fn text(&self) -> String {
        self.scenario.borrow().last.text.clone()
    }

    pub(crate) fn content_disposition(&self) -> Option<String> {
        self.scenario.borrow().last.content_disposition.clone()
    }

    /// Titles of the recipes in the last listing, in response order.
    pub(crate) fn listed_titles(&self) -> Vec<String> {
        self.json()["recipes"]
            .as_array()
            .expect("recipes array")
            .iter()
            .filter_map(|recipe| recipe["title"].as_str().map(str::to_owned))
            .collect()
    }
}
