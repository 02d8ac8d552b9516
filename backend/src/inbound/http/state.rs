//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services, which in turn only depend on ports. Handlers
//! stay testable without I/O by building the state over the in-memory
//! adapter or mocked ports.

use std::sync::Arc;

use crate::domain::ports::{
    AccessTokenRepository, CategoryRepository, FavoriteRepository, KetoRecipeSource,
    PasswordHasher, RecipeRepository, UserRepository,
};
use crate::domain::{
    AccountService, CategoryService, FavoriteService, KetoProxy, RecipeCsvExporter,
    RecipeSearchEngine, RecipeService,
};

/// Parameter object bundling every port implementation the HTTP layer needs.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn AccessTokenRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub categories: Arc<dyn CategoryRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub keto: Arc<dyn KetoRecipeSource>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub categories: CategoryService,
    pub recipes: RecipeService,
    pub search: RecipeSearchEngine,
    pub favorites: FavoriteService,
    pub exporter: RecipeCsvExporter,
    pub keto: KetoProxy,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Wire every domain service over the given ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// use recipe_catalogue::inbound::http::state::{HttpState, HttpStatePorts};
    /// use recipe_catalogue::outbound::keto::{KetoHttpIdentity, KetoHttpSource};
    /// use recipe_catalogue::outbound::memory::InMemoryCatalogue;
    /// use recipe_catalogue::outbound::security::Argon2PasswordHasher;
    /// use url::Url;
    ///
    /// let store = Arc::new(InMemoryCatalogue::new());
    /// let keto = KetoHttpSource::new(
    ///     Url::parse("https://keto.example").expect("url"),
    ///     Duration::from_secs(1),
    ///     KetoHttpIdentity {
    ///         host: "keto.example".to_owned(),
    ///         api_key: None,
    ///     },
    /// )
    /// .expect("client");
    /// let state = HttpState::new(HttpStatePorts {
    ///     users: store.clone(),
    ///     tokens: store.clone(),
    ///     hasher: Arc::new(Argon2PasswordHasher::new()),
    ///     categories: store.clone(),
    ///     recipes: store.clone(),
    ///     favorites: store,
    ///     keto: Arc::new(keto),
    /// });
    /// # let _ = state;
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            tokens,
            hasher,
            categories,
            recipes,
            favorites,
            keto,
        } = ports;
        Self {
            accounts: AccountService::new(Arc::clone(&users), tokens, hasher),
            categories: CategoryService::new(Arc::clone(&categories), Arc::clone(&recipes)),
            recipes: RecipeService::new(Arc::clone(&recipes), categories),
            search: RecipeSearchEngine::new(Arc::clone(&recipes)),
            favorites: FavoriteService::new(favorites, Arc::clone(&recipes), users),
            exporter: RecipeCsvExporter::new(recipes),
            keto: KetoProxy::new(keto),
        }
    }
}
