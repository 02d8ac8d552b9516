//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use recipe_catalogue::domain::ports::KetoRecipeSource;
use recipe_catalogue::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) keto: Arc<dyn KetoRecipeSource>,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) seed_demo_data: bool,
}

impl ServerConfig {
    /// Construct a configuration backed by the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, keto: Arc<dyn KetoRecipeSource>) -> Self {
        Self {
            bind_addr,
            keto,
            db_pool: None,
            seed_demo_data: false,
        }
    }

    /// Attach a database connection pool; every repository port is then
    /// served by the Diesel adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Seed the demo catalogue before the listener starts.
    #[must_use]
    pub fn with_demo_data(mut self, enabled: bool) -> Self {
        self.seed_demo_data = enabled;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
