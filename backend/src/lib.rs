//! Recipe catalogue service library.
//!
//! The [`domain`] holds entities, policies, and services behind port traits;
//! [`inbound`] adapts HTTP onto those services and [`outbound`] implements
//! the ports over PostgreSQL, memory, and the keto upstream.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use middleware::Trace;
/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
