//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::{build_ports, seed_demo_data};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use tracing::info;

use recipe_catalogue::Trace;
#[cfg(debug_assertions)]
use recipe_catalogue::doc::ApiDoc;
use recipe_catalogue::inbound::http::api_scope;
use recipe_catalogue::inbound::http::health::{HealthState, live, ready};
use recipe_catalogue::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api_scope())
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// Demo data is seeded before the socket is bound when the configuration asks
/// for it.
///
/// # Errors
/// Propagates [`std::io::Error`] when seeding, binding the socket, or
/// registering metrics fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ports = build_ports(&config);
    if config.seed_demo_data {
        let report = seed_demo_data(&ports)
            .await
            .map_err(|err| std::io::Error::other(format!("demo seed failed: {err}")))?;
        info!(?report, "demo data seeding finished");
    }
    let http_state = web::Data::new(HttpState::new(ports));
    let server_health_state = health_state.clone();

    #[cfg(feature = "metrics")]
    let metrics = PrometheusMetricsBuilder::new("recipe_catalogue")
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("metrics registration failed: {err}")))?;

    let bind_addr = config.bind_addr();
    let server = HttpServer::new(move || {
        let app = build_app(server_health_state.clone(), http_state.clone());

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "recipe catalogue listening");
    health_state.mark_ready();
    Ok(server)
}
