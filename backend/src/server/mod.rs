//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use medicare_backend::Trace;
#[cfg(debug_assertions)]
use medicare_backend::doc::ApiDoc;
use medicare_backend::inbound::http::configure_api;
use medicare_backend::inbound::http::health::{HealthState, live, ready};
use medicare_backend::inbound::http::state::HttpState;
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
        .configure(configure_api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the HTTP server and mark it ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(config);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
