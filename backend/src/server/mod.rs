//! Server construction and middleware wiring.

mod config;
mod shutdown;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};
pub use shutdown::{drain_on, shutdown_signal};

use state_builders::{ServerServices, build_services};
use tracing::info;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use torotoro_backend::Trace;
#[cfg(debug_assertions)]
use torotoro_backend::doc::ApiDoc;
use torotoro_backend::inbound::http::health::{HealthState, live, ready};
use torotoro_backend::inbound::http::state::HttpState;
use torotoro_backend::inbound::http::{callable, triggers};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1").configure(callable::configure);
    let feed = web::scope("/triggers").configure(triggers::configure);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(feed)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// The health state is marked ready once the listener is bound. With a
/// database configured, the comment change relay is spawned on the current
/// runtime and polls the outbox until the runtime stops. Signal handling is
/// left to the caller (see [`drain_on`]).
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerServices { http_state, relay } = build_services(&config);
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .disable_signals()
    .bind(bind_addr)?
    .run();

    if let Some(relay) = relay {
        let interval = config.change_feed_poll_interval;
        info!(interval_ms = interval.as_millis(), "starting comment change relay");
        actix_web::rt::spawn(relay.run(interval));
    }

    health_state.mark_ready();
    Ok(server)
}
