//! Graceful shutdown: fail the liveness probe, then drain the server.

use std::future::Future;

use actix_web::dev::ServerHandle;
use actix_web::rt::signal;
use actix_web::web;
use tracing::{info, warn};

use torotoro_backend::inbound::http::health::HealthState;

/// Resolve on Ctrl-C, or on SIGTERM where the platform has it.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use actix_web::rt::signal::unix::{SignalKind, signal as unix_signal};

        match unix_signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
                return;
            }
            Err(error) => warn!(%error, "SIGTERM handler unavailable; waiting for Ctrl-C"),
        }
    }

    if let Err(error) = signal::ctrl_c().await {
        warn!(%error, "Ctrl-C handler unavailable; shutdown must be external");
        std::future::pending::<()>().await;
    }
}

/// Once `signal` resolves, mark the service unhealthy and stop `server`,
/// letting in-flight requests finish.
pub async fn drain_on<S>(signal: S, health_state: web::Data<HealthState>, server: ServerHandle)
where
    S: Future<Output = ()>,
{
    signal.await;
    health_state.mark_unhealthy();
    info!("shutdown requested; draining connections");
    server.stop(true).await;
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpServer};

    use super::*;

    #[actix_web::test]
    async fn shutdown_fails_liveness_and_stops_the_server() {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        let server = HttpServer::new(App::new)
            .workers(1)
            .disable_signals()
            .bind(("127.0.0.1", 0))
            .expect("bind ephemeral port")
            .run();
        let handle = server.handle();
        let running = actix_web::rt::spawn(server);

        drain_on(std::future::ready(()), health_state.clone(), handle).await;

        assert!(!health_state.is_alive());
        running
            .await
            .expect("server task joins")
            .expect("server stops cleanly");
    }
}
