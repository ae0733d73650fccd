//! Backend entry-point: loads settings, prepares the database and serves the
//! callable, change-feed and probe endpoints.

mod server;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ortho_config::OrthoConfig;
use server::{ServerConfig, ServerSettings, create_server, drain_on, shutdown_signal};
use torotoro_backend::inbound::http::health::HealthState;
use torotoro_backend::outbound::persistence::{DbPool, run_pending_migrations};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load configuration: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let database_url = settings.database_url().map_err(std::io::Error::other)?;

    if settings.run_migrations() {
        run_pending_migrations(database_url)
            .await
            .map_err(std::io::Error::other)?;
    }

    let pool_config = settings.pool_config().map_err(std::io::Error::other)?;
    let pool = DbPool::new(pool_config)
        .await
        .map_err(std::io::Error::other)?;

    let policy = settings.admin_grant_policy();
    if policy.allow_self_grant {
        warn!("admin self-grant is enabled; do not use this setting in production");
    }
    if settings.trigger_token.is_none() {
        warn!("no trigger token configured; change-feed endpoints accept any caller");
    }

    let config = ServerConfig::new(bind_addr)
        .with_db_pool(pool)
        .with_admin_grant_policy(policy)
        .with_trigger_token(settings.trigger_token.clone())
        .with_change_feed_poll_interval(settings.change_feed_poll_interval());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    actix_web::rt::spawn(drain_on(shutdown_signal(), health_state, server.handle()));
    info!(%bind_addr, "server listening");
    server.await
}
