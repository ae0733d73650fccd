//! Runtime settings and the server configuration built from them.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use torotoro_backend::domain::AdminGrantPolicy;
use torotoro_backend::outbound::persistence::{DbPool, PoolConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CHANGE_FEED_POLL_MS: u64 = 500;

/// Settings layered from CLI flags, `TOROTORO_*` variables and config files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TOROTORO")]
pub struct ServerSettings {
    /// Listen address, e.g. `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Apply embedded migrations before serving.
    pub run_migrations: Option<bool>,
    /// Let any authenticated caller grant the admin role to themselves.
    #[ortho_config(default = false)]
    pub allow_self_grant: bool,
    /// Shared secret change-feed deliveries must present.
    pub trigger_token: Option<String>,
    /// Milliseconds between reads of the comment change outbox.
    pub change_feed_poll_ms: Option<u64>,
}

/// Errors raised while interpreting [`ServerSettings`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("database URL is required (set TOROTORO_DATABASE_URL)")]
    MissingDatabaseUrl,
    #[error("invalid bind address {value}: {message}")]
    InvalidBindAddr { value: String, message: String },
}

impl ServerSettings {
    /// Listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Database URL; there is no default.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Whether to run migrations at startup; on unless disabled.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Interval between outbox reads; never shorter than one millisecond.
    pub fn change_feed_poll_interval(&self) -> Duration {
        Duration::from_millis(
            self.change_feed_poll_ms
                .unwrap_or(DEFAULT_CHANGE_FEED_POLL_MS)
                .max(1),
        )
    }

    /// Pool configuration derived from these settings.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        Ok(PoolConfig::new(self.database_url()?).with_max_size(self.db_max_connections()))
    }

    pub fn admin_grant_policy(&self) -> AdminGrantPolicy {
        AdminGrantPolicy {
            allow_self_grant: self.allow_self_grant,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) admin_grant_policy: AdminGrantPolicy,
    pub(crate) trigger_token: Option<String>,
    pub(crate) change_feed_poll_interval: Duration,
}

impl ServerConfig {
    /// Configuration with fixture ports and open trigger delivery.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            admin_grant_policy: AdminGrantPolicy::default(),
            trigger_token: None,
            change_feed_poll_interval: Duration::from_millis(DEFAULT_CHANGE_FEED_POLL_MS),
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without a pool every port falls back to its fixture implementation.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_admin_grant_policy(mut self, policy: AdminGrantPolicy) -> Self {
        self.admin_grant_policy = policy;
        self
    }

    /// Require change-feed deliveries to present `token`.
    #[must_use]
    pub fn with_trigger_token(mut self, token: Option<String>) -> Self {
        self.trigger_token = token;
        self
    }

    /// How often the change relay reads the outbox.
    #[must_use]
    pub fn with_change_feed_poll_interval(mut self, interval: Duration) -> Self {
        self.change_feed_poll_interval = interval;
        self
    }
}
