//! Connection pool for the catalog store.
//!
//! One search holds several connections at once (count, page, and each
//! facet family), so the pool is sized for that fan-out rather than for
//! request concurrency alone.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use vitrine_core::config::env_or;
use vitrine_core::Result;

/// Upper bound on open connections. Sits above the per-search fan-out so a
/// single faceted search never waits on itself.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 16;

pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;

/// Seconds to wait for a free connection before the search fails as
/// store-unavailable.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

/// Sizing and timeouts for the catalog pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    /// Clamped to `max_connections` when the pool is built.
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    /// `None` keeps connections open until they go idle.
    pub max_lifetime: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
            max_lifetime: Some(Duration::from_secs(DEFAULT_MAX_LIFETIME_SECS)),
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load pool settings from the environment.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `VITRINE_DB_MAX_CONNECTIONS` | 16 |
    /// | `VITRINE_DB_MIN_CONNECTIONS` | 1 |
    /// | `VITRINE_DB_CONNECT_TIMEOUT_SECS` | 30 |
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            max_connections: env_or("VITRINE_DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: env_or("VITRINE_DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connect_timeout: Duration::from_secs(env_or(
                "VITRINE_DB_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?),
            ..defaults
        })
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    pub fn min_connections(mut self, n: u32) -> Self {
        self.min_connections = n;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    /// sqlx pool options for these settings.
    pub fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
    }
}

/// Connect with [`PoolConfig::default`].
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    create_pool_with_config(database_url, PoolConfig::default()).await
}

pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> Result<PgPool> {
    let start = Instant::now();

    info!(
        subsystem = "database",
        component = "pool",
        op = "create",
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        connect_timeout_secs = config.connect_timeout.as_secs(),
        "Connecting to catalog store"
    );

    let pool = config.options().connect(database_url).await?;

    info!(
        subsystem = "database",
        component = "pool",
        op = "established",
        pool_size = pool.size(),
        pool_idle = pool.num_idle(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Catalog store connected"
    );
    Ok(pool)
}

/// Log pool occupancy. Warns when nothing is idle, since the next faceted
/// search will queue on acquire.
pub fn log_pool_metrics(pool: &PgPool) {
    let size = pool.size();
    let idle = pool.num_idle();

    debug!(
        subsystem = "database",
        component = "pool",
        op = "metrics",
        pool_size = size,
        pool_idle = idle,
        "Pool occupancy"
    );

    if idle == 0 && size > 0 {
        warn!(
            subsystem = "database",
            component = "pool",
            pool_size = size,
            "Connection pool has no idle connections, searches may queue"
        );
    }
}
