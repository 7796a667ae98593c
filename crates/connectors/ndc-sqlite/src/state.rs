//! Transient state used by the connector.
//!
//! This is initialized on startup.

use std::collections::BTreeMap;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info_span, Instrument};

use ndc_sqlite_configuration::{Configuration, DatabaseConnectionSettings, PoolSettings};
use query_engine_execution::metrics;

use crate::error::ServerError;

/// State for our connector.
pub struct State {
    pub configuration: Configuration,
    pub metrics: metrics::Metrics,
    pub metrics_registry: prometheus::Registry,
    /// One pool per allow-listed database, opened on first use.
    pools: RwLock<BTreeMap<String, SqlitePool>>,
}

/// Set up metrics and wrap the configuration inside a connector State.
pub async fn create_state(configuration: Configuration) -> Result<State, InitializationError> {
    let mut metrics_registry = prometheus::Registry::new();
    let metrics = async { metrics::initialise_metrics(&mut metrics_registry) }
        .instrument(info_span!("Setup metrics"))
        .await?;

    tracing::info!(
        databases = ?configuration.databases.keys().collect::<Vec<_>>(),
        default_database = ?configuration.default_database,
        "connector state created"
    );

    Ok(State {
        configuration,
        metrics,
        metrics_registry,
        pools: RwLock::new(BTreeMap::new()),
    })
}

impl State {
    /// The pool for the database a request selected, or the default database. `Ok(None)`
    /// when the request selected nothing and there is no default.
    pub async fn select_pool(
        &self,
        requested: Option<&str>,
    ) -> Result<Option<SqlitePool>, ServerError> {
        let (name, settings) = match self.configuration.select_database(requested) {
            Ok(None) => return Ok(None),
            Ok(Some(found)) => found,
            Err(name) => return Err(ServerError::PermissionDenied(name.to_string())),
        };

        if let Some(pool) = self.pools.read().await.get(name) {
            return Ok(Some(pool.clone()));
        }

        let mut pools = self.pools.write().await;
        // another request may have created it while we waited for the lock
        let pool = pools
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::info!(database = name, "opening connection pool");
                create_pool(settings, &self.configuration.pool_settings)
            })
            .clone();
        Ok(Some(pool))
    }

    /// Like `select_pool`, but a database must be selected.
    pub async fn require_pool(&self, requested: Option<&str>) -> Result<SqlitePool, ServerError> {
        self.select_pool(requested)
            .await?
            .ok_or(ServerError::MissingDatabase)
    }

    /// Refresh the pool gauges.
    pub async fn update_pool_metrics(&self) {
        let pools = self.pools.read().await;
        metrics::update_pool_metrics(pools.values(), &self.metrics);
    }

    /// How long a statement may run.
    pub fn statement_timeout(&self) -> Option<Duration> {
        self.configuration
            .query_settings
            .timeout_seconds
            .map(Duration::from_secs)
    }
}

/// Connections are opened lazily, so a database that cannot be opened fails the request that
/// uses it rather than this call.
fn create_pool(settings: &DatabaseConnectionSettings, pool_settings: &PoolSettings) -> SqlitePool {
    let connect_options = SqliteConnectOptions::new()
        .filename(&settings.path)
        .read_only(settings.read_only)
        .create_if_missing(settings.create_if_missing);

    SqlitePoolOptions::new()
        .max_connections(pool_settings.max_connections)
        .acquire_timeout(Duration::from_secs(pool_settings.pool_timeout))
        .idle_timeout(pool_settings.idle_timeout.map(Duration::from_secs))
        .max_lifetime(pool_settings.connection_lifetime.map(Duration::from_secs))
        .connect_lazy_with(connect_options)
}

/// State initialization error.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("error initializing metrics: {0}")]
    MetricsError(#[from] metrics::Error),
}
