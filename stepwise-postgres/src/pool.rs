//! Connection pool for PostgreSQL.

use std::sync::Arc;
use std::time::Duration;

use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use tokio_postgres::NoTls;
use tracing::{debug, info};

use crate::config::PgConfig;
use crate::error::{PgError, PgResult};

/// A connection pool for PostgreSQL.
///
/// A migration run only ever holds one connection at a time; the pool exists
/// so the executor and the version indicator can share connections.
#[derive(Clone)]
pub struct PgPool {
    inner: Pool,
    config: Arc<PgConfig>,
}

impl PgPool {
    /// Create a pool with the default size.
    pub fn new(config: PgConfig) -> PgResult<Self> {
        Self::with_max_connections(config, 2)
    }

    /// Create a pool holding at most `max_connections` connections.
    pub fn with_max_connections(config: PgConfig, max_connections: usize) -> PgResult<Self> {
        let mgr = Manager::from_config(
            config.to_pg_config(),
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let pool = Pool::builder(mgr)
            .max_size(max_connections)
            .wait_timeout(Some(config.connect_timeout))
            .create_timeout(Some(config.connect_timeout))
            .recycle_timeout(Some(Duration::from_secs(5)))
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| PgError::config(format!("failed to create pool: {}", e)))?;

        info!(
            host = %config.host,
            port = %config.port,
            database = %config.database,
            max_connections,
            "PostgreSQL connection pool created"
        );

        Ok(Self {
            inner: pool,
            config: Arc::new(config),
        })
    }

    /// Get a connection from the pool.
    pub async fn get(&self) -> PgResult<Object> {
        debug!("Acquiring connection from pool");
        Ok(self.inner.get().await?)
    }

    /// Get the connection configuration.
    pub fn config(&self) -> &PgConfig {
        &self.config
    }

    /// Close the pool and all connections.
    pub fn close(&self) {
        self.inner.close();
        info!("PostgreSQL connection pool closed");
    }
}

impl std::fmt::Debug for PgPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.inner.status();
        f.debug_struct("PgPool")
            .field("host", &self.config.host)
            .field("database", &self.config.database)
            .field("size", &status.size)
            .field("max_size", &status.max_size)
            .finish()
    }
}
