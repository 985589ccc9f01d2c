//! Error types for PostgreSQL operations.

use stepwise_migrate::MigrationError;
use thiserror::Error;

/// Result type for PostgreSQL operations.
pub type PgResult<T> = Result<T, PgError>;

/// Errors that can occur while talking to PostgreSQL.
#[derive(Error, Debug)]
pub enum PgError {
    /// Connection pool error.
    #[error("pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// PostgreSQL error.
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The bookkeeping table holds something unexpected.
    #[error("version table error: {0}")]
    VersionTable(String),
}

impl PgError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a version table error.
    pub fn version_table(message: impl Into<String>) -> Self {
        Self::VersionTable(message.into())
    }

    /// Check if this is a connection error.
    pub fn is_connection_error(&self) -> bool {
        match self {
            Self::Pool(_) => true,
            Self::Postgres(e) => e.is_closed(),
            _ => false,
        }
    }

    /// The SQLSTATE code reported by the server, if any.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Postgres(e) => e.code().map(|c| c.code()),
            _ => None,
        }
    }
}

impl From<PgError> for MigrationError {
    fn from(err: PgError) -> Self {
        match err {
            PgError::Config(msg) => MigrationError::Config(msg),
            PgError::Postgres(e) => match e.as_db_error() {
                Some(db) => MigrationError::database(format!(
                    "{} ({}): {}",
                    db.severity(),
                    db.code().code(),
                    db.message()
                )),
                None => MigrationError::database(e.to_string()),
            },
            other => MigrationError::database(other.to_string()),
        }
    }
}
