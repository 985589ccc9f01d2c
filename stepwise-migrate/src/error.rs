//! Error types for the migration runner.

use thiserror::Error;

/// Result type alias for migration operations.
pub type MigrateResult<T> = Result<T, MigrationError>;

/// Errors that can occur during migration operations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Statement execution or bookkeeping failure reported by the database.
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A migration's own code refused to produce its statements.
    #[error("Migration rejected: {0}")]
    Authoring(String),

    /// The recorded version does not correspond to any known migration.
    #[error("Version mismatch: recorded migration '{name}' not found in the migration list")]
    NotFound {
        /// Name recorded in the bookkeeping table.
        name: String,
    },

    /// Up failed and the compensating Down was applied.
    #[error("Migration '{name}' failed and was compensated: {reason}")]
    UpFailed {
        /// Failed migration.
        name: String,
        /// Why Up failed.
        reason: String,
    },

    /// Up failed and the compensating Down failed too.
    #[error(
        "Migration '{name}' failed and its compensation failed, schema state is unknown: \
         up: {up_reason}; down: {down_reason}"
    )]
    CompensationFailed {
        /// Failed migration.
        name: String,
        /// Why Up failed.
        up_reason: String,
        /// Why Down failed.
        down_reason: String,
    },
}

impl MigrationError {
    /// Create a database error.
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an authoring error, for use inside `up`/`down`.
    pub fn authoring(msg: impl Into<String>) -> Self {
        Self::Authoring(msg.into())
    }

    /// Create a version-mismatch error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Whether the schema may be inconsistent with the recorded version and
    /// needs manual inspection before anything else runs.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::CompensationFailed { .. })
    }

    /// The migration a runner failure refers to, if any.
    pub fn migration_name(&self) -> Option<&str> {
        match self {
            Self::NotFound { name }
            | Self::UpFailed { name, .. }
            | Self::CompensationFailed { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for MigrationError {
    fn from(err: toml::de::Error) -> Self {
        MigrationError::Config(format!("Failed to parse TOML: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MigrationError::not_found("20240101_create_users");
        let msg = err.to_string();
        assert!(msg.contains("20240101_create_users"));
        assert!(msg.contains("Version mismatch"));
    }

    #[test]
    fn test_compensation_failed_display() {
        let err = MigrationError::CompensationFailed {
            name: "add_posts".to_string(),
            up_reason: "syntax error".to_string(),
            down_reason: "relation missing".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("add_posts"));
        assert!(msg.contains("syntax error"));
        assert!(msg.contains("relation missing"));
    }

    #[test]
    fn test_is_fatal() {
        assert!(MigrationError::not_found("x").is_fatal());
        assert!(
            MigrationError::CompensationFailed {
                name: "x".into(),
                up_reason: "a".into(),
                down_reason: "b".into(),
            }
            .is_fatal()
        );
        assert!(
            !MigrationError::UpFailed {
                name: "x".into(),
                reason: "a".into(),
            }
            .is_fatal()
        );
        assert!(!MigrationError::database("connection reset").is_fatal());
    }

    #[test]
    fn test_migration_name() {
        let err = MigrationError::UpFailed {
            name: "add_posts".into(),
            reason: "boom".into(),
        };
        assert_eq!(err.migration_name(), Some("add_posts"));
        assert_eq!(MigrationError::config("bad").migration_name(), None);
    }
}
