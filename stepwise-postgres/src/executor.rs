//! Statement execution against PostgreSQL.

use stepwise_migrate::{MigrateResult, StatementExecutor};
use tracing::{debug, warn};

use crate::error::PgError;
use crate::pool::PgPool;

/// Runs committed batches on a pooled connection.
///
/// The whole batch goes to the server in one simple-query round trip, so the
/// `BEGIN;`/`COMMIT;` it carries delimit a real transaction.
#[derive(Debug, Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    /// Create an executor on `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The pool connections are taken from.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl StatementExecutor for PgExecutor {
    async fn execute(&self, batch: &str) -> MigrateResult<()> {
        let client = self.pool.get().await?;
        debug!(bytes = batch.len(), "Executing statement batch");

        if let Err(err) = client.batch_execute(batch).await {
            // A failed statement leaves the explicit transaction aborted.
            if let Err(rollback) = client.batch_execute("ROLLBACK;").await {
                warn!(error = %rollback, "Rollback after failed batch did not succeed");
            }
            return Err(PgError::from(err).into());
        }

        Ok(())
    }
}
