//! The statement executor seam.

use crate::error::MigrateResult;

/// Runs committed statement batches against a database.
///
/// The batch is the exact text returned by
/// [`StatementBuilder::commit`](stepwise_ddl::StatementBuilder::commit),
/// `BEGIN;` through `COMMIT;`. On failure the implementation must leave its
/// connection outside of any open transaction; timeouts are its concern too.
#[async_trait::async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Execute one batch, reporting the failure reason if any statement fails.
    async fn execute(&self, batch: &str) -> MigrateResult<()>;
}

#[async_trait::async_trait]
impl<T: StatementExecutor + ?Sized> StatementExecutor for &T {
    async fn execute(&self, batch: &str) -> MigrateResult<()> {
        (**self).execute(batch).await
    }
}
