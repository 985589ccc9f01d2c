//! Schema version bookkeeping.

use crate::error::MigrateResult;

/// Default name of the bookkeeping table.
pub const DEFAULT_VERSION_TABLE: &str = "_stepwise_version";

/// Persists the name of the most recently applied migration.
///
/// Implementations keep exactly one record once any migration has been
/// applied, and create their storage on first write. Every storage failure is
/// returned to the caller: bookkeeping must never drift silently from the
/// real schema. A single writer is assumed.
#[async_trait::async_trait]
pub trait VersionIndicator: Send + Sync {
    /// The last applied migration, or an empty string when nothing has been
    /// recorded yet (including when the bookkeeping table does not exist).
    async fn current(&self) -> MigrateResult<String>;

    /// Record `name` as the last applied migration.
    async fn change(&self, name: &str) -> MigrateResult<()>;
}

#[async_trait::async_trait]
impl<T: VersionIndicator + ?Sized> VersionIndicator for &T {
    async fn current(&self) -> MigrateResult<String> {
        (**self).current().await
    }

    async fn change(&self, name: &str) -> MigrateResult<()> {
        (**self).change(name).await
    }
}
