//! In-process executor and indicator.
//!
//! [`RecordingExecutor`] keeps every batch it is given instead of sending it
//! anywhere, and [`MemoryIndicator`] keeps the version in memory. Together
//! they let a migration list be exercised end to end without a database.
//!
//! These are not what [`Runner::dry_run`](crate::Runner::dry_run) uses: a dry
//! run keeps the configured executor and indicator, skips every `execute` and
//! only reads the recorded version.

use parking_lot::Mutex;

use crate::error::{MigrateResult, MigrationError};
use crate::executor::StatementExecutor;
use crate::indicator::VersionIndicator;

/// Executor that records batches.
///
/// Batches containing one of the configured failure markers are rejected,
/// which simulates a statement failing on the server.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    failure_markers: Vec<String>,
    committed: Mutex<Vec<String>>,
    rejected: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    /// Create an executor that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any batch whose text contains `marker`.
    pub fn fail_on(mut self, marker: impl Into<String>) -> Self {
        self.failure_markers.push(marker.into());
        self
    }

    /// Batches accepted so far, in execution order.
    pub fn committed(&self) -> Vec<String> {
        self.committed.lock().clone()
    }

    /// Batches rejected so far, in execution order.
    pub fn rejected(&self) -> Vec<String> {
        self.rejected.lock().clone()
    }
}

#[async_trait::async_trait]
impl StatementExecutor for RecordingExecutor {
    async fn execute(&self, batch: &str) -> MigrateResult<()> {
        if let Some(marker) = self.failure_markers.iter().find(|m| batch.contains(m.as_str())) {
            self.rejected.lock().push(batch.to_string());
            return Err(MigrationError::database(format!(
                "statement rejected: batch contains '{}'",
                marker
            )));
        }

        self.committed.lock().push(batch.to_string());
        Ok(())
    }
}

/// Indicator holding the version in memory.
#[derive(Debug, Default)]
pub struct MemoryIndicator {
    version: Mutex<Option<String>>,
    writes: Mutex<usize>,
    fail_writes: bool,
}

impl MemoryIndicator {
    /// Create an indicator with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an indicator that already records `name`.
    pub fn with_version(name: impl Into<String>) -> Self {
        Self {
            version: Mutex::new(Some(name.into())),
            ..Self::default()
        }
    }

    /// Make every `change` call fail.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// The recorded version, `None` if nothing was ever recorded.
    pub fn version(&self) -> Option<String> {
        self.version.lock().clone()
    }

    /// Number of successful `change` calls.
    pub fn writes(&self) -> usize {
        *self.writes.lock()
    }
}

#[async_trait::async_trait]
impl VersionIndicator for MemoryIndicator {
    async fn current(&self) -> MigrateResult<String> {
        Ok(self.version.lock().clone().unwrap_or_default())
    }

    async fn change(&self, name: &str) -> MigrateResult<()> {
        if self.fail_writes {
            return Err(MigrationError::database("version table is read-only"));
        }

        *self.version.lock() = Some(name.to_string());
        *self.writes.lock() += 1;
        Ok(())
    }
}
