//! The migration runner.
//!
//! The runner is an explicit state machine:
//!
//! ```text
//!             recorded version?
//!        empty │          │ set
//!              ▼          ▼
//!   ┌──────────┐  found ┌─────────┐
//!   │ Applying │◀───────│ Seeking │──not found──┐
//!   └──────────┘        └─────────┘             │
//!     │   │  ▲ up ok                            ▼
//!     │   └──┘                              ┌────────┐
//!     │ up failed     ┌──────────────┐      │ Failed │
//!     └──────────────▶│ Compensating │─────▶└────────┘
//!     │ end of list   └──────────────┘
//!     ▼
//!   ┌──────┐
//!   │ Done │
//!   └──────┘
//! ```
//!
//! Every step is awaited to completion before the next one starts; nothing is
//! reordered, skipped ahead or run concurrently.

use std::time::Instant;

use stepwise_ddl::StatementBuilder;
use tracing::{debug, error, info, warn};

use crate::error::{MigrateResult, MigrationError};
use crate::executor::StatementExecutor;
use crate::indicator::VersionIndicator;
use crate::migration::Migration;

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Names of the migrations applied by this run, in order.
    pub applied: Vec<String>,
    /// Number of migrations that were already applied before this run.
    pub skipped: usize,
    /// Last applied migration after the run; empty if none ever was.
    pub current: String,
    /// Committed batches, one per applied migration.
    pub batches: Vec<String>,
    /// Whether batches were only built, not executed.
    pub dry_run: bool,
    /// Total duration in milliseconds.
    pub duration_ms: i64,
}

impl RunReport {
    fn new(current: String, dry_run: bool) -> Self {
        Self {
            current,
            dry_run,
            ..Self::default()
        }
    }

    /// Whether the run applied anything.
    pub fn has_changes(&self) -> bool {
        !self.applied.is_empty()
    }

    /// Get a summary of the run.
    pub fn summary(&self) -> String {
        if self.applied.is_empty() {
            return if self.current.is_empty() {
                "No migrations applied".to_string()
            } else {
                format!("Already up to date at '{}'", self.current)
            };
        }

        let prefix = if self.dry_run { "[DRY RUN] " } else { "" };
        format!(
            "{}{} applied, now at '{}' in {}ms",
            prefix,
            self.applied.len(),
            self.current,
            self.duration_ms
        )
    }
}

#[derive(Debug)]
enum RunState {
    Seeking,
    Applying { next: usize },
    Compensating { index: usize, cause: MigrationError },
    Done,
    Failed(MigrationError),
}

/// Applies an ordered list of migrations after the recorded version.
pub struct Runner<E: StatementExecutor, I: VersionIndicator> {
    executor: E,
    indicator: I,
    builder: StatementBuilder,
    dry_run: bool,
}

impl<E: StatementExecutor, I: VersionIndicator> Runner<E, I> {
    /// Create a runner emitting PostgreSQL.
    pub fn new(executor: E, indicator: I) -> Self {
        Self::with_builder(executor, indicator, StatementBuilder::postgres())
    }

    /// Create a runner with an explicit statement builder.
    pub fn with_builder(executor: E, indicator: I, builder: StatementBuilder) -> Self {
        Self {
            executor,
            indicator,
            builder,
            dry_run: false,
        }
    }

    /// Enable dry-run mode: batches are built and reported, never executed,
    /// and the version is never written.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The executor batches are handed to.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// The version indicator.
    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    /// Apply every migration after the recorded one.
    ///
    /// Returns [`MigrationError::NotFound`] if the recorded version is not in
    /// `migrations`, [`MigrationError::UpFailed`] if a migration failed and
    /// was compensated, and [`MigrationError::CompensationFailed`] if the
    /// compensation failed too. Migrations committed before a failure stay
    /// recorded.
    pub async fn run(&mut self, migrations: &[Box<dyn Migration>]) -> MigrateResult<RunReport> {
        let start = Instant::now();
        let recorded = self.indicator.current().await?;
        let mut report = RunReport::new(recorded.clone(), self.dry_run);

        info!(
            current = %recorded,
            total = migrations.len(),
            dry_run = self.dry_run,
            dialect = self.builder.dialect().name(),
            "Starting migration run"
        );

        let mut state = if recorded.is_empty() {
            RunState::Applying { next: 0 }
        } else {
            RunState::Seeking
        };

        loop {
            state = match state {
                RunState::Seeking => {
                    match migrations.iter().position(|m| m.name() == recorded) {
                        Some(index) => {
                            report.skipped = index + 1;
                            debug!(
                                resume_after = %recorded,
                                pending = migrations.len() - index - 1,
                                "Found resume point"
                            );
                            RunState::Applying { next: index + 1 }
                        }
                        None => RunState::Failed(MigrationError::not_found(recorded.as_str())),
                    }
                }
                RunState::Applying { next } => match migrations.get(next) {
                    None => RunState::Done,
                    Some(migration) => {
                        match self.apply(migration.as_ref(), &mut report).await {
                            Ok(()) => RunState::Applying { next: next + 1 },
                            Err(cause) => RunState::Compensating { index: next, cause },
                        }
                    }
                },
                RunState::Compensating { index, cause } => {
                    let failure = self.compensate(migrations[index].as_ref(), cause).await;
                    RunState::Failed(failure)
                }
                RunState::Done => {
                    self.persist(&report).await?;
                    report.duration_ms = start.elapsed().as_millis() as i64;
                    info!(summary = %report.summary(), "Migration run finished");
                    return Ok(report);
                }
                RunState::Failed(err) => {
                    error!(
                        error = %err,
                        fatal = err.is_fatal(),
                        migration = err.migration_name().unwrap_or_default(),
                        "Migration run failed"
                    );
                    self.persist(&report).await?;
                    return Err(err);
                }
            };
        }
    }

    /// Run `up` inside its own transaction and execute the batch.
    async fn apply(
        &mut self,
        migration: &dyn Migration,
        report: &mut RunReport,
    ) -> MigrateResult<()> {
        let name = migration.name();
        debug!(migration = %name, "Applying migration");

        self.builder.begin();
        if let Err(err) = migration.up(&mut self.builder) {
            self.builder.rollback();
            return Err(err);
        }

        let batch = self.builder.commit();
        if let Err(err) = self.execute(&batch).await {
            self.builder.rollback();
            return Err(err);
        }

        info!(migration = %name, dry_run = self.dry_run, "Migration applied");
        report.applied.push(name.to_string());
        report.current = name.to_string();
        report.batches.push(batch);
        Ok(())
    }

    /// Run `down` after a failed `up` and turn the outcome into the error
    /// the run terminates with.
    async fn compensate(
        &mut self,
        migration: &dyn Migration,
        cause: MigrationError,
    ) -> MigrationError {
        let name = migration.name().to_string();
        warn!(migration = %name, error = %cause, "Migration failed, applying compensating down");

        self.builder.begin();
        let outcome = match migration.down(&mut self.builder) {
            Ok(()) => {
                let batch = self.builder.commit();
                self.execute(&batch).await
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => {
                warn!(migration = %name, "Compensating down applied");
                MigrationError::UpFailed {
                    name,
                    reason: cause.to_string(),
                }
            }
            Err(down) => {
                self.builder.rollback();
                MigrationError::CompensationFailed {
                    name,
                    up_reason: cause.to_string(),
                    down_reason: down.to_string(),
                }
            }
        }
    }

    async fn execute(&self, batch: &str) -> MigrateResult<()> {
        if self.dry_run {
            debug!(bytes = batch.len(), "[DRY RUN] Skipping execution");
            return Ok(());
        }
        self.executor.execute(batch).await
    }

    /// Write the last committed migration, if this run committed any.
    async fn persist(&self, report: &RunReport) -> MigrateResult<()> {
        if self.dry_run || report.applied.is_empty() {
            return Ok(());
        }

        self.indicator.change(&report.current).await?;
        info!(version = %report.current, "Recorded schema version");
        Ok(())
    }
}
