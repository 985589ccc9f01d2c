//! # stepwise-migrate
//!
//! Ordered, resumable schema migrations.
//!
//! This crate provides:
//! - The [`Migration`] authoring trait and the closure-backed [`FnMigration`]
//! - The [`StatementExecutor`] and [`VersionIndicator`] seams a database
//!   backend implements
//! - The [`Runner`] state machine applying pending migrations one transaction
//!   at a time, compensating a failed `up` with its `down`
//! - [`MigrateConfig`] loading and [`logging`] setup
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐  up/down   ┌──────────────────┐  batch   ┌──────────┐
//! │ Migration  │───────────▶│ StatementBuilder │─────────▶│ Executor │
//! └────────────┘            └──────────────────┘          └──────────┘
//!        ▲                                                      │
//!        │ resume after                                         ▼
//! ┌──────────────────┐        last committed name          ┌────────┐
//! │ VersionIndicator │◀────────────────────────────────────│ Runner │
//! └──────────────────┘                                     └────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use stepwise_ddl::ColumnDefinition;
//! use stepwise_migrate::{FnMigration, MemoryIndicator, Migration, RecordingExecutor, Runner};
//!
//! # tokio_test_block(async {
//! let migrations: Vec<Box<dyn Migration>> = vec![Box::new(FnMigration::new(
//!     "20240101_create_users",
//!     |b| {
//!         b.create_table("users", &[ColumnDefinition::new("id", "BIGINT")], &[]);
//!         Ok(())
//!     },
//!     |b| {
//!         b.drop_table("users");
//!         Ok(())
//!     },
//! ))];
//!
//! let executor = RecordingExecutor::new();
//! let indicator = MemoryIndicator::new();
//! let report = Runner::new(&executor, &indicator).run(&migrations).await.unwrap();
//!
//! assert_eq!(report.current, "20240101_create_users");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! ## Failure handling
//!
//! A failing `up` is compensated by running the same migration's `down` in
//! a fresh transaction; the run then stops with
//! [`MigrationError::UpFailed`]. If the `down` fails as well, the run stops
//! with [`MigrationError::CompensationFailed`] and the schema needs manual
//! inspection. Migrations committed earlier in the same run stay recorded.

pub mod config;
pub mod error;
pub mod executor;
pub mod indicator;
pub mod logging;
pub mod memory;
pub mod migration;
pub mod runner;

pub use config::{DatabaseConfig, MigrateConfig, MigrationsConfig};
pub use error::{MigrateResult, MigrationError};
pub use executor::StatementExecutor;
pub use indicator::{DEFAULT_VERSION_TABLE, VersionIndicator};
pub use memory::{MemoryIndicator, RecordingExecutor};
pub use migration::{FnMigration, Migration};
pub use runner::{RunReport, Runner};
