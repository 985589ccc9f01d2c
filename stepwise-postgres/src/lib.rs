//! # stepwise-postgres
//!
//! PostgreSQL backend for the stepwise migration runner.
//!
//! This crate provides:
//! - [`PgExecutor`], running committed batches with `tokio-postgres`
//! - [`PgIndicator`], the single-row version table
//! - [`PgPool`] / [`PgConfig`], connection pooling via `deadpool-postgres`
//! - [`run`], wiring all of the above from a [`MigrateConfig`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use stepwise_migrate::{MigrateConfig, Migration};
//!
//! # async fn example(
//! #     migrations: Vec<Box<dyn Migration>>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! stepwise_migrate::logging::init();
//!
//! let config = MigrateConfig::from_file("stepwise.toml")?;
//! let report = stepwise_postgres::run(&config, &migrations).await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod indicator;
pub mod pool;

pub use config::PgConfig;
pub use error::{PgError, PgResult};
pub use executor::PgExecutor;
pub use indicator::PgIndicator;
pub use pool::PgPool;

use stepwise_migrate::{MigrateConfig, MigrateResult, Migration, RunReport, Runner};

/// Apply `migrations` to the database described by `config`.
///
/// The pool is closed before returning, whatever the outcome.
pub async fn run(
    config: &MigrateConfig,
    migrations: &[Box<dyn Migration>],
) -> MigrateResult<RunReport> {
    let pg = PgConfig::from_migrate_config(config)?;
    let pool = PgPool::with_max_connections(pg, config.database.max_connections)?;

    let executor = PgExecutor::new(pool.clone());
    let indicator = PgIndicator::with_table(pool.clone(), config.migrations.table_name.as_str());

    let result = Runner::new(executor, indicator)
        .dry_run(config.migrations.dry_run)
        .run(migrations)
        .await;

    pool.close();
    result
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::PgConfig;
    pub use crate::error::{PgError, PgResult};
    pub use crate::executor::PgExecutor;
    pub use crate::indicator::PgIndicator;
    pub use crate::pool::PgPool;
}
