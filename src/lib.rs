//! # Stepwise
//!
//! Ordered, resumable schema migrations for PostgreSQL.
//!
//! Stepwise provides:
//! - A dialect-aware DDL statement builder with idempotent output
//! - A migration runner that resumes after the last recorded migration
//! - Compensation of a failed `up` by the same migration's `down`
//! - A single-row version table in the target database
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stepwise::prelude::*;
//!
//! struct CreateUsers;
//!
//! impl Migration for CreateUsers {
//!     fn name(&self) -> &str {
//!         "20240101_create_users"
//!     }
//!
//!     fn up(&self, builder: &mut StatementBuilder) -> MigrateResult<()> {
//!         builder.create_table(
//!             "users",
//!             &[
//!                 ColumnDefinition::builder("id", "BIGINT")
//!                     .primary_key(true)
//!                     .auto_increment(true)
//!                     .build(),
//!                 ColumnDefinition::builder("email", "TEXT").unique(true).build(),
//!             ],
//!             &[],
//!         );
//!         Ok(())
//!     }
//!
//!     fn down(&self, builder: &mut StatementBuilder) -> MigrateResult<()> {
//!         builder.drop_table("users");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), MigrationError> {
//!     let config = MigrateConfig::from_file("stepwise.toml")?;
//!     let migrations: Vec<Box<dyn Migration>> = vec![Box::new(CreateUsers)];
//!
//!     let report = stepwise::postgres::run(&config, &migrations).await?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// DDL definitions, builders and dialects.
pub mod ddl {
    pub use stepwise_ddl::*;
}

/// Migration runner, configuration and logging.
pub mod migrate {
    pub use stepwise_migrate::*;
}

/// PostgreSQL executor and version table.
#[cfg(feature = "postgres")]
#[cfg_attr(docsrs, doc(cfg(feature = "postgres")))]
pub mod postgres {
    pub use stepwise_postgres::*;
}

pub use stepwise_migrate::logging;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use stepwise_ddl::{
        ColumnAlteration, ColumnDefinition, ConstraintDefinition, IndexDefinition, Postgres,
        StatementBuilder,
    };
    pub use stepwise_migrate::{
        FnMigration, MigrateConfig, MigrateResult, Migration, MigrationError, RunReport, Runner,
        StatementExecutor, VersionIndicator,
    };

    #[cfg(feature = "postgres")]
    pub use stepwise_postgres::{PgExecutor, PgIndicator, PgPool};
}

// Re-export key types at the crate root
pub use stepwise_ddl::StatementBuilder;
pub use stepwise_migrate::{MigrateConfig, Migration, MigrationError, Runner};
