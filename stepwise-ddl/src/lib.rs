//! # stepwise-ddl
//!
//! DDL statement building for the stepwise migration toolkit.
//!
//! This crate provides:
//! - Plain definition types for columns, constraints and indexes
//! - Fluent builders that assemble those definitions
//! - A [`Dialect`] trait isolating all SQL syntax, with a PostgreSQL implementation
//! - A [`StatementBuilder`] that accumulates one transaction worth of statements
//!
//! ## Example
//!
//! ```rust
//! use stepwise_ddl::{ColumnDefinition, ConstraintDefinition, IndexDefinition, StatementBuilder};
//!
//! let mut builder = StatementBuilder::postgres();
//! builder.begin();
//! builder
//!     .create_table(
//!         "posts",
//!         &[
//!             ColumnDefinition::builder("id", "BIGINT").auto_increment(true).build(),
//!             ColumnDefinition::builder("author_id", "BIGINT")
//!                 .foreign_key(true, "users", ["id"])
//!                 .build(),
//!             ColumnDefinition::new("title", "TEXT"),
//!         ],
//!         &[ConstraintDefinition::builder().with_columns(["id"]).primary_key().build()],
//!     )
//!     .add_index(IndexDefinition::new("idx_posts_author", ["author_id"]));
//!
//! let batch = builder.commit();
//! assert!(batch.contains(r#"CREATE TABLE IF NOT EXISTS "posts""#));
//! ```
//!
//! ## Trust boundary
//!
//! Identifiers are double-quoted. Column types, default values, check
//! expressions and index predicates are written into the SQL verbatim and
//! must come from trusted migration code.

pub mod builder;
pub mod definition;
pub mod dialect;
pub mod fluent;

pub use builder::{AlterColumnBuilder, StatementBuilder, TableBuilder};
pub use definition::{
    ColumnAlteration, ColumnDefinition, ConstraintDefinition, ConstraintKind, ForeignReference,
    IndexDefinition,
};
pub use dialect::{Dialect, Postgres};
pub use fluent::{ColumnBuilder, ConstraintBuilder, IndexBuilder};
