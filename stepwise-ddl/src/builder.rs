//! Transaction-scoped statement accumulation.
//!
//! A [`StatementBuilder`] collects rendered statements between
//! [`begin`](StatementBuilder::begin) and
//! [`commit`](StatementBuilder::commit). The committed text is a complete
//! batch, `BEGIN;` through `COMMIT;`, ready to hand to an executor.
//!
//! ```rust
//! use stepwise_ddl::{ColumnDefinition, StatementBuilder};
//!
//! let mut builder = StatementBuilder::postgres();
//! builder.begin();
//! builder
//!     .alter_table("users")
//!     .add_column(ColumnDefinition::new("age", "INTEGER"))
//!     .rename_column("name", "full_name");
//! let batch = builder.commit();
//!
//! assert!(batch.starts_with("BEGIN;"));
//! assert!(batch.ends_with("COMMIT;"));
//! ```

use tracing::debug;

use crate::definition::{
    ColumnAlteration, ColumnDefinition, ConstraintDefinition, IndexDefinition,
};
use crate::dialect::{Dialect, Postgres};

/// Separator written after every statement in the buffer.
const STATEMENT_SEPARATOR: &str = "\n\n";

/// Accumulates DDL statements for one transaction.
pub struct StatementBuilder {
    dialect: Box<dyn Dialect>,
    buffer: String,
}

impl std::fmt::Debug for StatementBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementBuilder")
            .field("dialect", &self.dialect.name())
            .field("buffer_len", &self.buffer.len())
            .finish()
    }
}

impl Default for StatementBuilder {
    fn default() -> Self {
        Self::postgres()
    }
}

impl StatementBuilder {
    /// Create a builder rendering with `dialect`.
    pub fn new(dialect: impl Dialect + 'static) -> Self {
        Self {
            dialect: Box::new(dialect),
            buffer: String::new(),
        }
    }

    /// Create a builder for PostgreSQL.
    pub fn postgres() -> Self {
        Self::new(Postgres)
    }

    /// The dialect statements are rendered with.
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Text accumulated since the last `begin`.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Open a new transaction scope, discarding anything not yet committed.
    pub fn begin(&mut self) {
        if !self.buffer.is_empty() {
            debug!(
                discarded_bytes = self.buffer.len(),
                "Discarding uncommitted statements"
            );
        }
        self.buffer.clear();
        let begin = self.dialect.begin();
        self.push(begin);
    }

    /// Abandon the current transaction scope.
    pub fn rollback(&mut self) {
        debug!(dialect = self.dialect.name(), "Rolling back statement batch");
        self.buffer.clear();
    }

    /// Close the current transaction scope and return the full batch.
    ///
    /// The buffer is empty afterwards and the builder can be reused.
    pub fn commit(&mut self) -> String {
        self.buffer.push_str(&self.dialect.commit());
        let batch = std::mem::take(&mut self.buffer);
        debug!(bytes = batch.len(), "Committed statement batch");
        batch
    }

    /// Append `CREATE TABLE IF NOT EXISTS` and return a handle for further
    /// changes to the same table.
    pub fn create_table(
        &mut self,
        name: impl Into<String>,
        columns: &[ColumnDefinition],
        constraints: &[ConstraintDefinition],
    ) -> TableBuilder<'_> {
        let name = name.into();
        let sql = self.dialect.create_table(&name, columns, constraints);
        self.push(sql);
        TableBuilder {
            table: name,
            builder: self,
        }
    }

    /// Return a handle for changes to an existing table without emitting anything.
    pub fn alter_table(&mut self, name: impl Into<String>) -> TableBuilder<'_> {
        TableBuilder {
            table: name.into(),
            builder: self,
        }
    }

    /// Append `DROP TABLE IF EXISTS`.
    pub fn drop_table(&mut self, name: &str) -> &mut Self {
        let sql = self.dialect.drop_table(name);
        self.push(sql);
        self
    }

    /// Append `TRUNCATE TABLE`.
    pub fn truncate_table(&mut self, name: &str) -> &mut Self {
        let sql = self.dialect.truncate_table(name);
        self.push(sql);
        self
    }

    fn push(&mut self, statement: String) {
        debug!(sql = %statement, "Queued statement");
        self.buffer.push_str(&statement);
        self.buffer.push_str(STATEMENT_SEPARATOR);
    }
}

/// Table-scoped view of a [`StatementBuilder`].
///
/// Every method appends exactly one statement to the shared buffer.
#[derive(Debug)]
pub struct TableBuilder<'a> {
    table: String,
    builder: &'a mut StatementBuilder,
}

impl<'a> TableBuilder<'a> {
    /// The table this handle is bound to.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Rename the table. Subsequent calls on this handle target the new name.
    pub fn rename(&mut self, new_name: impl Into<String>) -> &mut Self {
        let new_name = new_name.into();
        let sql = self.builder.dialect.rename_table(&self.table, &new_name);
        self.builder.push(sql);
        self.table = new_name;
        self
    }

    /// Add a column.
    pub fn add_column(&mut self, column: ColumnDefinition) -> &mut Self {
        let sql = self.builder.dialect.add_column(&self.table, &column);
        self.builder.push(sql);
        self
    }

    /// Add a table constraint.
    pub fn add_constraint(&mut self, constraint: ConstraintDefinition) -> &mut Self {
        let sql = self.builder.dialect.add_constraint(&self.table, &constraint);
        self.builder.push(sql);
        self
    }

    /// Create an index on this table.
    pub fn add_index(&mut self, index: IndexDefinition) -> &mut Self {
        let sql = self.builder.dialect.create_index(&self.table, &index);
        self.builder.push(sql);
        self
    }

    /// Change an existing column through an [`AlterColumnBuilder`].
    pub fn alter_column<F>(&mut self, column: &str, configure: F) -> &mut Self
    where
        F: FnOnce(&mut AlterColumnBuilder<'_>),
    {
        let mut alter = AlterColumnBuilder {
            table: &self.table,
            column,
            builder: &mut *self.builder,
        };
        configure(&mut alter);
        self
    }

    /// Drop a column.
    pub fn drop_column(&mut self, column: &str) -> &mut Self {
        let sql = self.builder.dialect.drop_column(&self.table, column);
        self.builder.push(sql);
        self
    }

    /// Drop a constraint by name.
    pub fn drop_constraint(&mut self, constraint: &str) -> &mut Self {
        let sql = self.builder.dialect.drop_constraint(&self.table, constraint);
        self.builder.push(sql);
        self
    }

    /// Drop an index by name.
    pub fn drop_index(&mut self, index: &str) -> &mut Self {
        let sql = self.builder.dialect.drop_index(&self.table, index);
        self.builder.push(sql);
        self
    }

    /// Rename a column.
    pub fn rename_column(&mut self, old: &str, new: &str) -> &mut Self {
        let sql = self.builder.dialect.rename_column(&self.table, old, new);
        self.builder.push(sql);
        self
    }

    /// Rename a constraint.
    pub fn rename_constraint(&mut self, old: &str, new: &str) -> &mut Self {
        let sql = self.builder.dialect.rename_constraint(&self.table, old, new);
        self.builder.push(sql);
        self
    }

    /// Rename an index.
    pub fn rename_index(&mut self, old: &str, new: &str) -> &mut Self {
        let sql = self.builder.dialect.rename_index(&self.table, old, new);
        self.builder.push(sql);
        self
    }
}

/// Column-scoped view of a [`StatementBuilder`], handed to the
/// [`TableBuilder::alter_column`] callback.
#[derive(Debug)]
pub struct AlterColumnBuilder<'a> {
    table: &'a str,
    column: &'a str,
    builder: &'a mut StatementBuilder,
}

impl AlterColumnBuilder<'_> {
    /// Append one alteration.
    pub fn apply(&mut self, alteration: ColumnAlteration) -> &mut Self {
        let sql = self
            .builder
            .dialect
            .alter_column(self.table, self.column, &alteration);
        self.builder.push(sql);
        self
    }

    /// Change the column type.
    pub fn set_type(&mut self, data_type: impl Into<String>) -> &mut Self {
        self.apply(ColumnAlteration::SetType(data_type.into()))
    }

    /// Set the default expression.
    pub fn set_default(&mut self, expression: impl Into<String>) -> &mut Self {
        self.apply(ColumnAlteration::SetDefault(expression.into()))
    }

    /// Remove the default expression.
    pub fn drop_default(&mut self) -> &mut Self {
        self.apply(ColumnAlteration::DropDefault)
    }

    /// Allow NULL.
    pub fn set_nullable(&mut self) -> &mut Self {
        self.apply(ColumnAlteration::SetNullable)
    }

    /// Disallow NULL.
    pub fn drop_nullable(&mut self) -> &mut Self {
        self.apply(ColumnAlteration::DropNullable)
    }

    /// Make the column an identity column.
    pub fn set_auto_increment(&mut self) -> &mut Self {
        self.apply(ColumnAlteration::SetAutoIncrement)
    }

    /// Remove the identity property.
    pub fn drop_auto_increment(&mut self) -> &mut Self {
        self.apply(ColumnAlteration::DropAutoIncrement)
    }
}
