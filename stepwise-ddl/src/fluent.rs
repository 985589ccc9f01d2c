//! Chained builders for the definition types.
//!
//! ```rust
//! use stepwise_ddl::ColumnDefinition;
//!
//! let column = ColumnDefinition::builder("owner_id", "BIGINT")
//!     .nullable(true)
//!     .foreign_key(true, "users", ["id"])
//!     .build();
//!
//! assert!(column.is_foreign_key());
//! ```

use crate::definition::{
    ColumnDefinition, ConstraintDefinition, ConstraintKind, ForeignReference, IndexDefinition,
};

/// Builder for [`ColumnDefinition`].
#[derive(Debug, Clone, Default)]
pub struct ColumnBuilder {
    definition: ColumnDefinition,
}

impl ColumnBuilder {
    /// Create a new builder.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            definition: ColumnDefinition::new(name, data_type),
        }
    }

    /// Set the column name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.definition.name = name.into();
        self
    }

    /// Set the column type.
    pub fn with_type(mut self, data_type: impl Into<String>) -> Self {
        self.definition.data_type = data_type.into();
        self
    }

    /// Set the default expression.
    pub fn with_default(mut self, expression: impl Into<String>) -> Self {
        self.definition.default = Some(expression.into());
        self
    }

    /// Set whether the column accepts NULL.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.definition.nullable = nullable;
        self
    }

    /// Set whether the column is the primary key.
    pub fn primary_key(mut self, primary_key: bool) -> Self {
        self.definition.primary_key = primary_key;
        self
    }

    /// Set whether the column is unique.
    pub fn unique(mut self, unique: bool) -> Self {
        self.definition.unique = unique;
        self
    }

    /// Set or clear a foreign key reference.
    pub fn foreign_key<I, S>(mut self, enable: bool, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition.references = enable.then(|| ForeignReference::new(table, columns));
        self
    }

    /// Set the check expression.
    pub fn with_check(mut self, expression: impl Into<String>) -> Self {
        self.definition.check = Some(expression.into());
        self
    }

    /// Set whether the column is an identity column.
    pub fn auto_increment(mut self, auto_increment: bool) -> Self {
        self.definition.auto_increment = auto_increment;
        self
    }

    /// Finish the definition.
    pub fn build(self) -> ColumnDefinition {
        self.definition
    }
}

/// Builder for [`ConstraintDefinition`].
///
/// The kind setters overwrite each other; the last one wins.
#[derive(Debug, Clone, Default)]
pub struct ConstraintBuilder {
    definition: ConstraintDefinition,
}

impl ConstraintBuilder {
    /// Create a new builder for an unnamed primary key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the constraint name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.definition.name = Some(name.into());
        self
    }

    /// Set the constrained columns.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Make this a primary key constraint.
    pub fn primary_key(mut self) -> Self {
        self.definition.kind = ConstraintKind::PrimaryKey;
        self
    }

    /// Make this a unique constraint.
    pub fn unique(mut self) -> Self {
        self.definition.kind = ConstraintKind::Unique;
        self
    }

    /// Make this a foreign key constraint.
    pub fn foreign_key<I, S>(mut self, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition.kind = ConstraintKind::ForeignKey(ForeignReference::new(table, columns));
        self
    }

    /// Make this a check constraint.
    pub fn check(mut self, expression: impl Into<String>) -> Self {
        self.definition.kind = ConstraintKind::Check(expression.into());
        self
    }

    /// Finish the definition.
    pub fn build(self) -> ConstraintDefinition {
        self.definition
    }
}

/// Builder for [`IndexDefinition`].
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    definition: IndexDefinition,
}

impl IndexBuilder {
    /// Create a new builder for an unnamed index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the index name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.definition.name = Some(name.into());
        self
    }

    /// Set the indexed columns.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set whether the index is unique.
    pub fn unique(mut self, unique: bool) -> Self {
        self.definition.unique = unique;
        self
    }

    /// Restrict the index to rows matching `predicate`.
    pub fn with_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.definition.predicate = Some(predicate.into());
        self
    }

    /// Finish the definition.
    pub fn build(self) -> IndexDefinition {
        self.definition
    }
}
