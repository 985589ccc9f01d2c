//! Plain value types describing schema objects.
//!
//! These carry no behavior; a [`Dialect`](crate::dialect::Dialect) renders
//! them into SQL. Nothing here is validated: inconsistent input (a foreign
//! key with a different number of local and remote columns, for example)
//! surfaces as malformed SQL when the statement is executed.

use serde::{Deserialize, Serialize};

/// Target of a foreign key reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignReference {
    /// Referenced table.
    pub table: String,
    /// Referenced columns, matched positionally against the local columns.
    pub columns: Vec<String>,
}

impl ForeignReference {
    /// Create a new reference.
    pub fn new<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// A single column of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Dialect-native type, rendered verbatim (e.g. `BIGINT`, `VARCHAR(255)`).
    pub data_type: String,
    /// Default expression, rendered verbatim.
    pub default: Option<String>,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Column-level primary key.
    pub primary_key: bool,
    /// Column-level unique constraint.
    pub unique: bool,
    /// Column-level foreign key.
    pub references: Option<ForeignReference>,
    /// Check expression, rendered verbatim.
    pub check: Option<String>,
    /// Identity column.
    pub auto_increment: bool,
}

impl ColumnDefinition {
    /// Create a non-nullable column with no other attributes.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            ..Default::default()
        }
    }

    /// Start a fluent [`ColumnBuilder`](crate::fluent::ColumnBuilder).
    pub fn builder(
        name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> crate::fluent::ColumnBuilder {
        crate::fluent::ColumnBuilder::new(name, data_type)
    }

    /// Whether this column carries a foreign key.
    pub fn is_foreign_key(&self) -> bool {
        self.references.is_some()
    }
}

/// Variant of a table-level constraint together with its payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// `PRIMARY KEY (...)`
    #[default]
    PrimaryKey,
    /// `UNIQUE (...)`
    Unique,
    /// `FOREIGN KEY (...) REFERENCES "table" (...)`
    ForeignKey(ForeignReference),
    /// `CHECK (expression)`; the column list is ignored.
    Check(String),
}

/// A table-level constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintDefinition {
    /// Optional constraint name; unnamed constraints get a server-generated one.
    pub name: Option<String>,
    /// Constrained columns, in order.
    pub columns: Vec<String>,
    /// Constraint variant.
    pub kind: ConstraintKind,
}

impl ConstraintDefinition {
    /// Create a constraint of the given kind over `columns`.
    pub fn new<I, S>(kind: ConstraintKind, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            columns: columns.into_iter().map(Into::into).collect(),
            kind,
        }
    }

    /// Start a fluent [`ConstraintBuilder`](crate::fluent::ConstraintBuilder).
    pub fn builder() -> crate::fluent::ConstraintBuilder {
        crate::fluent::ConstraintBuilder::new()
    }
}

/// An index on a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Optional index name. PostgreSQL only honors `IF NOT EXISTS` for named indexes.
    pub name: Option<String>,
    /// Indexed columns, in order.
    pub columns: Vec<String>,
    /// Unique index.
    pub unique: bool,
    /// Partial index predicate, rendered verbatim after `WHERE`.
    pub predicate: Option<String>,
}

impl IndexDefinition {
    /// Create a named, non-unique index over `columns`.
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Some(name.into()),
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
            predicate: None,
        }
    }

    /// Start a fluent [`IndexBuilder`](crate::fluent::IndexBuilder).
    pub fn builder() -> crate::fluent::IndexBuilder {
        crate::fluent::IndexBuilder::new()
    }
}

/// A single change to an existing column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnAlteration {
    /// Change the column type.
    SetType(String),
    /// Set the default expression.
    SetDefault(String),
    /// Remove the default expression.
    DropDefault,
    /// Allow NULL.
    SetNullable,
    /// Disallow NULL.
    DropNullable,
    /// Turn the column into an identity column.
    SetAutoIncrement,
    /// Remove the identity property.
    DropAutoIncrement,
}
