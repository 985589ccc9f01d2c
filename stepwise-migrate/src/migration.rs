//! The migration authoring interface.

use stepwise_ddl::StatementBuilder;

use crate::error::MigrateResult;

/// A named, reversible schema change.
///
/// `up` and `down` only describe statements against the builder; they never
/// touch the database themselves. The runner brackets each call with
/// `begin`/`commit` and hands the committed batch to the executor.
///
/// ```rust
/// use stepwise_ddl::{ColumnDefinition, StatementBuilder};
/// use stepwise_migrate::{MigrateResult, Migration};
///
/// struct AddAge;
///
/// impl Migration for AddAge {
///     fn name(&self) -> &str {
///         "20240102_add_age"
///     }
///
///     fn up(&self, builder: &mut StatementBuilder) -> MigrateResult<()> {
///         builder
///             .alter_table("users")
///             .add_column(ColumnDefinition::builder("age", "INTEGER").nullable(true).build());
///         Ok(())
///     }
///
///     fn down(&self, builder: &mut StatementBuilder) -> MigrateResult<()> {
///         builder.alter_table("users").drop_column("age");
///         Ok(())
///     }
/// }
/// ```
pub trait Migration: Send + Sync {
    /// Stable, unique name. This is what the version indicator records.
    fn name(&self) -> &str;

    /// Forward transformation.
    fn up(&self, builder: &mut StatementBuilder) -> MigrateResult<()>;

    /// Backward transformation, also used to compensate a failed `up`.
    fn down(&self, builder: &mut StatementBuilder) -> MigrateResult<()>;
}

type Step = Box<dyn Fn(&mut StatementBuilder) -> MigrateResult<()> + Send + Sync>;

/// A [`Migration`] assembled from two closures.
pub struct FnMigration {
    name: String,
    up: Step,
    down: Step,
}

impl FnMigration {
    /// Create a new closure-backed migration.
    pub fn new<U, D>(name: impl Into<String>, up: U, down: D) -> Self
    where
        U: Fn(&mut StatementBuilder) -> MigrateResult<()> + Send + Sync + 'static,
        D: Fn(&mut StatementBuilder) -> MigrateResult<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            up: Box::new(up),
            down: Box::new(down),
        }
    }
}

impl std::fmt::Debug for FnMigration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMigration")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Migration for FnMigration {
    fn name(&self) -> &str {
        &self.name
    }

    fn up(&self, builder: &mut StatementBuilder) -> MigrateResult<()> {
        (self.up)(builder)
    }

    fn down(&self, builder: &mut StatementBuilder) -> MigrateResult<()> {
        (self.down)(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MigrationError;

    #[test]
    fn test_fn_migration_dispatch() {
        let migration = FnMigration::new(
            "drop_sessions",
            |b| {
                b.drop_table("sessions");
                Ok(())
            },
            |_| Err(MigrationError::authoring("sessions cannot be restored")),
        );

        assert_eq!(migration.name(), "drop_sessions");

        let mut builder = StatementBuilder::postgres();
        builder.begin();
        migration.up(&mut builder).unwrap();
        assert!(builder.pending().contains(r#"DROP TABLE IF EXISTS "sessions";"#));

        builder.rollback();
        builder.begin();
        assert!(migration.down(&mut builder).is_err());
    }
}
