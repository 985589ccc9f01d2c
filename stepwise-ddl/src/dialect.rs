//! Dialect-specific SQL rendering.
//!
//! Every piece of SQL text produced by this crate comes from a [`Dialect`].
//! Adding support for another database means adding one implementation of
//! the trait; the builders and the runner never look at SQL syntax.

use crate::definition::{
    ColumnAlteration, ColumnDefinition, ConstraintDefinition, ConstraintKind, IndexDefinition,
};

/// Renders definitions and schema changes into SQL statements.
///
/// Statement methods return a complete statement including its terminating
/// `;`. Fragment methods ([`Dialect::column`], [`Dialect::constraint`]) return
/// text meant to be embedded in a larger statement.
pub trait Dialect: Send + Sync {
    /// Short dialect name used in logs.
    fn name(&self) -> &'static str;

    /// Quote a single identifier.
    fn quote_identifier(&self, identifier: &str) -> String;

    /// Statement opening a transaction.
    fn begin(&self) -> String;

    /// Statement closing a transaction.
    fn commit(&self) -> String;

    /// Statement abandoning a transaction.
    fn rollback(&self) -> String;

    /// Column definition fragment.
    fn column(&self, column: &ColumnDefinition) -> String;

    /// Table constraint fragment.
    fn constraint(&self, constraint: &ConstraintDefinition) -> String;

    /// `CREATE TABLE` statement.
    fn create_table(
        &self,
        table: &str,
        columns: &[ColumnDefinition],
        constraints: &[ConstraintDefinition],
    ) -> String;

    /// `DROP TABLE` statement.
    fn drop_table(&self, table: &str) -> String;

    /// `TRUNCATE TABLE` statement.
    fn truncate_table(&self, table: &str) -> String;

    /// Table rename statement.
    fn rename_table(&self, table: &str, new_name: &str) -> String;

    /// Add-column statement.
    fn add_column(&self, table: &str, column: &ColumnDefinition) -> String;

    /// Add-constraint statement.
    fn add_constraint(&self, table: &str, constraint: &ConstraintDefinition) -> String;

    /// `CREATE INDEX` statement.
    fn create_index(&self, table: &str, index: &IndexDefinition) -> String;

    /// Statement applying one change to an existing column.
    fn alter_column(&self, table: &str, column: &str, alteration: &ColumnAlteration) -> String;

    /// Drop-column statement.
    fn drop_column(&self, table: &str, column: &str) -> String;

    /// Drop-constraint statement.
    fn drop_constraint(&self, table: &str, constraint: &str) -> String;

    /// `DROP INDEX` statement.
    fn drop_index(&self, table: &str, index: &str) -> String;

    /// Column rename statement.
    fn rename_column(&self, table: &str, old: &str, new: &str) -> String;

    /// Constraint rename statement.
    fn rename_constraint(&self, table: &str, old: &str, new: &str) -> String;

    /// Index rename statement.
    fn rename_index(&self, table: &str, old: &str, new: &str) -> String;
}

/// PostgreSQL dialect.
///
/// Identifiers are double-quoted. Types, defaults, checks and index
/// predicates are interpolated verbatim and are never escaped. Every
/// statement that PostgreSQL allows to be guarded with `IF EXISTS` /
/// `IF NOT EXISTS` is guarded, so re-running a migration is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

/// Quote a single identifier.
fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier)
}

/// Quote and comma-join a list of identifiers.
fn quote_list(identifiers: &[String]) -> String {
    identifiers
        .iter()
        .map(|c| quote(c))
        .collect::<Vec<_>>()
        .join(",")
}

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        quote(identifier)
    }

    fn begin(&self) -> String {
        "BEGIN;".to_string()
    }

    fn commit(&self) -> String {
        "COMMIT;".to_string()
    }

    fn rollback(&self) -> String {
        "ROLLBACK;".to_string()
    }

    fn column(&self, column: &ColumnDefinition) -> String {
        let mut sql = format!("{} {}", quote(&column.name), column.data_type);

        if let Some(default) = &column.default {
            sql.push_str(&format!(" DEFAULT {}", default));
        }

        sql.push_str(if column.nullable { " NULL" } else { " NOT NULL" });

        if column.primary_key {
            sql.push_str(" PRIMARY KEY");
        }

        if column.unique {
            sql.push_str(" UNIQUE");
        }

        if let Some(reference) = &column.references {
            sql.push_str(&format!(
                " REFERENCES {} ({})",
                quote(&reference.table),
                quote_list(&reference.columns)
            ));
        }

        if let Some(check) = &column.check {
            sql.push_str(&format!(" CHECK ({})", check));
        }

        if column.auto_increment {
            sql.push_str(" GENERATED ALWAYS AS IDENTITY");
        }

        sql
    }

    fn constraint(&self, constraint: &ConstraintDefinition) -> String {
        let body = match &constraint.kind {
            ConstraintKind::PrimaryKey => {
                format!("PRIMARY KEY ({})", quote_list(&constraint.columns))
            }
            ConstraintKind::Unique => format!("UNIQUE ({})", quote_list(&constraint.columns)),
            ConstraintKind::ForeignKey(reference) => format!(
                "FOREIGN KEY ({}) REFERENCES {} ({})",
                quote_list(&constraint.columns),
                quote(&reference.table),
                quote_list(&reference.columns)
            ),
            ConstraintKind::Check(expression) => format!("CHECK ({})", expression),
        };

        match &constraint.name {
            Some(name) => format!("CONSTRAINT {} {}", quote(name), body),
            None => body,
        }
    }

    fn create_table(
        &self,
        table: &str,
        columns: &[ColumnDefinition],
        constraints: &[ConstraintDefinition],
    ) -> String {
        let elements: Vec<String> = columns
            .iter()
            .map(|c| self.column(c))
            .chain(constraints.iter().map(|c| self.constraint(c)))
            .collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            quote(table),
            elements.join(",")
        )
    }

    fn drop_table(&self, table: &str) -> String {
        format!("DROP TABLE IF EXISTS {};", quote(table))
    }

    fn truncate_table(&self, table: &str) -> String {
        // PostgreSQL has no IF EXISTS form of TRUNCATE.
        format!("TRUNCATE TABLE {};", quote(table))
    }

    fn rename_table(&self, table: &str, new_name: &str) -> String {
        format!(
            "ALTER TABLE IF EXISTS {} RENAME TO {};",
            quote(table),
            quote(new_name)
        )
    }

    fn add_column(&self, table: &str, column: &ColumnDefinition) -> String {
        format!(
            "ALTER TABLE IF EXISTS {} ADD COLUMN IF NOT EXISTS {};",
            quote(table),
            self.column(column)
        )
    }

    fn add_constraint(&self, table: &str, constraint: &ConstraintDefinition) -> String {
        format!(
            "ALTER TABLE IF EXISTS {} ADD {};",
            quote(table),
            self.constraint(constraint)
        )
    }

    fn create_index(&self, table: &str, index: &IndexDefinition) -> String {
        let mut sql = String::from("CREATE ");

        if index.unique {
            sql.push_str("UNIQUE ");
        }

        sql.push_str("INDEX ");

        // IF NOT EXISTS is only accepted together with an explicit index name.
        if let Some(name) = &index.name {
            sql.push_str(&format!("IF NOT EXISTS {} ", quote(name)));
        }

        sql.push_str(&format!(
            "ON {} ({})",
            quote(table),
            quote_list(&index.columns)
        ));

        if let Some(predicate) = &index.predicate {
            sql.push_str(&format!(" WHERE {}", predicate));
        }

        sql.push(';');
        sql
    }

    fn alter_column(&self, table: &str, column: &str, alteration: &ColumnAlteration) -> String {
        let action = match alteration {
            ColumnAlteration::SetType(data_type) => format!("TYPE {}", data_type),
            ColumnAlteration::SetDefault(expression) => format!("SET DEFAULT {}", expression),
            ColumnAlteration::DropDefault => "DROP DEFAULT".to_string(),
            ColumnAlteration::SetNullable => "DROP NOT NULL".to_string(),
            ColumnAlteration::DropNullable => "SET NOT NULL".to_string(),
            ColumnAlteration::SetAutoIncrement => "ADD GENERATED ALWAYS AS IDENTITY".to_string(),
            ColumnAlteration::DropAutoIncrement => "DROP IDENTITY IF EXISTS".to_string(),
        };

        format!(
            "ALTER TABLE IF EXISTS {} ALTER COLUMN {} {};",
            quote(table),
            quote(column),
            action
        )
    }

    fn drop_column(&self, table: &str, column: &str) -> String {
        format!(
            "ALTER TABLE IF EXISTS {} DROP COLUMN IF EXISTS {};",
            quote(table),
            quote(column)
        )
    }

    fn drop_constraint(&self, table: &str, constraint: &str) -> String {
        format!(
            "ALTER TABLE IF EXISTS {} DROP CONSTRAINT IF EXISTS {};",
            quote(table),
            quote(constraint)
        )
    }

    fn drop_index(&self, _table: &str, index: &str) -> String {
        format!("DROP INDEX IF EXISTS {};", quote(index))
    }

    fn rename_column(&self, table: &str, old: &str, new: &str) -> String {
        format!(
            "ALTER TABLE IF EXISTS {} RENAME COLUMN {} TO {};",
            quote(table),
            quote(old),
            quote(new)
        )
    }

    fn rename_constraint(&self, table: &str, old: &str, new: &str) -> String {
        format!(
            "ALTER TABLE IF EXISTS {} RENAME CONSTRAINT {} TO {};",
            quote(table),
            quote(old),
            quote(new)
        )
    }

    fn rename_index(&self, _table: &str, old: &str, new: &str) -> String {
        format!("ALTER INDEX IF EXISTS {} RENAME TO {};", quote(old), quote(new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ForeignReference;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(Postgres.quote_identifier("schema_version"), r#""schema_version""#);
    }

    #[test]
    fn test_column_minimal_always_has_nullability() {
        let dialect = Postgres;
        assert_eq!(
            dialect.column(&ColumnDefinition::new("name", "TEXT")),
            r#""name" TEXT NOT NULL"#
        );

        let mut nullable = ColumnDefinition::new("bio", "TEXT");
        nullable.nullable = true;
        assert_eq!(dialect.column(&nullable), r#""bio" TEXT NULL"#);
    }

    #[test]
    fn test_column_clause_order() {
        let column = ColumnDefinition {
            name: "owner_id".to_string(),
            data_type: "BIGINT".to_string(),
            default: Some("0".to_string()),
            nullable: false,
            primary_key: true,
            unique: true,
            references: Some(ForeignReference::new("users", ["id", "tenant_id"])),
            check: Some("owner_id >= 0".to_string()),
            auto_increment: true,
        };

        assert_eq!(
            Postgres.column(&column),
            r#""owner_id" BIGINT DEFAULT 0 NOT NULL PRIMARY KEY UNIQUE REFERENCES "users" ("id","tenant_id") CHECK (owner_id >= 0) GENERATED ALWAYS AS IDENTITY"#
        );
    }

    #[test]
    fn test_column_rendering_is_deterministic() {
        let column = ColumnDefinition::builder("email", "VARCHAR(255)")
            .unique(true)
            .with_default("''")
            .build();
        assert_eq!(Postgres.column(&column), Postgres.column(&column.clone()));
    }

    #[test]
    fn test_constraint_variants() {
        let dialect = Postgres;

        let pk = ConstraintDefinition::new(ConstraintKind::PrimaryKey, ["a", "b"]);
        assert_eq!(dialect.constraint(&pk), r#"PRIMARY KEY ("a","b")"#);

        let unique = ConstraintDefinition::builder()
            .with_name("users_email_key")
            .with_columns(["email"])
            .unique()
            .build();
        assert_eq!(
            dialect.constraint(&unique),
            r#"CONSTRAINT "users_email_key" UNIQUE ("email")"#
        );

        let fk = ConstraintDefinition::builder()
            .with_columns(["author_id"])
            .foreign_key("users", ["id"])
            .build();
        assert_eq!(
            dialect.constraint(&fk),
            r#"FOREIGN KEY ("author_id") REFERENCES "users" ("id")"#
        );

        let check = ConstraintDefinition::builder()
            .with_name("positive_price")
            .check("price > 0")
            .build();
        assert_eq!(
            dialect.constraint(&check),
            r#"CONSTRAINT "positive_price" CHECK (price > 0)"#
        );
    }

    #[test]
    fn test_create_table_joins_columns_and_constraints() {
        let columns = vec![
            ColumnDefinition::builder("id", "BIGINT").auto_increment(true).build(),
            ColumnDefinition::new("email", "TEXT"),
        ];
        let constraints = vec![ConstraintDefinition::new(ConstraintKind::PrimaryKey, ["id"])];

        assert_eq!(
            Postgres.create_table("users", &columns, &constraints),
            r#"CREATE TABLE IF NOT EXISTS "users" ("id" BIGINT NOT NULL GENERATED ALWAYS AS IDENTITY,"email" TEXT NOT NULL,PRIMARY KEY ("id"));"#
        );
    }

    #[test]
    fn test_create_table_without_constraints() {
        let columns = vec![ColumnDefinition::new("id", "BIGINT")];
        assert_eq!(
            Postgres.create_table("t", &columns, &[]),
            r#"CREATE TABLE IF NOT EXISTS "t" ("id" BIGINT NOT NULL);"#
        );
    }

    #[test]
    fn test_create_index() {
        let dialect = Postgres;

        let named = IndexDefinition::builder()
            .with_name("idx_users_email")
            .with_columns(["email", "tenant_id"])
            .unique(true)
            .with_predicate("deleted_at IS NULL")
            .build();
        assert_eq!(
            dialect.create_index("users", &named),
            r#"CREATE UNIQUE INDEX IF NOT EXISTS "idx_users_email" ON "users" ("email","tenant_id") WHERE deleted_at IS NULL;"#
        );

        let unnamed = IndexDefinition::builder().with_columns(["created_at"]).build();
        assert_eq!(
            dialect.create_index("users", &unnamed),
            r#"CREATE INDEX ON "users" ("created_at");"#
        );
    }

    #[test]
    fn test_alter_column_actions() {
        let dialect = Postgres;
        let cases = [
            (ColumnAlteration::SetType("TEXT".into()), "TYPE TEXT"),
            (ColumnAlteration::SetDefault("now()".into()), "SET DEFAULT now()"),
            (ColumnAlteration::DropDefault, "DROP DEFAULT"),
            (ColumnAlteration::SetNullable, "DROP NOT NULL"),
            (ColumnAlteration::DropNullable, "SET NOT NULL"),
            (
                ColumnAlteration::SetAutoIncrement,
                "ADD GENERATED ALWAYS AS IDENTITY",
            ),
            (ColumnAlteration::DropAutoIncrement, "DROP IDENTITY IF EXISTS"),
        ];

        for (alteration, action) in cases {
            assert_eq!(
                dialect.alter_column("users", "age", &alteration),
                format!(r#"ALTER TABLE IF EXISTS "users" ALTER COLUMN "age" {};"#, action)
            );
        }
    }

    #[test]
    fn test_guarded_statements() {
        let dialect = Postgres;
        assert_eq!(dialect.drop_table("users"), r#"DROP TABLE IF EXISTS "users";"#);
        assert_eq!(dialect.truncate_table("users"), r#"TRUNCATE TABLE "users";"#);
        assert_eq!(
            dialect.rename_table("users", "accounts"),
            r#"ALTER TABLE IF EXISTS "users" RENAME TO "accounts";"#
        );
        assert_eq!(
            dialect.drop_column("users", "age"),
            r#"ALTER TABLE IF EXISTS "users" DROP COLUMN IF EXISTS "age";"#
        );
        assert_eq!(
            dialect.drop_constraint("users", "users_email_key"),
            r#"ALTER TABLE IF EXISTS "users" DROP CONSTRAINT IF EXISTS "users_email_key";"#
        );
        assert_eq!(
            dialect.drop_index("users", "idx_users_email"),
            r#"DROP INDEX IF EXISTS "idx_users_email";"#
        );
        assert_eq!(
            dialect.rename_column("users", "name", "full_name"),
            r#"ALTER TABLE IF EXISTS "users" RENAME COLUMN "name" TO "full_name";"#
        );
        assert_eq!(
            dialect.rename_constraint("users", "a", "b"),
            r#"ALTER TABLE IF EXISTS "users" RENAME CONSTRAINT "a" TO "b";"#
        );
        assert_eq!(
            dialect.rename_index("users", "a", "b"),
            r#"ALTER INDEX IF EXISTS "a" RENAME TO "b";"#
        );
    }
}
