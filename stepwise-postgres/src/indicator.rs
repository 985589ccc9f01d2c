//! The PostgreSQL version table.

use deadpool_postgres::Object;
use stepwise_ddl::{ColumnDefinition, Dialect, Postgres};
use stepwise_migrate::{DEFAULT_VERSION_TABLE, MigrateResult, VersionIndicator};
use tracing::{debug, info};

use crate::error::{PgError, PgResult};
use crate::pool::PgPool;

/// Version indicator backed by a single-row table.
///
/// The table has an identity primary key and a `name` column, and is created
/// on first write. Statements other than the table DDL use bind parameters
/// for values; the table name itself is a quoted identifier.
#[derive(Debug, Clone)]
pub struct PgIndicator {
    pool: PgPool,
    table: String,
}

/// How `change` persists a new version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VersionWrite {
    Insert,
    Update { id: i64 },
}

impl PgIndicator {
    /// Create an indicator using the default table name.
    pub fn new(pool: PgPool) -> Self {
        Self::with_table(pool, DEFAULT_VERSION_TABLE)
    }

    /// Create an indicator using `table` as bookkeeping table.
    pub fn with_table(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    /// The bookkeeping table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// DDL creating the bookkeeping table.
    pub fn create_table_sql(&self) -> String {
        Postgres.create_table(
            &self.table,
            &[
                ColumnDefinition::builder("id", "BIGINT")
                    .primary_key(true)
                    .auto_increment(true)
                    .build(),
                ColumnDefinition::new("name", "TEXT"),
            ],
            &[],
        )
    }

    fn select_sql(&self) -> String {
        format!(
            "SELECT \"id\", \"name\" FROM {} ORDER BY \"id\" LIMIT 2",
            Postgres.quote_identifier(&self.table)
        )
    }

    fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO {} (\"name\") VALUES ($1)",
            Postgres.quote_identifier(&self.table)
        )
    }

    fn update_sql(&self) -> String {
        format!(
            "UPDATE {} SET \"name\" = $1 WHERE \"id\" = $2",
            Postgres.quote_identifier(&self.table)
        )
    }

    async fn exists(&self, client: &Object) -> PgResult<bool> {
        let row = client
            .query_one(
                "SELECT EXISTS (SELECT FROM pg_tables \
                 WHERE schemaname = current_schema() AND tablename = $1)",
                &[&self.table],
            )
            .await?;
        Ok(row.try_get(0)?)
    }

    /// The stored `(id, name)` row, if any.
    async fn stored(&self, client: &Object) -> PgResult<Option<(i64, String)>> {
        let rows = client
            .query(&self.select_sql(), &[])
            .await?
            .iter()
            .map(|row| -> PgResult<(i64, String)> {
                Ok((row.try_get(0)?, row.try_get(1)?))
            })
            .collect::<PgResult<Vec<_>>>()?;
        single_row(&self.table, rows)
    }
}

/// At most one row may exist; more means the table was edited by hand.
fn single_row(table: &str, mut rows: Vec<(i64, String)>) -> PgResult<Option<(i64, String)>> {
    if rows.len() > 1 {
        return Err(PgError::version_table(format!(
            "table \"{}\" holds more than one row",
            table
        )));
    }
    Ok(rows.pop())
}

/// The version to report, given whether the table exists and its row.
fn recorded_version(exists: bool, stored: Option<(i64, String)>) -> String {
    match stored {
        Some((_, name)) if exists => name,
        _ => String::new(),
    }
}

fn write_for(stored: Option<&(i64, String)>) -> VersionWrite {
    match stored {
        Some((id, _)) => VersionWrite::Update { id: *id },
        None => VersionWrite::Insert,
    }
}

#[async_trait::async_trait]
impl VersionIndicator for PgIndicator {
    async fn current(&self) -> MigrateResult<String> {
        let client = self.pool.get().await?;
        if !self.exists(&client).await? {
            debug!(table = %self.table, "Version table does not exist yet");
            return Ok(recorded_version(false, None));
        }

        let stored = self.stored(&client).await?;
        Ok(recorded_version(true, stored))
    }

    async fn change(&self, name: &str) -> MigrateResult<()> {
        let client = self.pool.get().await?;
        if !self.exists(&client).await? {
            info!(table = %self.table, "Creating version table");
            client
                .batch_execute(&self.create_table_sql())
                .await
                .map_err(PgError::from)?;
        }

        let stored = self.stored(&client).await?;
        match write_for(stored.as_ref()) {
            VersionWrite::Update { id } => {
                client
                    .execute(&self.update_sql(), &[&name, &id])
                    .await
                    .map_err(PgError::from)?;
            }
            VersionWrite::Insert => {
                client
                    .execute(&self.insert_sql(), &[&name])
                    .await
                    .map_err(PgError::from)?;
            }
        }

        debug!(table = %self.table, version = %name, "Version updated");
        Ok(())
    }
}
