//! PostgreSQL adapter over a sqlx [`PgPool`].

use std::collections::BTreeSet;

use async_trait::async_trait;
use oxide_schema_core::{CatalogRow, ServerVersion};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Column as _, Row};
use tracing::debug;

use crate::connection::{parse_version, Connection};

/// PostgreSQL connection, listing the tables of one schema (the current
/// schema by default).
#[derive(Debug, Clone)]
pub struct PostgresConnection {
    pool: PgPool,
    schema: Option<String>,
}

impl PostgresConnection {
    /// Wraps a pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema: None,
        }
    }

    /// Sets the schema whose tables [`Connection::table_names`] lists.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn decode_cell(row: &PgRow, idx: usize) -> Option<String> {
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v;
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
        return v.map(|b| b.to_string());
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(|n| n.to_string());
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(idx) {
        return v.map(|n| n.to_string());
    }
    if let Ok(v) = row.try_get::<Option<i16>, _>(idx) {
        return v.map(|n| n.to_string());
    }
    row.try_get::<Option<Vec<u8>>, _>(idx)
        .ok()
        .flatten()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

fn decode_row(row: &PgRow) -> CatalogRow {
    let mut out = CatalogRow::new();
    for column in row.columns() {
        out.insert(column.name(), decode_cell(row, column.ordinal()));
    }
    out
}

#[async_trait]
impl Connection for PostgresConnection {
    async fn execute(&self, sql: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(sql).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn query(&self, sql: &str) -> Result<Vec<CatalogRow>, sqlx::Error> {
        debug!(sql = %sql, "Running catalog query");
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(decode_row).collect())
    }

    async fn server_version(&self) -> Result<ServerVersion, sqlx::Error> {
        let banner: String = sqlx::query_scalar("SHOW server_version")
            .fetch_one(&self.pool)
            .await?;
        parse_version(&banner)
    }

    async fn table_names(&self) -> Result<BTreeSet<String>, sqlx::Error> {
        let names: Vec<String> = match self.schema {
            Some(ref schema) => {
                sqlx::query_scalar(
                    "SELECT tablename::text FROM pg_catalog.pg_tables WHERE schemaname = $1",
                )
                .bind(schema)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar(
                    "SELECT tablename::text FROM pg_catalog.pg_tables WHERE schemaname = current_schema()",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(names.into_iter().collect())
    }
}
