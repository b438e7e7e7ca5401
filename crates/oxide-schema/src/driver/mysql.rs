//! MySQL / MariaDB adapter over a sqlx [`MySqlPool`].

use std::collections::BTreeSet;

use async_trait::async_trait;
use oxide_schema_core::{CatalogRow, ServerVersion};
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::{Column as _, Row};
use tracing::debug;

use crate::connection::{parse_version, Connection};

/// MySQL connection; tables are listed from the current database.
#[derive(Debug, Clone)]
pub struct MysqlConnection {
    pool: MySqlPool,
}

impl MysqlConnection {
    /// Wraps a pool.
    pub const fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

// information_schema reports some text columns with a binary collation,
// which sqlx refuses to decode as String.
fn decode_cell(row: &MySqlRow, idx: usize) -> Option<String> {
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v;
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return v.map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(|n| n.to_string());
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(idx) {
        return v.map(|n| n.to_string());
    }
    row.try_get::<Option<bool>, _>(idx)
        .ok()
        .flatten()
        .map(|b| b.to_string())
}

fn decode_row(row: &MySqlRow) -> CatalogRow {
    let mut out = CatalogRow::new();
    for column in row.columns() {
        out.insert(column.name(), decode_cell(row, column.ordinal()));
    }
    out
}

#[async_trait]
impl Connection for MysqlConnection {
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
        let row = sqlx::query("SELECT VERSION() AS version")
            .fetch_one(&self.pool)
            .await?;
        let banner = decode_cell(&row, 0).unwrap_or_default();
        parse_version(&banner)
    }

    async fn table_names(&self) -> Result<BTreeSet<String>, sqlx::Error> {
        let rows = self
            .query(
                "SELECT TABLE_NAME AS table_name FROM information_schema.TABLES \
                 WHERE TABLE_SCHEMA = DATABASE()",
            )
            .await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get("table_name").map(ToString::to_string))
            .collect())
    }
}
