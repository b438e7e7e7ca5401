//! Scripted in-memory connection shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Mutex;

use async_trait::async_trait;
use oxide_schema::connection::Connection;
use oxide_schema_core::{CatalogRow, ServerVersion};

/// Records every statement and answers queries from scripted rows.
///
/// Query responses are matched by substring, first match wins. Unmatched
/// queries return no rows.
pub struct MockConnection {
    executed: Mutex<Vec<String>>,
    queries: Mutex<Vec<String>>,
    responses: Mutex<Vec<(String, Vec<CatalogRow>)>>,
    fail_on: Mutex<Option<String>>,
    version: ServerVersion,
    tables: BTreeSet<String>,
}

impl Default for MockConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            executed: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
            responses: Mutex::new(Vec::new()),
            fail_on: Mutex::new(None),
            version: ServerVersion::new(16, 2, 0),
            tables: BTreeSet::new(),
        }
    }

    pub fn with_version(mut self, version: ServerVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_table(mut self, name: &str) -> Self {
        self.tables.insert(name.to_string());
        self
    }

    /// Answers queries containing `pattern` with `rows`, replacing any
    /// earlier script for the same pattern.
    pub fn on_query(&self, pattern: &str, rows: Vec<CatalogRow>) {
        let mut responses = self.responses.lock().unwrap();
        responses.retain(|(p, _)| p != pattern);
        responses.push((pattern.to_string(), rows));
    }

    /// Makes `execute` fail for statements containing `pattern`.
    pub fn fail_on(&self, pattern: &str) {
        *self.fail_on.lock().unwrap() = Some(pattern.to_string());
    }

    /// Stops failing statements.
    pub fn recover(&self) {
        *self.fail_on.lock().unwrap() = None;
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.executed.lock().unwrap().clear();
        self.queries.lock().unwrap().clear();
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn execute(&self, sql: &str) -> Result<u64, sqlx::Error> {
        if let Some(pattern) = self.fail_on.lock().unwrap().as_deref() {
            if sql.contains(pattern) {
                return Err(sqlx::Error::Protocol(format!("rejected: {sql}")));
            }
        }
        self.executed.lock().unwrap().push(sql.to_string());
        Ok(0)
    }

    async fn query(&self, sql: &str) -> Result<Vec<CatalogRow>, sqlx::Error> {
        self.queries.lock().unwrap().push(sql.to_string());
        let responses = self.responses.lock().unwrap();
        Ok(responses
            .iter()
            .find(|(pattern, _)| sql.contains(pattern.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }

    async fn server_version(&self) -> Result<ServerVersion, sqlx::Error> {
        Ok(self.version)
    }

    async fn table_names(&self) -> Result<BTreeSet<String>, sqlx::Error> {
        Ok(self.tables.clone())
    }
}

/// PostgreSQL `describe_columns` row.
pub fn pg_column(name: &str, ty: &str, nullable: bool, default: Option<&str>) -> CatalogRow {
    let row = CatalogRow::new()
        .with("column_name", name)
        .with("column_type", ty)
        .with("is_nullable", if nullable { "YES" } else { "NO" })
        .with_null("column_comment");
    match default {
        Some(default) => row.with("column_default", default),
        None => row.with_null("column_default"),
    }
}

/// PostgreSQL `list_indexes` row.
pub fn pg_index(index: &str, column: &str, unique: bool, primary: bool) -> CatalogRow {
    CatalogRow::new()
        .with("index_name", index)
        .with("column_name", column)
        .with("is_unique", unique.to_string())
        .with("is_primary", primary.to_string())
        .with_null("index_comment")
}

/// Pattern matching the PostgreSQL and MySQL column queries.
pub const COLUMNS_QUERY: &str = "column_default";
/// Pattern matching the PostgreSQL and MySQL index queries.
pub const INDEXES_QUERY: &str = "index_name";
/// Pattern matching the PostgreSQL sequence query.
pub const SEQUENCES_QUERY: &str = "pg_depend";

/// Scripts the `users` table: `id` serial primary key, `name` varchar,
/// `bio` text, unique index `idx_name`.
pub fn script_users(conn: &MockConnection) {
    conn.on_query(
        COLUMNS_QUERY,
        vec![
            pg_column(
                "id",
                "integer",
                false,
                Some("nextval('users_id_seq'::regclass)"),
            ),
            pg_column(
                "name",
                "character varying(120)",
                false,
                Some("NULL::character varying"),
            ),
            pg_column("bio", "text", true, None),
        ],
    );
    conn.on_query(
        INDEXES_QUERY,
        vec![
            pg_index("users_pkey", "id", true, true),
            pg_index("idx_name", "name", true, false),
        ],
    );
}
