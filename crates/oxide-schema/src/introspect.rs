//! Catalog introspection.
//!
//! Runs the dialect's catalog queries and normalizes the rows into
//! dialect-neutral records.

use oxide_schema_core::catalog::merge_key_roles;
use oxide_schema_core::{
    ColumnDetail, Dialect, IndexColumn, IndexDetail, SequenceDetail, ServerVersion,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::connection::Connection;
use crate::error::{Error, Result};

/// Introspection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntrospectorConfig {
    /// Oldest server version whose catalog reports a sequence's start
    /// value. Older servers get sequences without `start_value`.
    pub sequence_start_min_version: ServerVersion,
}

impl Default for IntrospectorConfig {
    fn default() -> Self {
        Self {
            sequence_start_min_version: ServerVersion::new(9, 1, 0),
        }
    }
}

/// Columns and indexes of one table, read together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Introspection {
    /// Columns in ordinal order, with key roles merged in.
    pub columns: Vec<ColumnDetail>,
    /// Indexes in catalog order.
    pub indexes: Vec<IndexDetail>,
}

impl Introspection {
    /// Looks up a column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDetail> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Looks up an index.
    #[must_use]
    pub fn index(&self, name: &str) -> Option<&IndexDetail> {
        self.indexes.iter().find(|i| i.name == name)
    }
}

/// Reads table structure through a dialect and a connection.
pub struct Introspector<'a, D: ?Sized, C: ?Sized> {
    dialect: &'a D,
    connection: &'a C,
    config: IntrospectorConfig,
}

impl<'a, D, C> Introspector<'a, D, C>
where
    D: Dialect + ?Sized,
    C: Connection + ?Sized,
{
    /// Creates an introspector with the default configuration.
    pub fn new(dialect: &'a D, connection: &'a C) -> Self {
        Self {
            dialect,
            connection,
            config: IntrospectorConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub const fn with_config(mut self, config: IntrospectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Reads columns and indexes, merging key roles into the columns.
    ///
    /// # Errors
    ///
    /// [`Error::Database`] if a catalog query fails, [`Error::Catalog`] if a
    /// row lacks a required field.
    pub async fn introspect(&self, table: &str) -> Result<Introspection> {
        let mut columns = self.raw_columns(table).await?;
        let indexes = self.indexes(table).await?;
        merge_key_roles(&mut columns, &indexes);
        debug!(
            table = %table,
            columns = columns.len(),
            indexes = indexes.len(),
            "Introspected table"
        );
        Ok(Introspection { columns, indexes })
    }

    /// Columns in ordinal order with their key roles.
    ///
    /// # Errors
    ///
    /// See [`Introspector::introspect`].
    pub async fn columns(&self, table: &str) -> Result<Vec<ColumnDetail>> {
        Ok(self.introspect(table).await?.columns)
    }

    /// Indexes, one record per index.
    ///
    /// # Errors
    ///
    /// See [`Introspector::introspect`].
    pub async fn indexes(&self, table: &str) -> Result<Vec<IndexDetail>> {
        let rows = self
            .connection
            .query(&self.dialect.list_indexes(table))
            .await?;
        let pairs = rows
            .iter()
            .map(|row| self.dialect.index_column(row))
            .collect::<std::result::Result<Vec<IndexColumn>, _>>()?;
        Ok(IndexDetail::group(pairs))
    }

    /// Sequences owned by the table's columns. Empty for dialects without
    /// sequences.
    ///
    /// # Errors
    ///
    /// [`Error::TableNotFound`] when the table does not exist; the catalog
    /// query is never built for an unknown name.
    pub async fn sequences(&self, table: &str) -> Result<Vec<SequenceDetail>> {
        let tables = self.connection.table_names().await?;
        if !tables.contains(table) {
            return Err(Error::TableNotFound(table.to_string()));
        }

        let version = self.connection.server_version().await?;
        let with_start_value = version >= self.config.sequence_start_min_version;
        if !with_start_value {
            debug!(
                version = %version,
                "Server too old to report sequence start values"
            );
        }

        let Some(sql) = self.dialect.list_sequences(table, with_start_value) else {
            return Ok(Vec::new());
        };
        let rows = self.connection.query(&sql).await?;
        rows.iter()
            .map(|row| self.dialect.sequence_detail(row).map_err(Error::from))
            .collect()
    }

    async fn raw_columns(&self, table: &str) -> Result<Vec<ColumnDetail>> {
        let rows = self
            .connection
            .query(&self.dialect.describe_columns(table))
            .await?;
        rows.iter()
            .map(|row| self.dialect.column_detail(row).map_err(Error::from))
            .collect()
    }
}
