//! Error types for table management.

use oxide_schema_core::{CatalogError, SchemaError};

/// Errors that can occur while managing a table.
///
/// Validation failures ([`Error::Schema`]) are raised before any statement
/// is sent. Execution failures ([`Error::Batch`]) may leave earlier
/// statements of the same batch applied.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The schema, key or options are invalid. The connection was not used.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A statement of a batch failed. Statements before `index` stay applied.
    #[error("Statement {index} failed: {source}\n{statement}")]
    Batch {
        /// Zero-based position of the failing statement.
        index: usize,
        /// The failing SQL text.
        statement: String,
        /// Error reported by the driver.
        #[source]
        source: sqlx::Error,
    },

    /// A catalog query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A catalog row could not be normalized.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The table does not exist.
    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    /// The column does not exist in the table.
    #[error("Column '{column}' does not exist in table '{table}'")]
    ColumnNotFound {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },
}

impl Error {
    /// Whether this is a caller mistake detected before touching the
    /// connection.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, Error>;
