//! Validation errors for schema definitions.
//!
//! Everything here is a caller mistake detected before any SQL is rendered,
//! so no database has been touched when one of these is returned.

/// Errors raised while validating a schema, a key, or table options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// An index or key was declared without any column.
    #[error("Index '{0}' has no columns")]
    EmptyIndexColumns(String),

    /// A key (or alteration) references a column that does not exist.
    #[error("Column '{column}' referenced by '{context}' does not exist")]
    UnknownColumn {
        /// The missing column.
        column: String,
        /// What referenced it (index name, table name).
        context: String,
    },

    /// Two columns share the same name.
    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),

    /// Two keys share the same name.
    #[error("Duplicate index '{0}'")]
    DuplicateIndex(String),

    /// More than one key was declared with type PRIMARY.
    #[error("Table declares more than one PRIMARY key: {0:?}")]
    MultiplePrimaryKeys(Vec<String>),

    /// A type name outside the canonical enumeration.
    #[error("Unknown canonical type '{0}'")]
    UnknownType(String),

    /// An option key that is not recognized.
    #[error("Unknown table option '{0}'")]
    UnknownOption(String),

    /// A recognized option with a value that cannot be parsed.
    #[error("Invalid value '{value}' for table option '{key}'")]
    InvalidOption {
        /// Option key.
        key: String,
        /// Rejected value.
        value: String,
    },
}

/// Result type for schema validation.
pub type Result<T> = std::result::Result<T, SchemaError>;
