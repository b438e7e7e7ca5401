//! Dialect-neutral table description.
//!
//! A [`Schema`] is a transient value: it describes the desired shape of a
//! table for one create call and is discarded once compiled to statements.

mod options;

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::types::{CanonicalType, Length};

pub use options::TableOptions;

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// String literal, escaped by the dialect before rendering.
    Literal(String),
    /// Integer literal.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// Boolean literal.
    Boolean(bool),
    /// Raw SQL expression (e.g. `CURRENT_TIMESTAMP`), rendered verbatim.
    Expression(String),
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Canonical type.
    pub ty: CanonicalType,
    /// Explicit length; the dialect default applies when `None`.
    pub length: Option<Length>,
    /// Signed numeric column.
    pub signed: bool,
    /// Whether NULL is allowed.
    pub allow_null: bool,
    /// Default value; `None` means "leave unspecified".
    pub default: Option<DefaultValue>,
    /// Column comment.
    pub comment: Option<String>,
    /// Whether the column auto-increments.
    pub auto_increment: bool,
    /// Whether the column is part of the primary key.
    pub primary: bool,
}

impl Column {
    /// Creates a nullable, signed column of the given type.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: CanonicalType) -> Self {
        Self {
            name: name.into(),
            ty,
            length: None,
            signed: true,
            allow_null: true,
            default: None,
            comment: None,
            auto_increment: false,
            primary: false,
        }
    }

    /// Sets the length (or precision and scale).
    #[must_use]
    pub const fn length(mut self, length: Length) -> Self {
        self.length = Some(length);
        self
    }

    /// Marks a numeric column unsigned.
    #[must_use]
    pub const fn unsigned(mut self) -> Self {
        self.signed = false;
        self
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.allow_null = false;
        self
    }

    /// Marks the column nullable (default).
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.allow_null = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Marks the column auto-incrementing.
    #[must_use]
    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Marks the column as part of the primary key.
    #[must_use]
    pub const fn primary(mut self) -> Self {
        self.primary = true;
        self.allow_null = false; // Primary keys are implicitly NOT NULL
        self
    }
}

/// Creates an INTEGER column.
#[must_use]
pub fn integer(name: impl Into<String>) -> Column {
    Column::new(name, CanonicalType::Integer)
}

/// Creates a BIGINT column.
#[must_use]
pub fn bigint(name: impl Into<String>) -> Column {
    Column::new(name, CanonicalType::Bigint)
}

/// Creates a VARCHAR column with the given length.
#[must_use]
pub fn varchar(name: impl Into<String>, length: u32) -> Column {
    Column::new(name, CanonicalType::Varchar).length(Length::Size(length))
}

/// Creates a TEXT column.
#[must_use]
pub fn text(name: impl Into<String>) -> Column {
    Column::new(name, CanonicalType::Text)
}

/// Creates a DECIMAL column with precision and scale.
#[must_use]
pub fn decimal(name: impl Into<String>, precision: u8, scale: u8) -> Column {
    Column::new(name, CanonicalType::Decimal).length(Length::Precision(precision, scale))
}

/// Creates a BOOLEAN column.
#[must_use]
pub fn boolean(name: impl Into<String>) -> Column {
    Column::new(name, CanonicalType::Boolean)
}

/// Creates a TIMESTAMP column.
#[must_use]
pub fn timestamp(name: impl Into<String>) -> Column {
    Column::new(name, CanonicalType::Timestamp)
}

/// Kind of key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// Primary key.
    Primary,
    /// Unique index.
    Unique,
    /// Plain (non-unique) index.
    Index,
}

impl FromStr for KeyType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "primary key" => Ok(Self::Primary),
            "unique" => Ok(Self::Unique),
            "index" | "key" => Ok(Self::Index),
            _ => Err(SchemaError::InvalidOption {
                key: "key_type".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// An index or key over one or more columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    /// Index name, unique within a table.
    pub name: String,
    /// Key type.
    pub key_type: KeyType,
    /// Indexed columns, in order.
    pub columns: Vec<String>,
    /// Index comment.
    pub comment: Option<String>,
}

impl Key {
    /// Creates a key.
    #[must_use]
    pub fn new<I, S>(key_type: KeyType, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            key_type,
            columns: columns.into_iter().map(Into::into).collect(),
            comment: None,
        }
    }

    /// Creates a primary key.
    #[must_use]
    pub fn primary<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(KeyType::Primary, "primary", columns)
    }

    /// Creates a unique index.
    #[must_use]
    pub fn unique<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(KeyType::Unique, name, columns)
    }

    /// Creates a non-unique index.
    #[must_use]
    pub fn index<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(KeyType::Index, name, columns)
    }

    /// Sets the comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Checks that the key has at least one column.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyIndexColumns`] for an empty column list.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(SchemaError::EmptyIndexColumns(self.name.clone()));
        }
        Ok(())
    }
}

/// Ordered columns plus keys describing a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
    keys: Vec<Key>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Appends a key.
    #[must_use]
    pub fn key(mut self, key: Key) -> Self {
        self.keys.push(key);
        self
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Keys in declaration order.
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Primary key columns: columns flagged primary, then the columns of an
    /// explicit PRIMARY key that are not already listed.
    #[must_use]
    pub fn primary_columns(&self) -> Vec<String> {
        let mut primary: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.primary)
            .map(|c| c.name.clone())
            .collect();
        for key in self.keys.iter().filter(|k| k.key_type == KeyType::Primary) {
            for column in &key.columns {
                if !primary.contains(column) {
                    primary.push(column.clone());
                }
            }
        }
        primary
    }

    /// Keys that become standalone indexes (everything but PRIMARY).
    pub fn secondary_keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter().filter(|k| k.key_type != KeyType::Primary)
    }

    /// Checks the schema invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: duplicate column or index
    /// names, an empty or dangling key, or more than one PRIMARY key.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for column in &self.columns {
            if !names.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.name.clone()));
            }
        }

        let mut key_names = HashSet::new();
        for key in &self.keys {
            if !key_names.insert(key.name.as_str()) {
                return Err(SchemaError::DuplicateIndex(key.name.clone()));
            }
            key.validate()?;
            if let Some(missing) = key.columns.iter().find(|c| !names.contains(c.as_str())) {
                return Err(SchemaError::UnknownColumn {
                    column: missing.clone(),
                    context: key.name.clone(),
                });
            }
        }

        let primaries: Vec<String> = self
            .keys
            .iter()
            .filter(|k| k.key_type == KeyType::Primary)
            .map(|k| k.name.clone())
            .collect();
        if primaries.len() > 1 {
            return Err(SchemaError::MultiplePrimaryKeys(primaries));
        }

        Ok(())
    }
}
