//! Dialect-neutral catalog records.
//!
//! Catalog queries return rows of text cells ([`CatalogRow`]). Each dialect
//! normalizes them into [`ColumnDetail`], [`IndexDetail`] and
//! [`SequenceDetail`], so callers read one shape regardless of backend.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Errors while reading catalog rows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// A required field is absent or NULL.
    #[error("Catalog row is missing field '{0}'")]
    MissingField(String),

    /// The server version banner has no leading version number.
    #[error("Cannot parse server version '{0}'")]
    InvalidVersion(String),
}

/// One row of a catalog query; cell values as text, keyed by lowercase
/// column label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRow {
    cells: BTreeMap<String, Option<String>>,
}

impl CatalogRow {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a non-NULL cell.
    #[must_use]
    pub fn with(mut self, label: &str, value: impl Into<String>) -> Self {
        self.insert(label, Some(value.into()));
        self
    }

    /// Adds a NULL cell.
    #[must_use]
    pub fn with_null(mut self, label: &str) -> Self {
        self.insert(label, None);
        self
    }

    /// Sets a cell.
    pub fn insert(&mut self, label: &str, value: Option<String>) {
        self.cells.insert(label.to_ascii_lowercase(), value);
    }

    /// Returns a cell, `None` if absent or NULL.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.cells
            .get(&label.to_ascii_lowercase())
            .and_then(|v| v.as_deref())
    }

    /// Returns a required cell.
    ///
    /// # Errors
    ///
    /// [`CatalogError::MissingField`] when the cell is absent or NULL.
    pub fn require(&self, label: &str) -> Result<&str, CatalogError> {
        self.get(label)
            .ok_or_else(|| CatalogError::MissingField(label.to_string()))
    }

    /// Interprets a cell as a boolean (`t`, `true`, `1`, `yes`, `y`).
    #[must_use]
    pub fn flag(&self, label: &str) -> bool {
        self.get(label).is_some_and(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "t" | "true" | "1" | "yes" | "y"
            )
        })
    }

    /// Interprets a cell as an integer.
    #[must_use]
    pub fn int(&self, label: &str) -> Option<i64> {
        self.get(label).and_then(|v| v.trim().parse().ok())
    }

    /// Returns a cell as an owned string, treating empty strings as absent.
    #[must_use]
    pub fn non_empty(&self, label: &str) -> Option<String> {
        self.get(label)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
    }
}

/// Role a column plays in the table's keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyRole {
    /// Member of the primary key.
    Primary,
    /// Member of a unique index.
    Unique,
    /// Member of non-unique indexes only.
    Multi,
    /// Not indexed.
    #[default]
    None,
}

/// Normalized description of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDetail {
    /// Column name.
    pub name: String,
    /// Native type, normalized to the abbreviated spelling.
    pub native_type: String,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Default expression; typed NULL sentinels become `None`.
    pub default: Option<String>,
    /// Column comment.
    pub comment: Option<String>,
    /// Key role, merged from the index list.
    pub key: KeyRole,
    /// Whether values come from a sequence or native auto-increment.
    pub auto_increment: bool,
}

impl ColumnDetail {
    /// The native type without length or modifiers (`varchar(120)` → `varchar`).
    #[must_use]
    pub fn base_type(&self) -> &str {
        let base = self
            .native_type
            .split_once('(')
            .map_or(self.native_type.as_str(), |(base, _)| base);
        base.trim()
    }
}

/// One (index, column) pair as returned by catalog queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    /// Index name.
    pub index: String,
    /// Column covered.
    pub column: String,
    /// Unique index.
    pub unique: bool,
    /// Primary key index.
    pub primary: bool,
    /// Index comment.
    pub comment: Option<String>,
}

/// Normalized description of one index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDetail {
    /// Index name.
    pub name: String,
    /// Covered columns, in catalog order.
    pub columns: Vec<String>,
    /// Unique index.
    pub unique: bool,
    /// Primary key index.
    pub primary: bool,
    /// Index comment.
    pub comment: Option<String>,
}

impl IndexDetail {
    /// Groups per-column rows into one record per index, keeping the order
    /// in which indexes first appear.
    #[must_use]
    pub fn group(rows: Vec<IndexColumn>) -> Vec<Self> {
        let mut indexes: Vec<Self> = Vec::new();
        for row in rows {
            if let Some(existing) = indexes.iter_mut().find(|i| i.name == row.index) {
                existing.columns.push(row.column);
                continue;
            }
            indexes.push(Self {
                name: row.index,
                columns: vec![row.column],
                unique: row.unique || row.primary,
                primary: row.primary,
                comment: row.comment,
            });
        }
        indexes
    }
}

/// Normalized description of a sequence owned by a table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceDetail {
    /// Sequence name.
    pub name: String,
    /// Schema (namespace) of the owning table.
    pub schema: Option<String>,
    /// Owning table.
    pub table: String,
    /// Owning column.
    pub column: Option<String>,
    /// Sequence data type.
    pub data_type: Option<String>,
    /// Minimum value.
    pub minimum: Option<i64>,
    /// Maximum value.
    pub maximum: Option<i64>,
    /// Increment.
    pub increment: Option<i64>,
    /// Whether the sequence wraps around.
    pub cycle: bool,
    /// Start value; absent when the server is too old to report it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_value: Option<i64>,
}

impl SequenceDetail {
    /// Reads the dialect-neutral sequence row produced by
    /// `list_sequences` queries.
    ///
    /// # Errors
    ///
    /// [`CatalogError::MissingField`] when the sequence or table name is
    /// missing.
    pub fn from_row(row: &CatalogRow) -> Result<Self, CatalogError> {
        Ok(Self {
            name: row.require("sequence")?.to_string(),
            schema: row.non_empty("schema"),
            table: row.require("table")?.to_string(),
            column: row.non_empty("column"),
            data_type: row.non_empty("data_type"),
            minimum: row.int("minimum_value"),
            maximum: row.int("maximum_value"),
            increment: row.int("increment"),
            cycle: row.flag("cycle_option"),
            start_value: row.int("start_value"),
        })
    }
}

/// Classifies a column against the table's indexes.
///
/// Precedence is PRIMARY, then UNIQUE, then MULTI.
#[must_use]
pub fn key_role(column: &str, indexes: &[IndexDetail]) -> KeyRole {
    let mut role = KeyRole::None;
    for index in indexes.iter().filter(|i| i.columns.iter().any(|c| c == column)) {
        if index.primary {
            return KeyRole::Primary;
        }
        if index.unique {
            role = KeyRole::Unique;
        } else if role == KeyRole::None {
            role = KeyRole::Multi;
        }
    }
    role
}

/// Fills in [`ColumnDetail::key`] for every column.
pub fn merge_key_roles(columns: &mut [ColumnDetail], indexes: &[IndexDetail]) {
    for column in columns {
        column.key = key_role(&column.name, indexes);
    }
}

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("version pattern is valid")
});

/// Database server version, compared numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServerVersion {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component.
    pub patch: u32,
}

impl ServerVersion {
    /// Creates a version.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for ServerVersion {
    type Err = CatalogError;

    /// Parses the first dotted number in a banner such as
    /// `"PostgreSQL 16.2 on x86_64"` or `"8.0.36-0ubuntu0.22.04.1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = VERSION_RE
            .captures(s)
            .ok_or_else(|| CatalogError::InvalidVersion(s.to_string()))?;
        let part = |i: usize| {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(0)
        };
        Ok(Self::new(part(1), part(2), part(3)))
    }
}
