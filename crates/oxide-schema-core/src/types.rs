//! Canonical column types and per-dialect type mapping.
//!
//! A [`CanonicalType`] is the dialect-neutral logical type a caller declares.
//! Each dialect implements [`TypeMapper`] to turn it into a native keyword,
//! decide whether a length suffix is allowed, and pick an auto-increment
//! strategy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Dialect-neutral logical column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalType {
    /// Boolean flag.
    Boolean,
    /// 8-bit integer.
    Tinyint,
    /// 16-bit integer.
    Smallint,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Bigint,
    /// Single precision float.
    Float,
    /// Double precision float.
    Double,
    /// Exact decimal with precision and scale.
    Decimal,
    /// Fixed-length character string.
    Char,
    /// Variable-length character string.
    Varchar,
    /// Unbounded text.
    Text,
    /// Large text (MySQL `LONGTEXT`).
    Longtext,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time without time zone.
    Datetime,
    /// Timestamp.
    Timestamp,
    /// Binary large object.
    Blob,
    /// JSON document.
    Json,
}

impl CanonicalType {
    /// Every canonical type, in declaration order.
    pub const ALL: [Self; 18] = [
        Self::Boolean,
        Self::Tinyint,
        Self::Smallint,
        Self::Integer,
        Self::Bigint,
        Self::Float,
        Self::Double,
        Self::Decimal,
        Self::Char,
        Self::Varchar,
        Self::Text,
        Self::Longtext,
        Self::Date,
        Self::Time,
        Self::Datetime,
        Self::Timestamp,
        Self::Blob,
        Self::Json,
    ];

    /// Returns the canonical (lowercase) name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Tinyint => "tinyint",
            Self::Smallint => "smallint",
            Self::Integer => "integer",
            Self::Bigint => "bigint",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::Char => "char",
            Self::Varchar => "varchar",
            Self::Text => "text",
            Self::Longtext => "longtext",
            Self::Date => "date",
            Self::Time => "time",
            Self::Datetime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Blob => "blob",
            Self::Json => "json",
        }
    }

    /// Character types (the source side of a text-to-numeric coercion).
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Char | Self::Varchar | Self::Text | Self::Longtext)
    }

    /// Numeric types (the target side of a text-to-numeric coercion).
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Tinyint
                | Self::Smallint
                | Self::Integer
                | Self::Bigint
                | Self::Float
                | Self::Double
                | Self::Decimal
        )
    }

    /// Integer types.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Tinyint | Self::Smallint | Self::Integer | Self::Bigint
        )
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalType {
    type Err = SchemaError;

    /// Parses a type name, accepting the usual synonyms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let ty = match normalized.as_str() {
            "boolean" | "bool" => Self::Boolean,
            "tinyint" => Self::Tinyint,
            "smallint" | "int2" => Self::Smallint,
            "integer" | "int" | "int4" => Self::Integer,
            "bigint" | "int8" => Self::Bigint,
            "float" | "real" | "float4" => Self::Float,
            "double" | "double precision" | "float8" => Self::Double,
            "decimal" | "numeric" => Self::Decimal,
            "char" | "character" => Self::Char,
            "varchar" | "character varying" => Self::Varchar,
            "text" => Self::Text,
            "longtext" => Self::Longtext,
            "date" => Self::Date,
            "time" | "time without time zone" => Self::Time,
            "datetime" => Self::Datetime,
            "timestamp" | "timestamp without time zone" => Self::Timestamp,
            "blob" | "bytea" => Self::Blob,
            "json" | "jsonb" => Self::Json,
            _ => return Err(SchemaError::UnknownType(s.to_string())),
        };
        Ok(ty)
    }
}

/// Length (or precision and scale) attached to a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Length {
    /// Single size, rendered `(n)`.
    Size(u32),
    /// Precision and scale, rendered `(p,s)`.
    Precision(u8, u8),
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(n) => write!(f, "({n})"),
            Self::Precision(p, s) => write!(f, "({p},{s})"),
        }
    }
}

impl FromStr for Length {
    type Err = SchemaError;

    /// Parses `"120"` or `"10,2"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SchemaError::InvalidOption {
            key: "length".to_string(),
            value: s.to_string(),
        };
        match s.split_once(',') {
            Some((p, scale)) => Ok(Self::Precision(
                p.trim().parse().map_err(|_| invalid())?,
                scale.trim().parse().map_err(|_| invalid())?,
            )),
            None => s.trim().parse().map(Self::Size).map_err(|_| invalid()),
        }
    }
}

/// How one canonical type is spelled in one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    /// Native type keyword, lowercase.
    pub native: &'static str,
    /// Length applied when the caller gives none.
    pub default_length: Option<Length>,
    /// The native type never takes a length suffix.
    pub no_length: bool,
}

impl TypeMapping {
    /// A type that takes a length, with an optional default.
    #[must_use]
    pub const fn sized(native: &'static str, default_length: Option<Length>) -> Self {
        Self {
            native,
            default_length,
            no_length: false,
        }
    }

    /// A type that never takes a length.
    #[must_use]
    pub const fn bare(native: &'static str) -> Self {
        Self {
            native,
            default_length: None,
            no_length: true,
        }
    }
}

/// How a dialect renders an auto-increment column of a given type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoIncrement {
    /// Native type to use for the column.
    pub native: &'static str,
    /// Whether a sequence object named by [`sequence_name`] backs the column.
    pub backing_sequence: bool,
}

/// Name of the sequence backing an auto-increment column.
///
/// Creation and introspection both derive the name from here, so nothing
/// extra has to be stored.
#[must_use]
pub fn sequence_name(table: &str, column: &str) -> String {
    format!("{table}_{column}_seq")
}

/// Per-dialect canonical type table.
///
/// [`mapping`](Self::mapping) must be an exhaustive `match` so that every
/// canonical type resolves.
pub trait TypeMapper {
    /// Returns the mapping record for a canonical type.
    fn mapping(&self, ty: CanonicalType) -> TypeMapping;

    /// Returns the auto-increment strategy for a canonical type.
    fn auto_increment(&self, ty: CanonicalType) -> AutoIncrement;

    /// Returns the native keyword and whether a length suffix is allowed.
    fn resolve(&self, ty: CanonicalType) -> (&'static str, bool) {
        let mapping = self.mapping(ty);
        (mapping.native, !mapping.no_length)
    }

    /// Returns the length used when a column declares none.
    fn default_length(&self, ty: CanonicalType) -> Option<Length> {
        self.mapping(ty).default_length
    }

    /// Renders the native type with its length suffix, if one applies.
    fn render_type(&self, ty: CanonicalType, length: Option<Length>) -> String {
        let mapping = self.mapping(ty);
        if mapping.no_length {
            return mapping.native.to_string();
        }
        match length.or(mapping.default_length) {
            Some(len) => format!("{}{len}", mapping.native),
            None => mapping.native.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_synonyms() {
        assert_eq!(
            "character varying".parse::<CanonicalType>().unwrap(),
            CanonicalType::Varchar
        );
        assert_eq!("INT".parse::<CanonicalType>().unwrap(), CanonicalType::Integer);
        assert_eq!(
            " Double Precision ".parse::<CanonicalType>().unwrap(),
            CanonicalType::Double
        );
    }

    #[test]
    fn parse_unknown_type_is_an_error() {
        assert_eq!(
            "geometry".parse::<CanonicalType>(),
            Err(SchemaError::UnknownType("geometry".to_string()))
        );
    }

    #[test]
    fn canonical_names_parse_back() {
        for ty in CanonicalType::ALL {
            assert_eq!(ty.as_str().parse::<CanonicalType>().unwrap(), ty);
        }
    }

    #[test]
    fn families() {
        assert!(CanonicalType::Varchar.is_text());
        assert!(!CanonicalType::Varchar.is_numeric());
        assert!(CanonicalType::Decimal.is_numeric());
        assert!(!CanonicalType::Decimal.is_integer());
        assert!(!CanonicalType::Json.is_text());
    }

    #[test]
    fn length_display_and_parse() {
        assert_eq!(Length::Size(120).to_string(), "(120)");
        assert_eq!(Length::Precision(10, 2).to_string(), "(10,2)");
        assert_eq!("10, 2".parse::<Length>().unwrap(), Length::Precision(10, 2));
        assert_eq!("64".parse::<Length>().unwrap(), Length::Size(64));
        assert!("abc".parse::<Length>().is_err());
    }

    #[test]
    fn sequence_name_is_deterministic() {
        assert_eq!(sequence_name("users", "id"), "users_id_seq");
    }
}
