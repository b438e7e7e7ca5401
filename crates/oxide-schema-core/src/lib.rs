//! # oxide-schema-core
//!
//! Dialect-neutral table schemas rendered to PostgreSQL or MySQL DDL.
//!
//! This crate is pure: it builds SQL text and normalizes catalog rows but
//! never talks to a database. The `oxide-schema` crate runs the statements.
//!
//! ```rust
//! use oxide_schema_core::dialect::{ColumnClause, PostgresDialect, QueryBuilder};
//! use oxide_schema_core::schema::{integer, varchar, TableOptions};
//!
//! let dialect = PostgresDialect::new();
//! let columns = [
//!     ColumnClause::resolve(&dialect, &integer("id").auto_increment().primary()),
//!     ColumnClause::resolve(&dialect, &varchar("name", 120).not_null()),
//! ];
//! let sql = dialect.create_table(
//!     "users",
//!     &columns,
//!     &["id".to_string()],
//!     &[],
//!     &TableOptions::default(),
//! );
//! assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"users\""));
//! ```

pub mod catalog;
pub mod dialect;
pub mod error;
pub mod schema;
pub mod types;

pub use catalog::{
    CatalogError, CatalogRow, ColumnDetail, IndexColumn, IndexDetail, KeyRole, SequenceDetail,
    ServerVersion,
};
pub use dialect::{
    ColumnClause, CommentTarget, Dialect, DropBehavior, MysqlDialect, PostgresDialect,
    QueryBuilder,
};
pub use error::{Result, SchemaError};
pub use schema::{Column, DefaultValue, Key, KeyType, Schema, TableOptions};
pub use types::{CanonicalType, Length, TypeMapper};
