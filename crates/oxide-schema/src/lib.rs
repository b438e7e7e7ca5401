//! Cross-dialect table management for PostgreSQL and MySQL.
//!
//! `oxide-schema` runs the DDL rendered by `oxide-schema-core` against a
//! live database and reads table structure back from the catalog.
//!
//! # Architecture
//!
//! - **Connection** - the async seam to the driver, with sqlx adapters
//! - **Batch executor** - runs statements in order, stopping at the first failure
//! - **Introspector** - catalog queries normalized into dialect-neutral records
//! - **Table** - create/alter/rename/drop orchestration with a lazily filled cache
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_schema::prelude::*;
//!
//! let pool = sqlx::PgPool::connect("postgres://localhost/app").await?;
//! let mut users = Table::new("users", PostgresDialect::new(), PostgresConnection::new(pool));
//!
//! let schema = Schema::new()
//!     .column(integer("id").auto_increment().primary())
//!     .column(varchar("name", 120).not_null())
//!     .column(text("bio").comment("About"))
//!     .key(Key::unique("idx_name", ["name"]));
//! users.create(&schema, &TableOptions::default()).await?;
//!
//! for column in users.columns().await? {
//!     println!("{} {}", column.name, column.native_type);
//! }
//! ```
//!
//! # Partial failure
//!
//! Batches are not wrapped in a transaction. When a statement fails,
//! [`Error::Batch`](error::Error::Batch) reports its index and the
//! statements before it remain applied.

pub mod batch;
pub mod connection;
pub mod driver;
pub mod error;
pub mod introspect;
pub mod table;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::batch::BatchExecutor;
    pub use crate::connection::Connection;
    pub use crate::driver::{MysqlConnection, PostgresConnection};
    pub use crate::error::{Error, Result};
    pub use crate::introspect::{Introspection, Introspector, IntrospectorConfig};
    pub use crate::table::Table;
    pub use oxide_schema_core::schema::{
        bigint, boolean, decimal, integer, text, timestamp, varchar,
    };
    pub use oxide_schema_core::{
        CanonicalType, Column, ColumnDetail, DefaultValue, Dialect, IndexDetail, Key, KeyRole,
        KeyType, Length, MysqlDialect, PostgresDialect, Schema, SchemaError, SequenceDetail,
        ServerVersion, TableOptions,
    };
}
