//! The database connection seam.
//!
//! Everything above this trait is driver-agnostic. Quoting is not part of
//! the contract: statements arrive fully rendered by the dialect, so the
//! text that is logged in a dry run is the text that gets executed.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use oxide_schema_core::{CatalogRow, ServerVersion};

/// An open connection (or pool) able to run DDL and catalog queries.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Executes one statement and returns the number of affected rows.
    async fn execute(&self, sql: &str) -> Result<u64, sqlx::Error>;

    /// Runs a query, returning every cell as text.
    async fn query(&self, sql: &str) -> Result<Vec<CatalogRow>, sqlx::Error>;

    /// Returns the server version.
    async fn server_version(&self) -> Result<ServerVersion, sqlx::Error>;

    /// Returns the names of the tables in the current schema/database.
    async fn table_names(&self) -> Result<BTreeSet<String>, sqlx::Error>;
}

#[async_trait]
impl<T: Connection + ?Sized> Connection for &T {
    async fn execute(&self, sql: &str) -> Result<u64, sqlx::Error> {
        (**self).execute(sql).await
    }

    async fn query(&self, sql: &str) -> Result<Vec<CatalogRow>, sqlx::Error> {
        (**self).query(sql).await
    }

    async fn server_version(&self) -> Result<ServerVersion, sqlx::Error> {
        (**self).server_version().await
    }

    async fn table_names(&self) -> Result<BTreeSet<String>, sqlx::Error> {
        (**self).table_names().await
    }
}

#[async_trait]
impl<T: Connection + ?Sized> Connection for Arc<T> {
    async fn execute(&self, sql: &str) -> Result<u64, sqlx::Error> {
        (**self).execute(sql).await
    }

    async fn query(&self, sql: &str) -> Result<Vec<CatalogRow>, sqlx::Error> {
        (**self).query(sql).await
    }

    async fn server_version(&self) -> Result<ServerVersion, sqlx::Error> {
        (**self).server_version().await
    }

    async fn table_names(&self) -> Result<BTreeSet<String>, sqlx::Error> {
        (**self).table_names().await
    }
}

/// Parses a version banner, mapping failures to a driver decode error.
pub(crate) fn parse_version(banner: &str) -> Result<ServerVersion, sqlx::Error> {
    banner
        .parse::<ServerVersion>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
