//! Sequential statement execution.
//!
//! Batches are not atomic. Statements run strictly in order and execution
//! stops at the first failure; statements that already ran stay applied.
//! Callers needing all-or-nothing DDL must open a transaction on the
//! connection themselves (PostgreSQL only; MySQL commits DDL implicitly).

use tracing::{debug, info};

use crate::connection::Connection;
use crate::error::{Error, Result};

/// Runs ordered SQL statements against a connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchExecutor {
    dry_run: bool,
}

impl BatchExecutor {
    /// Creates an executor that executes statements.
    #[must_use]
    pub const fn new() -> Self {
        Self { dry_run: false }
    }

    /// Enables dry-run mode (statements are logged but not executed).
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Returns whether dry-run mode is enabled.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Executes `statements` in order. Blank statements are skipped.
    ///
    /// # Errors
    ///
    /// [`Error::Batch`] carrying the index and text of the first statement
    /// that failed.
    pub async fn run<C>(&self, connection: &C, statements: &[String]) -> Result<()>
    where
        C: Connection + ?Sized,
    {
        for (index, sql) in statements.iter().enumerate() {
            let sql = sql.trim();
            if sql.is_empty() {
                continue;
            }

            if self.dry_run {
                info!(sql = %sql, "Dry run, not executing");
                continue;
            }

            debug!(index, sql = %sql, "Executing SQL");
            connection
                .execute(sql)
                .await
                .map_err(|source| Error::Batch {
                    index,
                    statement: sql.to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}
