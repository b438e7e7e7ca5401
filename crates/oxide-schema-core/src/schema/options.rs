//! Table-level creation options.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Options applied when a table is created.
///
/// Unknown keys are rejected both by [`TableOptions::set`] and when
/// deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableOptions {
    /// First value handed out by auto-increment columns. Defaults to 1.
    pub auto_increment_seed: u64,
    /// Parent table (PostgreSQL `INHERITS`).
    pub inherits: Option<String>,
    /// Tablespace (PostgreSQL `TABLESPACE`).
    pub tablespace: Option<String>,
    /// Storage engine (MySQL `ENGINE`).
    pub engine: Option<String>,
    /// Render `IF NOT EXISTS`. Defaults to true.
    pub if_not_exists: bool,
    /// Table comment.
    pub comment: Option<String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            auto_increment_seed: 1,
            inherits: None,
            tablespace: None,
            engine: None,
            if_not_exists: true,
            comment: None,
        }
    }
}

impl TableOptions {
    /// Builds options from string pairs, e.g. parsed from a config file.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown key or unparsable value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            options.set(key.as_ref(), value.as_ref())?;
        }
        Ok(options)
    }

    /// Sets one option by name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownOption`] for keys outside the
    /// recognized set and [`SchemaError::InvalidOption`] for bad values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || SchemaError::InvalidOption {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "auto_increment_seed" | "auto_increment" => {
                self.auto_increment_seed = value.trim().parse().map_err(|_| invalid())?;
            }
            "inherits" => self.inherits = Some(value.to_string()),
            "tablespace" => self.tablespace = Some(value.to_string()),
            "engine" => self.engine = Some(value.to_string()),
            "comment" => self.comment = Some(value.to_string()),
            "if_not_exists" => {
                self.if_not_exists = match value.trim().to_ascii_lowercase().as_str() {
                    "1" | "true" | "yes" => true,
                    "0" | "false" | "no" => false,
                    _ => return Err(invalid()),
                };
            }
            _ => return Err(SchemaError::UnknownOption(key.to_string())),
        }
        Ok(())
    }

    /// Sets the auto-increment seed.
    #[must_use]
    pub const fn auto_increment_seed(mut self, seed: u64) -> Self {
        self.auto_increment_seed = seed;
        self
    }

    /// Sets the parent table.
    #[must_use]
    pub fn inherits(mut self, parent: impl Into<String>) -> Self {
        self.inherits = Some(parent.into());
        self
    }

    /// Sets the tablespace.
    #[must_use]
    pub fn tablespace(mut self, tablespace: impl Into<String>) -> Self {
        self.tablespace = Some(tablespace.into());
        self
    }

    /// Sets the storage engine.
    #[must_use]
    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    /// Sets the table comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Toggles `IF NOT EXISTS`.
    #[must_use]
    pub const fn if_not_exists(mut self, enabled: bool) -> Self {
        self.if_not_exists = enabled;
        self
    }
}
