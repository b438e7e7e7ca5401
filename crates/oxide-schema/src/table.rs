//! The table manager.
//!
//! A [`Table`] is bound to one table name, one dialect and one connection.
//! It keeps the last introspection result as a single cached value: the
//! cache is filled on the first read and dropped after every mutating
//! operation, whether or not the operation succeeded.
//!
//! Every mutating operation has a `plan_*` twin returning the statements it
//! would run.

use oxide_schema_core::{
    CanonicalType, Column, ColumnClause, ColumnDetail, CommentTarget, Dialect, DropBehavior,
    IndexDetail, Key, KeyType, Schema, SchemaError, SequenceDetail, TableOptions,
};
use tracing::{debug, info};

use crate::batch::BatchExecutor;
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::introspect::{Introspection, Introspector, IntrospectorConfig};

/// Manages one table.
pub struct Table<D, C> {
    name: String,
    dialect: D,
    connection: C,
    executor: BatchExecutor,
    config: IntrospectorConfig,
    cache: Option<Introspection>,
}

impl<D: Dialect, C: Connection> Table<D, C> {
    /// Creates a manager for `name`. Nothing is read until first needed.
    pub fn new(name: impl Into<String>, dialect: D, connection: C) -> Self {
        Self {
            name: name.into(),
            dialect,
            connection,
            executor: BatchExecutor::new(),
            config: IntrospectorConfig::default(),
            cache: None,
        }
    }

    /// Enables dry-run mode: mutating operations log their statements
    /// instead of executing them.
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.executor = self.executor.dry_run(enabled);
        self
    }

    /// Replaces the introspection settings.
    #[must_use]
    pub const fn with_introspector_config(mut self, config: IntrospectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the dialect.
    #[must_use]
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Returns the connection.
    #[must_use]
    pub const fn connection(&self) -> &C {
        &self.connection
    }

    /// Returns whether a cached introspection is held.
    #[must_use]
    pub const fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    fn introspector(&self) -> Introspector<'_, D, C> {
        Introspector::new(&self.dialect, &self.connection).with_config(self.config)
    }

    // -------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------

    /// Returns the cached introspection, reading the catalog on a miss.
    async fn introspection(&mut self) -> Result<&Introspection> {
        let introspection = match self.cache.take() {
            Some(cached) => cached,
            None => self.introspector().introspect(&self.name).await?,
        };
        Ok(self.cache.insert(introspection))
    }

    /// Drops the cache and reads the catalog again.
    ///
    /// # Errors
    ///
    /// Catalog query failures.
    pub async fn refresh(&mut self) -> Result<&Introspection> {
        self.cache = None;
        self.introspection().await
    }

    /// Returns the table's columns in ordinal order.
    ///
    /// # Errors
    ///
    /// Catalog query failures.
    pub async fn columns(&mut self) -> Result<Vec<ColumnDetail>> {
        Ok(self.introspection().await?.columns.clone())
    }

    /// Returns one column.
    ///
    /// # Errors
    ///
    /// [`Error::ColumnNotFound`] if the table has no such column.
    pub async fn column(&mut self, name: &str) -> Result<ColumnDetail> {
        let found = self.introspection().await?.column(name).cloned();
        found.ok_or_else(|| Error::ColumnNotFound {
            table: self.name.clone(),
            column: name.to_string(),
        })
    }

    /// Returns the table's indexes.
    ///
    /// # Errors
    ///
    /// Catalog query failures.
    pub async fn indexes(&mut self) -> Result<Vec<IndexDetail>> {
        Ok(self.introspection().await?.indexes.clone())
    }

    /// Whether the table has a column named `name`.
    ///
    /// # Errors
    ///
    /// Catalog query failures.
    pub async fn has_column(&mut self, name: &str) -> Result<bool> {
        Ok(self.introspection().await?.column(name).is_some())
    }

    /// Whether the table has an index named `name`.
    ///
    /// # Errors
    ///
    /// Catalog query failures.
    pub async fn has_index(&mut self, name: &str) -> Result<bool> {
        Ok(self.introspection().await?.index(name).is_some())
    }

    /// Returns the sequences owned by the table. Not cached.
    ///
    /// # Errors
    ///
    /// [`Error::TableNotFound`] if the table does not exist.
    pub async fn sequences(&self) -> Result<Vec<SequenceDetail>> {
        self.introspector().sequences(&self.name).await
    }

    /// Whether the table exists.
    ///
    /// # Errors
    ///
    /// Catalog query failures.
    pub async fn exists(&self) -> Result<bool> {
        Ok(self.connection.table_names().await?.contains(&self.name))
    }

    // -------------------------------------------------------------------
    // Plans
    // -------------------------------------------------------------------

    /// Statements creating the table from `schema`.
    ///
    /// Order: `CREATE TABLE`, table and column comments, sequence seeds,
    /// then each secondary index followed by its comment.
    ///
    /// # Errors
    ///
    /// [`Error::Schema`] if the schema is invalid.
    pub fn plan_create(&self, schema: &Schema, options: &TableOptions) -> Result<Vec<String>> {
        schema.validate()?;

        let columns: Vec<ColumnClause> = schema
            .columns()
            .iter()
            .map(|c| ColumnClause::resolve(&self.dialect, c))
            .collect();
        let primary = schema.primary_columns();
        let keys: Vec<Key> = schema.secondary_keys().cloned().collect();

        let mut statements = vec![self.dialect.create_table(
            &self.name,
            &columns,
            &primary,
            &keys,
            options,
        )];

        if !self.dialect.inline_comments() {
            if let Some(ref comment) = options.comment {
                statements.extend(
                    self.dialect
                        .comment_on(CommentTarget::Table(&self.name), Some(comment.as_str())),
                );
            }
            for column in columns.iter().filter(|c| c.comment.is_some()) {
                let target = CommentTarget::Column {
                    table: &self.name,
                    column,
                };
                statements.extend(self.dialect.comment_on(target, column.comment.as_deref()));
            }
        }

        for column in columns.iter().filter(|c| c.backing_sequence) {
            statements.extend(self.dialect.sequence_seed(
                &self.name,
                &column.name,
                options.auto_increment_seed,
            ));
        }

        if !self.dialect.inline_keys() {
            for key in &keys {
                statements.extend(self.index_statements(key));
            }
        }

        Ok(statements)
    }

    /// Statements adding `column`.
    #[must_use]
    pub fn plan_add_column(&self, column: &Column) -> Vec<String> {
        let clause = ColumnClause::resolve(&self.dialect, column);
        let mut statements = vec![self.dialect.add_column(&self.name, &clause)];
        if !self.dialect.inline_comments() && clause.comment.is_some() {
            let target = CommentTarget::Column {
                table: &self.name,
                column: &clause,
            };
            statements.extend(self.dialect.comment_on(target, clause.comment.as_deref()));
        }
        statements
    }

    /// Statement dropping `column`.
    #[must_use]
    pub fn plan_drop_column(&self, column: &str) -> Vec<String> {
        vec![self.dialect.drop_column(&self.name, column)]
    }

    /// Statements bringing an existing column to the definition `column`.
    ///
    /// # Errors
    ///
    /// [`Error::ColumnNotFound`] if the column does not exist.
    pub async fn plan_modify_column(&mut self, column: &Column) -> Result<Vec<String>> {
        let previous = self.column(&column.name).await?;
        Ok(self.alteration(&column.name, column, &previous))
    }

    /// Like [`plan_modify_column`](Self::plan_modify_column), followed by
    /// a rename from `old_name` to `column.name` when they differ.
    ///
    /// # Errors
    ///
    /// [`Error::ColumnNotFound`] if `old_name` does not exist.
    pub async fn plan_change_column(
        &mut self,
        old_name: &str,
        column: &Column,
    ) -> Result<Vec<String>> {
        let previous = self.column(old_name).await?;
        let mut statements = self.alteration(old_name, column, &previous);
        if old_name != column.name {
            statements.push(
                self.dialect
                    .rename_column(&self.name, old_name, &column.name),
            );
        }
        Ok(statements)
    }

    /// Statements creating `key`.
    ///
    /// # Errors
    ///
    /// [`Error::Schema`] if the key has no columns.
    pub fn plan_add_index(&self, key: &Key) -> Result<Vec<String>> {
        key.validate()?;
        Ok(self.index_statements(key))
    }

    /// Statement dropping an index, or a constraint when `constraint` is set.
    #[must_use]
    pub fn plan_drop_index(&self, name: &str, constraint: bool) -> Vec<String> {
        let sql = if constraint {
            self.dialect
                .drop_constraint(&self.name, name, true, DropBehavior::Restrict)
        } else {
            self.dialect.drop_index(&self.name, name, true)
        };
        vec![sql]
    }

    /// Statement renaming the table.
    #[must_use]
    pub fn plan_rename(&self, new_name: &str) -> Vec<String> {
        vec![self.dialect.rename_table(&self.name, new_name)]
    }

    // -------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------

    /// Creates the table.
    ///
    /// # Errors
    ///
    /// [`Error::Schema`] before anything runs, or [`Error::Batch`] when a
    /// statement fails (earlier statements stay applied).
    pub async fn create(&mut self, schema: &Schema, options: &TableOptions) -> Result<()> {
        let statements = self.plan_create(schema, options)?;
        info!(table = %self.name, columns = schema.columns().len(), "Creating table");
        self.submit(&statements).await
    }

    /// Adds a column.
    ///
    /// # Errors
    ///
    /// [`Error::Batch`] when a statement fails.
    pub async fn add_column(&mut self, column: &Column) -> Result<()> {
        let statements = self.plan_add_column(column);
        info!(table = %self.name, column = %column.name, "Adding column");
        self.submit(&statements).await
    }

    /// Drops a column.
    ///
    /// # Errors
    ///
    /// [`Error::Batch`] when the statement fails.
    pub async fn drop_column(&mut self, column: &str) -> Result<()> {
        let statements = self.plan_drop_column(column);
        info!(table = %self.name, column = %column, "Dropping column");
        self.submit(&statements).await
    }

    /// Changes a column's type, nullability, default and comment.
    ///
    /// Statements run in a fixed order: type, nullability, default (only
    /// when one is given), comment. A text column becoming numeric is
    /// trimmed and cast explicitly where the dialect supports it.
    ///
    /// # Errors
    ///
    /// [`Error::ColumnNotFound`] or [`Error::Batch`].
    pub async fn modify_column(&mut self, column: &Column) -> Result<()> {
        let statements = self.plan_modify_column(column).await?;
        info!(table = %self.name, column = %column.name, "Modifying column");
        self.submit(&statements).await
    }

    /// Modifies the column named `old_name`, then renames it to
    /// `column.name`. The rename always runs last.
    ///
    /// # Errors
    ///
    /// [`Error::ColumnNotFound`] or [`Error::Batch`].
    pub async fn change_column(&mut self, old_name: &str, column: &Column) -> Result<()> {
        let statements = self.plan_change_column(old_name, column).await?;
        info!(
            table = %self.name,
            from = %old_name,
            to = %column.name,
            "Changing column"
        );
        self.submit(&statements).await
    }

    /// Creates an index unless one with the same name already exists. A
    /// primary key is skipped whenever the table already has one, whatever
    /// the catalog calls it.
    ///
    /// # Errors
    ///
    /// [`Error::Schema`] if the key has no columns or names a column the
    /// table lacks; [`Error::Batch`] when a statement fails.
    pub async fn add_index(&mut self, key: &Key) -> Result<()> {
        key.validate()?;

        let current = self.refresh().await?;
        let missing = key
            .columns
            .iter()
            .find(|c| current.column(c).is_none())
            .cloned();
        let exists = match key.key_type {
            KeyType::Primary => current.indexes.iter().any(|i| i.primary),
            _ => current.index(&key.name).is_some(),
        };

        if let Some(column) = missing {
            return Err(SchemaError::UnknownColumn {
                column,
                context: key.name.clone(),
            }
            .into());
        }
        if exists {
            debug!(table = %self.name, index = %key.name, "Index already exists, skipping");
            return Ok(());
        }

        let statements = self.index_statements(key);
        info!(table = %self.name, index = %key.name, "Adding index");
        self.submit(&statements).await
    }

    /// Drops an index.
    ///
    /// A plain index drop is skipped when the index does not exist. A
    /// constraint drop is never checked beforehand and relies on the
    /// dialect's `IF EXISTS`.
    ///
    /// # Errors
    ///
    /// [`Error::Batch`] when the statement fails.
    pub async fn drop_index(&mut self, name: &str, constraint: bool) -> Result<()> {
        if !constraint && !self.has_index(name).await? {
            debug!(table = %self.name, index = %name, "Index does not exist, skipping");
            return Ok(());
        }
        let statements = self.plan_drop_index(name, constraint);
        info!(table = %self.name, index = %name, constraint, "Dropping index");
        self.submit(&statements).await
    }

    /// Renames the table and rebinds the manager to the new name with an
    /// empty cache. On failure the manager keeps its old name.
    ///
    /// # Errors
    ///
    /// [`Error::Batch`] when the statement fails.
    pub async fn rename(&mut self, new_name: &str) -> Result<()> {
        let statements = self.plan_rename(new_name);
        info!(from = %self.name, to = %new_name, "Renaming table");
        self.submit(&statements).await?;
        self.name = new_name.to_string();
        Ok(())
    }

    // -------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------

    async fn submit(&mut self, statements: &[String]) -> Result<()> {
        let outcome = self.executor.run(&self.connection, statements).await;
        self.cache = None;
        outcome
    }

    fn index_statements(&self, key: &Key) -> Vec<String> {
        let mut statements = vec![self.dialect.add_index(&self.name, key)];
        if !self.dialect.inline_comments() && key.comment.is_some() {
            let target = CommentTarget::Index {
                table: &self.name,
                name: &key.name,
            };
            statements.extend(self.dialect.comment_on(target, key.comment.as_deref()));
        }
        statements
    }

    /// Type, nullability, default and comment statements addressing the
    /// column by `current_name`.
    fn alteration(
        &self,
        current_name: &str,
        column: &Column,
        previous: &ColumnDetail,
    ) -> Vec<String> {
        let mut clause = ColumnClause::resolve(&self.dialect, column);
        clause.name = current_name.to_string();
        // serial pseudo-types only exist in CREATE TABLE
        if clause.backing_sequence {
            clause.native_type = self.dialect.render_type(column.ty, column.length);
        }

        let using = self.coercion(previous, column.ty, &clause);
        let mut statements = vec![
            self.dialect
                .alter_column_type(&self.name, &clause, using.as_deref()),
            self.dialect.alter_column_nullability(&self.name, &clause),
        ];
        if let Some(ref default) = column.default {
            statements.push(
                self.dialect
                    .alter_column_default(&self.name, current_name, default),
            );
        }
        if !self.dialect.inline_comments() {
            let target = CommentTarget::Column {
                table: &self.name,
                column: &clause,
            };
            statements.extend(self.dialect.comment_on(target, clause.comment.as_deref()));
        }
        statements
    }

    /// Conversion clause for a text-family column becoming numeric.
    fn coercion(
        &self,
        previous: &ColumnDetail,
        target: CanonicalType,
        clause: &ColumnClause,
    ) -> Option<String> {
        let from_text = previous
            .base_type()
            .parse::<CanonicalType>()
            .is_ok_and(CanonicalType::is_text);
        if from_text && target.is_numeric() {
            self.dialect
                .text_to_numeric_cast(&clause.name, &clause.native_type)
        } else {
            None
        }
    }
}
