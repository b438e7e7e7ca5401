//! Dialect-specific SQL rendering and catalog normalization.
//!
//! Different databases spell DDL differently. A dialect implements three
//! capabilities:
//!
//! - [`TypeMapper`](crate::types::TypeMapper): canonical type → native type
//! - [`QueryBuilder`]: pure statement rendering, never executes anything
//! - [`Dialect`]: catalog row normalization into the canonical records
//!
//! The table manager is generic over one `Dialect` value chosen at
//! construction.

mod mysql;
mod postgres;

pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;

use crate::catalog::{CatalogError, CatalogRow, ColumnDetail, IndexColumn, SequenceDetail};
use crate::schema::{Column, DefaultValue, Key, KeyType, TableOptions};
use crate::types::TypeMapper;

/// A column after type resolution, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnClause {
    /// Column name.
    pub name: String,
    /// Native type including any length suffix.
    pub native_type: String,
    /// False only for unsigned numeric columns.
    pub signed: bool,
    /// Whether NULL is allowed.
    pub allow_null: bool,
    /// Default value.
    pub default: Option<DefaultValue>,
    /// Column comment.
    pub comment: Option<String>,
    /// Auto-increment column.
    pub auto_increment: bool,
    /// A sequence named `{table}_{column}_seq` backs this column.
    pub backing_sequence: bool,
}

impl ColumnClause {
    /// Resolves a column through a type mapper.
    ///
    /// Lengths are dropped for types that take none, the dialect default
    /// length applies when the column has none, and auto-increment columns
    /// switch to the dialect's auto-increment type.
    pub fn resolve<M: TypeMapper + ?Sized>(mapper: &M, column: &Column) -> Self {
        let strategy = column
            .auto_increment
            .then(|| mapper.auto_increment(column.ty));
        let native_type = match strategy {
            Some(ai) if ai.backing_sequence => ai.native.to_string(),
            _ => mapper.render_type(column.ty, column.length),
        };
        Self {
            name: column.name.clone(),
            native_type,
            signed: column.signed || !column.ty.is_numeric(),
            allow_null: column.allow_null,
            default: column.default.clone(),
            comment: column.comment.clone(),
            auto_increment: column.auto_increment,
            backing_sequence: strategy.is_some_and(|ai| ai.backing_sequence),
        }
    }
}

/// Behavior of `DROP CONSTRAINT` towards dependent objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropBehavior {
    /// Refuse if anything depends on the constraint.
    #[default]
    Restrict,
    /// Drop dependents too.
    Cascade,
}

impl DropBehavior {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
        }
    }
}

/// Object a comment is attached to.
#[derive(Debug, Clone, Copy)]
pub enum CommentTarget<'a> {
    /// A table.
    Table(&'a str),
    /// A column of a table. The full clause is available for dialects that
    /// can only comment a column by redefining it.
    Column {
        /// Table name.
        table: &'a str,
        /// The column, in its final shape.
        column: &'a ColumnClause,
    },
    /// An index.
    Index {
        /// Table the index belongs to.
        table: &'a str,
        /// Index name.
        name: &'a str,
    },
}

/// Pure SQL rendering for DDL and catalog queries.
pub trait QueryBuilder {
    /// Returns the identifier quote character.
    fn quote_char(&self) -> char {
        '"'
    }

    /// Quotes an identifier, doubling embedded quote characters.
    fn quote_identifier(&self, name: &str) -> String {
        let q = self.quote_char();
        let escaped = name.replace(q, &format!("{q}{q}"));
        format!("{q}{escaped}{q}")
    }

    /// Quotes a table name, schema-qualified when the dialect targets one.
    fn quote_table(&self, name: &str) -> String {
        self.quote_identifier(name)
    }

    /// Quotes a string literal.
    fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Renders a default value.
    fn render_default(&self, default: &DefaultValue) -> String {
        match default {
            DefaultValue::Literal(s) => self.quote_literal(s),
            DefaultValue::Integer(i) => i.to_string(),
            DefaultValue::Float(f) => f.to_string(),
            DefaultValue::Boolean(b) => String::from(if *b { "TRUE" } else { "FALSE" }),
            DefaultValue::Expression(expr) => expr.clone(),
        }
    }

    /// Whether secondary keys are declared inside `CREATE TABLE`.
    fn inline_keys(&self) -> bool {
        false
    }

    /// Whether column and index comments are part of their definitions.
    fn inline_comments(&self) -> bool {
        false
    }

    /// Renders one column clause of `CREATE TABLE` / `ADD COLUMN`.
    fn column_definition(&self, column: &ColumnClause) -> String;

    /// Renders `CREATE TABLE`.
    ///
    /// Columns appear in the given order, followed by a single primary key
    /// clause when `primary` is non-empty. `keys` are only rendered by
    /// dialects whose [`inline_keys`](Self::inline_keys) is true.
    fn create_table(
        &self,
        name: &str,
        columns: &[ColumnClause],
        primary: &[String],
        keys: &[Key],
        options: &TableOptions,
    ) -> String;

    /// Renders `ADD COLUMN`.
    fn add_column(&self, table: &str, column: &ColumnClause) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote_table(table),
            self.column_definition(column)
        )
    }

    /// Renders `DROP COLUMN`.
    fn drop_column(&self, table: &str, column: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.quote_table(table),
            self.quote_identifier(column)
        )
    }

    /// Renders a column rename.
    fn rename_column(&self, table: &str, old_name: &str, new_name: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            self.quote_table(table),
            self.quote_identifier(old_name),
            self.quote_identifier(new_name)
        )
    }

    /// Renders a table rename.
    fn rename_table(&self, old_name: &str, new_name: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME TO {}",
            self.quote_table(old_name),
            self.quote_identifier(new_name)
        )
    }

    /// Renders a column type change, with an optional conversion clause.
    fn alter_column_type(
        &self,
        table: &str,
        column: &ColumnClause,
        using: Option<&str>,
    ) -> String;

    /// Renders a nullability change.
    fn alter_column_nullability(&self, table: &str, column: &ColumnClause) -> String;

    /// Renders `SET DEFAULT`.
    fn alter_column_default(&self, table: &str, column: &str, default: &DefaultValue) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {}",
            self.quote_table(table),
            self.quote_identifier(column),
            self.render_default(default)
        )
    }

    /// Renders index creation. PRIMARY keys become `ADD PRIMARY KEY`.
    fn add_index(&self, table: &str, key: &Key) -> String {
        let cols = self.quote_list(&key.columns);
        match key.key_type {
            KeyType::Primary => format!(
                "ALTER TABLE {} ADD PRIMARY KEY ({cols})",
                self.quote_table(table)
            ),
            KeyType::Unique => format!(
                "CREATE UNIQUE INDEX {} ON {} ({cols})",
                self.quote_identifier(&key.name),
                self.quote_table(table)
            ),
            KeyType::Index => format!(
                "CREATE INDEX {} ON {} ({cols})",
                self.quote_identifier(&key.name),
                self.quote_table(table)
            ),
        }
    }

    /// Renders index removal.
    fn drop_index(&self, table: &str, name: &str, if_exists: bool) -> String;

    /// Renders constraint removal.
    fn drop_constraint(
        &self,
        table: &str,
        name: &str,
        if_exists: bool,
        behavior: DropBehavior,
    ) -> String;

    /// Renders a standalone comment statement. `None` text clears the
    /// comment. Returns `None` when the dialect has no standalone form.
    fn comment_on(&self, target: CommentTarget<'_>, text: Option<&str>) -> Option<String>;

    /// Statement applying the auto-increment seed to a backing sequence.
    /// The sequence of a table that already holds rows stays untouched.
    fn sequence_seed(&self, _table: &str, _column: &str, _seed: u64) -> Option<String> {
        None
    }

    /// Conversion clause for a text column changing to a numeric type.
    fn text_to_numeric_cast(&self, _column: &str, _native_type: &str) -> Option<String> {
        None
    }

    /// Catalog query describing the table's columns in ordinal order.
    fn describe_columns(&self, table: &str) -> String;

    /// Catalog query listing one row per (index, column).
    fn list_indexes(&self, table: &str) -> String;

    /// Catalog query listing the sequences owned by the table, `None` when
    /// the dialect has no sequences.
    fn list_sequences(&self, _table: &str, _with_start_value: bool) -> Option<String> {
        None
    }

    /// Quotes and joins a column list.
    fn quote_list(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|c| self.quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A complete dialect: type mapping, rendering and catalog normalization.
pub trait Dialect: QueryBuilder + TypeMapper + Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Normalizes a native type spelling reported by the catalog.
    fn normalize_type(&self, native: &str) -> String;

    /// Builds a column record from one `describe_columns` row. The key role
    /// is left unset; it is merged from the index list afterwards.
    ///
    /// # Errors
    ///
    /// [`CatalogError::MissingField`] when the row lacks a required cell.
    fn column_detail(&self, row: &CatalogRow) -> Result<ColumnDetail, CatalogError>;

    /// Builds one (index, column) pair from a `list_indexes` row.
    ///
    /// # Errors
    ///
    /// [`CatalogError::MissingField`] when the row lacks a required cell.
    fn index_column(&self, row: &CatalogRow) -> Result<IndexColumn, CatalogError>;

    /// Builds a sequence record from a `list_sequences` row.
    ///
    /// # Errors
    ///
    /// [`CatalogError::MissingField`] when the row lacks a required cell.
    fn sequence_detail(&self, row: &CatalogRow) -> Result<SequenceDetail, CatalogError> {
        SequenceDetail::from_row(row)
    }
}
