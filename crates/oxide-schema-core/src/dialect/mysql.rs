//! MySQL / MariaDB dialect.
//!
//! MySQL has no standalone comment statement and no conversion clause on
//! type changes: column comments and type changes are expressed by
//! restating the full column definition with `MODIFY COLUMN`. Secondary
//! keys and comments are declared inline in `CREATE TABLE`.

use std::sync::LazyLock;

use regex::Regex;

use super::{ColumnClause, CommentTarget, Dialect, DropBehavior, QueryBuilder};
use crate::catalog::{CatalogError, CatalogRow, ColumnDetail, IndexColumn, KeyRole};
use crate::schema::{DefaultValue, Key, KeyType, TableOptions};
use crate::types::{AutoIncrement, CanonicalType, Length, TypeMapper, TypeMapping};

/// Integer display widths (`int(11)`), dropped by MySQL 8.0.19+.
static DISPLAY_WIDTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(tinyint|smallint|mediumint|int|bigint)\(\d+\)")
        .expect("display width pattern is valid")
});

/// MySQL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Creates a MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn modify_column(&self, table: &str, column: &ColumnClause) -> String {
        format!(
            "ALTER TABLE {} MODIFY COLUMN {}",
            self.quote_identifier(table),
            self.column_definition(column)
        )
    }

    fn key_clause(&self, key: &Key) -> Option<String> {
        let kind = match key.key_type {
            KeyType::Primary => return None,
            KeyType::Unique => "UNIQUE KEY",
            KeyType::Index => "KEY",
        };
        let mut sql = format!(
            "{kind} {} ({})",
            self.quote_identifier(&key.name),
            self.quote_list(&key.columns)
        );
        if let Some(ref comment) = key.comment {
            sql.push_str(" COMMENT ");
            sql.push_str(&self.quote_literal(comment));
        }
        Some(sql)
    }
}

impl TypeMapper for MysqlDialect {
    fn mapping(&self, ty: CanonicalType) -> TypeMapping {
        match ty {
            CanonicalType::Boolean => TypeMapping::sized("tinyint", Some(Length::Size(1))),
            CanonicalType::Tinyint => TypeMapping::sized("tinyint", Some(Length::Size(4))),
            CanonicalType::Smallint => TypeMapping::sized("smallint", Some(Length::Size(6))),
            CanonicalType::Integer => TypeMapping::sized("int", Some(Length::Size(11))),
            CanonicalType::Bigint => TypeMapping::sized("bigint", Some(Length::Size(20))),
            CanonicalType::Float => TypeMapping::bare("float"),
            CanonicalType::Double => TypeMapping::bare("double"),
            CanonicalType::Decimal => {
                TypeMapping::sized("decimal", Some(Length::Precision(10, 2)))
            }
            CanonicalType::Char => TypeMapping::sized("char", Some(Length::Size(1))),
            CanonicalType::Varchar => TypeMapping::sized("varchar", Some(Length::Size(255))),
            CanonicalType::Text => TypeMapping::bare("text"),
            CanonicalType::Longtext => TypeMapping::bare("longtext"),
            CanonicalType::Date => TypeMapping::bare("date"),
            CanonicalType::Time => TypeMapping::bare("time"),
            CanonicalType::Datetime => TypeMapping::bare("datetime"),
            CanonicalType::Timestamp => TypeMapping::bare("timestamp"),
            CanonicalType::Blob => TypeMapping::bare("blob"),
            CanonicalType::Json => TypeMapping::bare("json"),
        }
    }

    fn auto_increment(&self, ty: CanonicalType) -> AutoIncrement {
        AutoIncrement {
            native: self.mapping(ty).native,
            backing_sequence: false,
        }
    }
}

impl QueryBuilder for MysqlDialect {
    fn quote_char(&self) -> char {
        '`'
    }

    fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
    }

    fn render_default(&self, default: &DefaultValue) -> String {
        match default {
            DefaultValue::Boolean(b) => String::from(if *b { "1" } else { "0" }),
            DefaultValue::Literal(s) => self.quote_literal(s),
            DefaultValue::Integer(i) => i.to_string(),
            DefaultValue::Float(f) => f.to_string(),
            DefaultValue::Expression(expr) => expr.clone(),
        }
    }

    fn inline_keys(&self) -> bool {
        true
    }

    fn inline_comments(&self) -> bool {
        true
    }

    fn column_definition(&self, column: &ColumnClause) -> String {
        let mut sql = format!(
            "{} {}",
            self.quote_identifier(&column.name),
            column.native_type
        );
        if !column.signed {
            sql.push_str(" unsigned");
        }
        if !column.allow_null {
            sql.push_str(" NOT NULL");
        }
        if let Some(ref default) = column.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.render_default(default));
        }
        if column.auto_increment {
            sql.push_str(" AUTO_INCREMENT");
        }
        if let Some(ref comment) = column.comment {
            sql.push_str(" COMMENT ");
            sql.push_str(&self.quote_literal(comment));
        }
        sql
    }

    fn create_table(
        &self,
        name: &str,
        columns: &[ColumnClause],
        primary: &[String],
        keys: &[Key],
        options: &TableOptions,
    ) -> String {
        let mut sql = String::from("CREATE TABLE ");
        if options.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&self.quote_identifier(name));
        sql.push_str(" (\n");

        let mut clauses: Vec<String> = columns
            .iter()
            .map(|c| format!("    {}", self.column_definition(c)))
            .collect();
        if !primary.is_empty() {
            clauses.push(format!("    PRIMARY KEY ({})", self.quote_list(primary)));
        }
        clauses.extend(
            keys.iter()
                .filter_map(|k| self.key_clause(k))
                .map(|k| format!("    {k}")),
        );
        sql.push_str(&clauses.join(",\n"));
        sql.push_str("\n)");

        if let Some(ref engine) = options.engine {
            sql.push_str(&format!(" ENGINE={engine}"));
        }
        if columns.iter().any(|c| c.auto_increment) {
            sql.push_str(&format!(" AUTO_INCREMENT={}", options.auto_increment_seed));
        }
        if let Some(ref comment) = options.comment {
            sql.push_str(&format!(" COMMENT={}", self.quote_literal(comment)));
        }
        sql
    }

    fn rename_table(&self, old_name: &str, new_name: &str) -> String {
        format!(
            "RENAME TABLE {} TO {}",
            self.quote_identifier(old_name),
            self.quote_identifier(new_name)
        )
    }

    // MODIFY has no conversion clause; the server converts implicitly.
    fn alter_column_type(
        &self,
        table: &str,
        column: &ColumnClause,
        _using: Option<&str>,
    ) -> String {
        self.modify_column(table, column)
    }

    fn alter_column_nullability(&self, table: &str, column: &ColumnClause) -> String {
        self.modify_column(table, column)
    }

    fn add_index(&self, table: &str, key: &Key) -> String {
        let cols = self.quote_list(&key.columns);
        let mut sql = match key.key_type {
            KeyType::Primary => {
                return format!(
                    "ALTER TABLE {} ADD PRIMARY KEY ({cols})",
                    self.quote_identifier(table)
                )
            }
            KeyType::Unique => format!(
                "CREATE UNIQUE INDEX {} ON {} ({cols})",
                self.quote_identifier(&key.name),
                self.quote_identifier(table)
            ),
            KeyType::Index => format!(
                "CREATE INDEX {} ON {} ({cols})",
                self.quote_identifier(&key.name),
                self.quote_identifier(table)
            ),
        };
        if let Some(ref comment) = key.comment {
            sql.push_str(" COMMENT ");
            sql.push_str(&self.quote_literal(comment));
        }
        sql
    }

    fn drop_index(&self, table: &str, name: &str, _if_exists: bool) -> String {
        if name.eq_ignore_ascii_case("PRIMARY") {
            return format!("ALTER TABLE {} DROP PRIMARY KEY", self.quote_identifier(table));
        }
        format!(
            "ALTER TABLE {} DROP INDEX {}",
            self.quote_identifier(table),
            self.quote_identifier(name)
        )
    }

    fn drop_constraint(
        &self,
        table: &str,
        name: &str,
        _if_exists: bool,
        _behavior: DropBehavior,
    ) -> String {
        format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            self.quote_identifier(table),
            self.quote_identifier(name)
        )
    }

    fn comment_on(&self, target: CommentTarget<'_>, text: Option<&str>) -> Option<String> {
        match target {
            CommentTarget::Table(table) => Some(format!(
                "ALTER TABLE {} COMMENT = {}",
                self.quote_identifier(table),
                self.quote_literal(text.unwrap_or_default())
            )),
            CommentTarget::Column { table, column } => {
                let column = ColumnClause {
                    comment: text.map(ToString::to_string),
                    ..column.clone()
                };
                Some(self.modify_column(table, &column))
            }
            CommentTarget::Index { .. } => None,
        }
    }

    fn describe_columns(&self, table: &str) -> String {
        format!(
            r#"SELECT
    COLUMN_NAME AS column_name,
    COLUMN_TYPE AS column_type,
    IS_NULLABLE AS is_nullable,
    COLUMN_DEFAULT AS column_default,
    COLUMN_COMMENT AS column_comment,
    EXTRA AS extra,
    IF(VERSION() LIKE '%MariaDB%', 1, 0) AS quoted_defaults
FROM information_schema.COLUMNS
WHERE TABLE_SCHEMA = DATABASE()
    AND TABLE_NAME = {table}
ORDER BY ORDINAL_POSITION"#,
            table = self.quote_literal(table),
        )
    }

    fn list_indexes(&self, table: &str) -> String {
        format!(
            r#"SELECT
    INDEX_NAME AS index_name,
    COLUMN_NAME AS column_name,
    IF(NON_UNIQUE = 0, 1, 0) AS is_unique,
    IF(INDEX_NAME = 'PRIMARY', 1, 0) AS is_primary,
    INDEX_COMMENT AS index_comment
FROM information_schema.STATISTICS
WHERE TABLE_SCHEMA = DATABASE()
    AND TABLE_NAME = {table}
ORDER BY INDEX_NAME, SEQ_IN_INDEX"#,
            table = self.quote_literal(table),
        )
    }
}

/// Decodes `COLUMN_DEFAULT`.
///
/// MariaDB (`quoted` set) reports string defaults quoted and a missing
/// default as the text `NULL`. MySQL reports string defaults verbatim and a
/// missing default as SQL NULL, so there the text `NULL` is a real default.
fn catalog_default(raw: Option<&str>, quoted: bool) -> Option<String> {
    let raw = raw?;
    if !quoted {
        return Some(raw.to_string());
    }
    if raw.eq_ignore_ascii_case("NULL") {
        return None;
    }
    match raw.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')) {
        Some(inner) => Some(inner.replace("''", "'")),
        None => Some(raw.to_string()),
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn normalize_type(&self, native: &str) -> String {
        let lowered = native.trim().to_ascii_lowercase();
        // tinyint(1) is how booleans are spelled
        if lowered.starts_with("tinyint(1)") {
            return lowered;
        }
        DISPLAY_WIDTH_RE.replace(&lowered, "$1").into_owned()
    }

    fn column_detail(&self, row: &CatalogRow) -> Result<ColumnDetail, CatalogError> {
        Ok(ColumnDetail {
            name: row.require("column_name")?.to_string(),
            native_type: self.normalize_type(row.require("column_type")?),
            nullable: row.flag("is_nullable"),
            default: catalog_default(row.get("column_default"), row.flag("quoted_defaults")),
            comment: row.non_empty("column_comment"),
            key: KeyRole::None,
            auto_increment: row
                .get("extra")
                .is_some_and(|e| e.to_ascii_lowercase().contains("auto_increment")),
        })
    }

    fn index_column(&self, row: &CatalogRow) -> Result<IndexColumn, CatalogError> {
        Ok(IndexColumn {
            index: row.require("index_name")?.to_string(),
            column: row.require("column_name")?.to_string(),
            unique: row.flag("is_unique"),
            primary: row.flag("is_primary"),
            comment: row.non_empty("index_comment"),
        })
    }
}
