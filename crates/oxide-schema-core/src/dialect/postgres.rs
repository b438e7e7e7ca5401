//! PostgreSQL dialect.

use std::sync::LazyLock;

use regex::Regex;

use super::{ColumnClause, CommentTarget, Dialect, DropBehavior, QueryBuilder};
use crate::catalog::{CatalogError, CatalogRow, ColumnDetail, IndexColumn, KeyRole};
use crate::schema::{Key, TableOptions};
use crate::types::{sequence_name, AutoIncrement, CanonicalType, Length, TypeMapper, TypeMapping};

/// `NULL::character varying` and friends: a typed NULL default.
static TYPED_NULL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\(?NULL\)?::").expect("typed NULL pattern is valid"));

/// Verbose spellings reported by `format_type`, mapped to the short form.
/// Order matters: `character varying` must be rewritten before `character`.
const TYPE_SYNONYMS: &[(&str, &str)] = &[
    ("character varying", "varchar"),
    ("character", "char"),
    ("bit varying", "varbit"),
    ("timestamp without time zone", "timestamp"),
    ("timestamp with time zone", "timestamptz"),
    ("time without time zone", "time"),
    ("time with time zone", "timetz"),
    ("double precision", "double"),
];

/// PostgreSQL dialect.
///
/// Without a schema, statements are unqualified and resolve through
/// `search_path`, and catalog queries look at `current_schema()`. With one,
/// every table, index and sequence name is qualified with it.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect {
    schema: Option<String>,
}

impl PostgresDialect {
    /// Creates a dialect targeting the connection's current schema.
    #[must_use]
    pub const fn new() -> Self {
        Self { schema: None }
    }

    /// Creates a dialect targeting the given schema.
    #[must_use]
    pub fn with_schema(schema: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
        }
    }

    /// Returns the explicit schema, if any.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Quotes a relation name, qualified with the schema when one is set.
    fn qualify(&self, name: &str) -> String {
        match self.schema {
            Some(ref schema) => format!(
                "{}.{}",
                self.quote_identifier(schema),
                self.quote_identifier(name)
            ),
            None => self.quote_identifier(name),
        }
    }

    /// Catalog predicate value for `pg_namespace.nspname`.
    fn schema_filter(&self) -> String {
        self.schema
            .as_deref()
            .map_or_else(|| "current_schema()".to_string(), |s| self.quote_literal(s))
    }
}

impl TypeMapper for PostgresDialect {
    fn mapping(&self, ty: CanonicalType) -> TypeMapping {
        match ty {
            CanonicalType::Boolean => TypeMapping::bare("boolean"),
            CanonicalType::Tinyint | CanonicalType::Smallint => TypeMapping::bare("smallint"),
            CanonicalType::Integer => TypeMapping::bare("integer"),
            CanonicalType::Bigint => TypeMapping::bare("bigint"),
            CanonicalType::Float => TypeMapping::bare("real"),
            CanonicalType::Double => TypeMapping::bare("double precision"),
            CanonicalType::Decimal => {
                TypeMapping::sized("numeric", Some(Length::Precision(10, 2)))
            }
            CanonicalType::Char => TypeMapping::sized("char", Some(Length::Size(1))),
            CanonicalType::Varchar => TypeMapping::sized("varchar", Some(Length::Size(255))),
            CanonicalType::Text | CanonicalType::Longtext => TypeMapping::bare("text"),
            CanonicalType::Date => TypeMapping::bare("date"),
            CanonicalType::Time => TypeMapping::bare("time"),
            CanonicalType::Datetime | CanonicalType::Timestamp => TypeMapping::bare("timestamp"),
            CanonicalType::Blob => TypeMapping::bare("bytea"),
            CanonicalType::Json => TypeMapping::bare("jsonb"),
        }
    }

    fn auto_increment(&self, ty: CanonicalType) -> AutoIncrement {
        // Any auto-increment column becomes a serial type; the serial owns a
        // sequence named `{table}_{column}_seq`.
        let native = match ty {
            CanonicalType::Tinyint | CanonicalType::Smallint => "smallserial",
            CanonicalType::Bigint => "bigserial",
            _ => "serial",
        };
        AutoIncrement {
            native,
            backing_sequence: true,
        }
    }
}

impl QueryBuilder for PostgresDialect {
    fn quote_table(&self, name: &str) -> String {
        self.qualify(name)
    }

    fn column_definition(&self, column: &ColumnClause) -> String {
        let mut sql = format!(
            "{} {}",
            self.quote_identifier(&column.name),
            column.native_type
        );
        if !column.allow_null {
            sql.push_str(" NOT NULL");
        }
        // serial columns get their default from the sequence
        if let Some(default) = column.default.as_ref().filter(|_| !column.backing_sequence) {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.render_default(default));
        }
        sql
    }

    fn create_table(
        &self,
        name: &str,
        columns: &[ColumnClause],
        primary: &[String],
        _keys: &[Key],
        options: &TableOptions,
    ) -> String {
        let mut sql = String::from("CREATE TABLE ");
        if options.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&self.quote_table(name));
        sql.push_str(" (\n");

        let mut clauses: Vec<String> = columns
            .iter()
            .map(|c| format!("    {}", self.column_definition(c)))
            .collect();
        if !primary.is_empty() {
            clauses.push(format!("    PRIMARY KEY ({})", self.quote_list(primary)));
        }
        sql.push_str(&clauses.join(",\n"));
        sql.push_str("\n)");

        if let Some(ref parent) = options.inherits {
            sql.push_str(&format!(" INHERITS ({})", self.quote_table(parent)));
        }
        if let Some(ref tablespace) = options.tablespace {
            sql.push_str(&format!(" TABLESPACE {}", self.quote_identifier(tablespace)));
        }
        sql
    }

    fn alter_column_type(
        &self,
        table: &str,
        column: &ColumnClause,
        using: Option<&str>,
    ) -> String {
        let mut sql = format!(
            "ALTER TABLE {} ALTER COLUMN {} TYPE {}",
            self.quote_table(table),
            self.quote_identifier(&column.name),
            column.native_type
        );
        if let Some(using) = using {
            sql.push(' ');
            sql.push_str(using);
        }
        sql
    }

    fn alter_column_nullability(&self, table: &str, column: &ColumnClause) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} {} NOT NULL",
            self.quote_table(table),
            self.quote_identifier(&column.name),
            if column.allow_null { "DROP" } else { "SET" }
        )
    }

    fn drop_index(&self, _table: &str, name: &str, if_exists: bool) -> String {
        let mut sql = String::from("DROP INDEX ");
        if if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&self.qualify(name));
        sql
    }

    fn drop_constraint(
        &self,
        table: &str,
        name: &str,
        if_exists: bool,
        behavior: DropBehavior,
    ) -> String {
        let mut sql = format!("ALTER TABLE {} DROP CONSTRAINT ", self.quote_table(table));
        if if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&self.quote_identifier(name));
        sql.push(' ');
        sql.push_str(behavior.as_sql());
        sql
    }

    fn comment_on(&self, target: CommentTarget<'_>, text: Option<&str>) -> Option<String> {
        let object = match target {
            CommentTarget::Table(table) => format!("TABLE {}", self.quote_table(table)),
            CommentTarget::Column { table, column } => format!(
                "COLUMN {}.{}",
                self.quote_table(table),
                self.quote_identifier(&column.name)
            ),
            CommentTarget::Index { name, .. } => format!("INDEX {}", self.qualify(name)),
        };
        let text = text.map_or_else(|| "NULL".to_string(), |t| self.quote_literal(t));
        Some(format!("COMMENT ON {object} IS {text}"))
    }

    // serial sequences already start at 1; a table that holds rows keeps
    // its sequence position
    fn sequence_seed(&self, table: &str, column: &str, seed: u64) -> Option<String> {
        if seed <= 1 {
            return None;
        }
        Some(format!(
            "SELECT setval({}, {seed}, false) WHERE NOT EXISTS (SELECT 1 FROM {})",
            self.quote_literal(&self.qualify(&sequence_name(table, column))),
            self.quote_table(table)
        ))
    }

    fn text_to_numeric_cast(&self, column: &str, native_type: &str) -> Option<String> {
        Some(format!(
            "USING trim({})::{native_type}",
            self.quote_identifier(column)
        ))
    }

    fn describe_columns(&self, table: &str) -> String {
        format!(
            r#"SELECT
    a.attname AS column_name,
    pg_catalog.format_type(a.atttypid, a.atttypmod) AS column_type,
    CASE WHEN a.attnotnull THEN 'NO' ELSE 'YES' END AS is_nullable,
    pg_catalog.pg_get_expr(d.adbin, d.adrelid) AS column_default,
    pg_catalog.col_description(a.attrelid, a.attnum) AS column_comment
FROM pg_catalog.pg_attribute AS a
JOIN pg_catalog.pg_class AS c ON c.oid = a.attrelid
JOIN pg_catalog.pg_namespace AS n ON n.oid = c.relnamespace
LEFT JOIN pg_catalog.pg_attrdef AS d ON d.adrelid = a.attrelid AND d.adnum = a.attnum
WHERE c.relname = {table}
    AND n.nspname = {schema}
    AND a.attnum > 0
    AND NOT a.attisdropped
ORDER BY a.attnum"#,
            table = self.quote_literal(table),
            schema = self.schema_filter(),
        )
    }

    fn list_indexes(&self, table: &str) -> String {
        format!(
            r#"SELECT
    i.relname AS index_name,
    a.attname AS column_name,
    ix.indisunique AS is_unique,
    ix.indisprimary AS is_primary,
    pg_catalog.obj_description(i.oid, 'pg_class') AS index_comment
FROM pg_catalog.pg_index AS ix
JOIN pg_catalog.pg_class AS t ON t.oid = ix.indrelid
JOIN pg_catalog.pg_class AS i ON i.oid = ix.indexrelid
JOIN pg_catalog.pg_namespace AS n ON n.oid = t.relnamespace
JOIN pg_catalog.pg_attribute AS a ON a.attrelid = t.oid AND a.attnum = ANY(ix.indkey)
WHERE t.relkind = 'r'
    AND t.relname = {table}
    AND n.nspname = {schema}
ORDER BY i.relname, array_position(ix.indkey::int2[], a.attnum)"#,
            table = self.quote_literal(table),
            schema = self.schema_filter(),
        )
    }

    fn list_sequences(&self, table: &str, with_start_value: bool) -> Option<String> {
        let mut fields = vec![
            r#"s.relname AS "sequence""#,
            r#"n.nspname AS "schema""#,
            r#"t.relname AS "table""#,
            r#"a.attname AS "column""#,
            "info.data_type::text AS data_type",
            "info.minimum_value::text AS minimum_value",
            "info.maximum_value::text AS maximum_value",
            "info.increment::text AS increment",
            "info.cycle_option::text AS cycle_option",
        ];
        if with_start_value {
            fields.push("info.start_value::text AS start_value");
        }
        Some(format!(
            r#"SELECT
    {fields}
FROM pg_catalog.pg_class AS s
LEFT JOIN pg_catalog.pg_depend AS d ON d.objid = s.oid
    AND d.classid = 'pg_class'::regclass
    AND d.refclassid = 'pg_class'::regclass
LEFT JOIN pg_catalog.pg_class AS t ON t.oid = d.refobjid
LEFT JOIN pg_catalog.pg_namespace AS n ON n.oid = t.relnamespace
LEFT JOIN pg_catalog.pg_attribute AS a ON a.attrelid = t.oid AND a.attnum = d.refobjsubid
LEFT JOIN information_schema.sequences AS info ON info.sequence_name = s.relname
    AND info.sequence_schema = n.nspname
WHERE s.relkind = 'S'
    AND d.deptype = 'a'
    AND t.relname = {table}
    AND n.nspname = {schema}"#,
            fields = fields.join(",\n    "),
            table = self.quote_literal(table),
            schema = self.schema_filter(),
        ))
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn normalize_type(&self, native: &str) -> String {
        let mut normalized = native.trim().to_ascii_lowercase();
        for (verbose, short) in TYPE_SYNONYMS {
            if normalized.contains(verbose) {
                normalized = normalized.replace(verbose, short);
            }
        }
        normalized
    }

    fn column_detail(&self, row: &CatalogRow) -> Result<ColumnDetail, CatalogError> {
        let default = row
            .get("column_default")
            .filter(|d| !TYPED_NULL_RE.is_match(d))
            .map(ToString::to_string);
        let auto_increment = default.as_deref().is_some_and(|d| d.contains("nextval("));
        Ok(ColumnDetail {
            name: row.require("column_name")?.to_string(),
            native_type: self.normalize_type(row.require("column_type")?),
            nullable: row.flag("is_nullable"),
            default,
            comment: row.non_empty("column_comment"),
            key: KeyRole::None,
            auto_increment,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{integer, text, varchar, Column, DefaultValue, Key};

    fn clause(column: &Column) -> ColumnClause {
        ColumnClause::resolve(&PostgresDialect::new(), column)
    }

    #[test]
    fn every_canonical_type_resolves() {
        let dialect = PostgresDialect::new();
        for ty in CanonicalType::ALL {
            let (native, _) = dialect.resolve(ty);
            assert!(!native.is_empty(), "{ty} has no native type");
        }
    }

    #[test]
    fn no_length_types_drop_lengths() {
        let dialect = PostgresDialect::new();
        assert_eq!(
            dialect.render_type(CanonicalType::Integer, Some(Length::Size(11))),
            "integer"
        );
        assert_eq!(
            dialect.render_type(CanonicalType::Text, Some(Length::Size(500))),
            "text"
        );
        assert_eq!(dialect.render_type(CanonicalType::Varchar, None), "varchar(255)");
        assert_eq!(
            dialect.render_type(CanonicalType::Decimal, Some(Length::Precision(12, 4))),
            "numeric(12,4)"
        );
    }

    #[test]
    fn auto_increment_uses_serial() {
        let dialect = PostgresDialect::new();
        let ai = dialect.auto_increment(CanonicalType::Bigint);
        assert_eq!(ai.native, "bigserial");
        assert!(ai.backing_sequence);

        let id = clause(&integer("id").auto_increment().primary());
        assert_eq!(id.native_type, "serial");
        assert!(id.backing_sequence);
    }

    #[test]
    fn create_table_with_primary_key_and_inheritance() {
        let dialect = PostgresDialect::new();
        let columns = vec![
            clause(&integer("id").auto_increment().primary()),
            clause(&varchar("name", 120).not_null()),
            clause(&text("bio")),
        ];
        let options = TableOptions::default().inherits("base").tablespace("fast");
        let sql = dialect.create_table("users", &columns, &["id".to_string()], &[], &options);
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS \"users\" (\n    \"id\" serial NOT NULL,\n    \"name\" varchar(120) NOT NULL,\n    \"bio\" text,\n    PRIMARY KEY (\"id\")\n) INHERITS (\"base\") TABLESPACE \"fast\""
        );
    }

    #[test]
    fn create_table_without_primary_key() {
        let dialect = PostgresDialect::new();
        let sql = dialect.create_table(
            "logs",
            &[clause(&text("line"))],
            &[],
            &[],
            &TableOptions::default().if_not_exists(false),
        );
        assert_eq!(sql, "CREATE TABLE \"logs\" (\n    \"line\" text\n)");
    }

    #[test]
    fn defaults_are_escaped() {
        let dialect = PostgresDialect::new();
        let col = clause(&varchar("title", 50).default("it's"));
        assert_eq!(
            dialect.column_definition(&col),
            "\"title\" varchar(50) DEFAULT 'it''s'"
        );
        assert_eq!(
            dialect.alter_column_default("t", "flag", &DefaultValue::Boolean(true)),
            "ALTER TABLE \"t\" ALTER COLUMN \"flag\" SET DEFAULT TRUE"
        );
    }

    #[test]
    fn identifiers_are_escaped() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn alter_column_statements() {
        let dialect = PostgresDialect::new();
        let col = clause(&integer("age").not_null());
        assert_eq!(
            dialect.alter_column_type(
                "users",
                &col,
                dialect.text_to_numeric_cast("age", "integer").as_deref()
            ),
            "ALTER TABLE \"users\" ALTER COLUMN \"age\" TYPE integer USING trim(\"age\")::integer"
        );
        assert_eq!(
            dialect.alter_column_nullability("users", &col),
            "ALTER TABLE \"users\" ALTER COLUMN \"age\" SET NOT NULL"
        );
        assert_eq!(
            dialect.alter_column_nullability("users", &clause(&integer("age"))),
            "ALTER TABLE \"users\" ALTER COLUMN \"age\" DROP NOT NULL"
        );
        assert_eq!(
            dialect.rename_column("users", "age", "years"),
            "ALTER TABLE \"users\" RENAME COLUMN \"age\" TO \"years\""
        );
    }

    #[test]
    fn index_statements() {
        let dialect = PostgresDialect::new();
        assert_eq!(
            dialect.add_index("users", &Key::unique("idx_name", ["name"])),
            "CREATE UNIQUE INDEX \"idx_name\" ON \"users\" (\"name\")"
        );
        assert_eq!(
            dialect.drop_index("users", "idx_name", true),
            "DROP INDEX IF EXISTS \"idx_name\""
        );
        assert_eq!(
            dialect.drop_constraint("users", "users_name_key", true, DropBehavior::Restrict),
            "ALTER TABLE \"users\" DROP CONSTRAINT IF EXISTS \"users_name_key\" RESTRICT"
        );
    }

    #[test]
    fn comments() {
        let dialect = PostgresDialect::new();
        let bio = clause(&text("bio"));
        assert_eq!(
            dialect.comment_on(
                CommentTarget::Column {
                    table: "users",
                    column: &bio
                },
                Some("About")
            ),
            Some("COMMENT ON COLUMN \"users\".\"bio\" IS 'About'".to_string())
        );
        assert_eq!(
            dialect.comment_on(
                CommentTarget::Index {
                    table: "users",
                    name: "idx_name"
                },
                None
            ),
            Some("COMMENT ON INDEX \"idx_name\" IS NULL".to_string())
        );
        assert_eq!(
            dialect.comment_on(CommentTarget::Table("users"), Some("People")),
            Some("COMMENT ON TABLE \"users\" IS 'People'".to_string())
        );
    }

    #[test]
    fn sequence_seed_only_applies_to_empty_tables() {
        let dialect = PostgresDialect::new();
        assert_eq!(
            dialect.sequence_seed("users", "id", 1000),
            Some(
                "SELECT setval('\"users_id_seq\"', 1000, false) WHERE NOT EXISTS (SELECT 1 FROM \"users\")"
                    .to_string()
            )
        );
        assert_eq!(dialect.sequence_seed("users", "id", 1), None);
    }

    #[test]
    fn drop_constraint_cascade() {
        let dialect = PostgresDialect::new();
        assert_eq!(
            dialect.drop_constraint("orders", "orders_user_fk", false, DropBehavior::Cascade),
            "ALTER TABLE \"orders\" DROP CONSTRAINT \"orders_user_fk\" CASCADE"
        );
    }

    #[test]
    fn explicit_schema_qualifies_every_object() {
        let dialect = PostgresDialect::with_schema("app");
        let bio = clause(&text("bio"));
        assert_eq!(
            dialect.drop_index("users", "idx_name", true),
            "DROP INDEX IF EXISTS \"app\".\"idx_name\""
        );
        assert_eq!(
            dialect.rename_table("users", "people"),
            "ALTER TABLE \"app\".\"users\" RENAME TO \"people\""
        );
        assert_eq!(
            dialect.add_index("users", &Key::index("idx_bio", ["bio"])),
            "CREATE INDEX \"idx_bio\" ON \"app\".\"users\" (\"bio\")"
        );
        assert_eq!(
            dialect.alter_column_type("users", &bio, None),
            "ALTER TABLE \"app\".\"users\" ALTER COLUMN \"bio\" TYPE text"
        );
        assert_eq!(
            dialect.add_column("users", &bio),
            "ALTER TABLE \"app\".\"users\" ADD COLUMN \"bio\" text"
        );
        assert_eq!(
            dialect.comment_on(
                CommentTarget::Column {
                    table: "users",
                    column: &bio
                },
                None
            ),
            Some("COMMENT ON COLUMN \"app\".\"users\".\"bio\" IS NULL".to_string())
        );
        assert_eq!(
            dialect.sequence_seed("users", "id", 50),
            Some(
                "SELECT setval('\"app\".\"users_id_seq\"', 50, false) WHERE NOT EXISTS (SELECT 1 FROM \"app\".\"users\")"
                    .to_string()
            )
        );
        assert!(dialect
            .create_table("users", &[bio], &[], &[], &TableOptions::default())
            .starts_with("CREATE TABLE IF NOT EXISTS \"app\".\"users\" ("));
    }

    #[test]
    fn catalog_queries_follow_the_schema() {
        let current = PostgresDialect::new();
        assert!(current
            .list_indexes("users")
            .contains("n.nspname = current_schema()"));
        assert!(current
            .list_sequences("users", true)
            .unwrap()
            .contains("n.nspname = current_schema()"));

        let app = PostgresDialect::with_schema("app");
        assert!(app.describe_columns("users").contains("n.nspname = 'app'"));
        assert!(app.list_indexes("users").contains("n.nspname = 'app'"));
        assert!(app
            .list_sequences("users", false)
            .unwrap()
            .contains("AND n.nspname = 'app'"));
    }

    #[test]
    fn sequence_query_start_value_is_optional() {
        let dialect = PostgresDialect::new();
        let old = dialect.list_sequences("users", false).unwrap();
        let new = dialect.list_sequences("users", true).unwrap();
        assert!(!old.contains("start_value"));
        assert!(new.contains("info.start_value::text AS start_value"));
        assert!(new.contains("t.relname = 'users'"));
    }

    #[test]
    fn catalog_queries_quote_table_as_literal() {
        let dialect = PostgresDialect::new();
        assert!(dialect.describe_columns("o'brien").contains("c.relname = 'o''brien'"));
    }

    #[test]
    fn normalize_verbose_types() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.normalize_type("character varying(120)"), "varchar(120)");
        assert_eq!(dialect.normalize_type("character(2)"), "char(2)");
        assert_eq!(
            dialect.normalize_type("timestamp without time zone"),
            "timestamp"
        );
        assert_eq!(dialect.normalize_type("double precision"), "double");
        assert_eq!(dialect.normalize_type("integer"), "integer");
    }

    #[test]
    fn column_detail_from_catalog_row() {
        let dialect = PostgresDialect::new();
        let row = CatalogRow::new()
            .with("column_name", "id")
            .with("column_type", "integer")
            .with("is_nullable", "NO")
            .with("column_default", "nextval('users_id_seq'::regclass)")
            .with_null("column_comment");
        let detail = dialect.column_detail(&row).unwrap();
        assert!(detail.auto_increment);
        assert!(!detail.nullable);
        assert_eq!(detail.comment, None);

        let row = CatalogRow::new()
            .with("column_name", "name")
            .with("column_type", "character varying(120)")
            .with("is_nullable", "YES")
            .with("column_default", "NULL::character varying")
            .with("column_comment", "Display name");
        let detail = dialect.column_detail(&row).unwrap();
        assert_eq!(detail.native_type, "varchar(120)");
        assert_eq!(detail.default, None);
        assert!(!detail.auto_increment);
        assert_eq!(detail.comment.as_deref(), Some("Display name"));
    }

    #[test]
    fn index_column_from_catalog_row() {
        let dialect = PostgresDialect::new();
        let row = CatalogRow::new()
            .with("index_name", "users_pkey")
            .with("column_name", "id")
            .with("is_unique", "true")
            .with("is_primary", "true");
        let col = dialect.index_column(&row).unwrap();
        assert!(col.primary && col.unique);

        let missing = CatalogRow::new().with("index_name", "users_pkey");
        assert_eq!(
            dialect.index_column(&missing),
            Err(CatalogError::MissingField("column_name".to_string()))
        );
    }
}
