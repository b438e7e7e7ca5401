mod common;

use common::{pg_column, pg_index, script_users, MockConnection, COLUMNS_QUERY, INDEXES_QUERY};
use oxide_schema::error::Error;
use oxide_schema::prelude::*;
use oxide_schema_core::CatalogRow;

fn users_schema() -> Schema {
    Schema::new()
        .column(integer("id").auto_increment().primary())
        .column(varchar("name", 120).not_null())
        .column(text("bio").comment("About"))
        .key(Key::unique("idx_name", ["name"]))
}

#[tokio::test]
async fn create_emits_statements_in_order() {
    let conn = MockConnection::new();
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    table
        .create(&users_schema(), &TableOptions::default())
        .await
        .unwrap();

    let executed = conn.executed();
    // the serial column creates its own sequence, seeded at 1
    assert_eq!(executed.len(), 3);

    let create = &executed[0];
    assert!(create.starts_with("CREATE TABLE IF NOT EXISTS \"users\" ("));
    let column_clauses: Vec<&str> = create
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with('"'))
        .collect();
    assert_eq!(
        column_clauses,
        vec![
            "\"id\" serial NOT NULL,",
            "\"name\" varchar(120) NOT NULL,",
            "\"bio\" text,"
        ]
    );
    assert_eq!(create.matches("PRIMARY KEY").count(), 1);
    assert!(create.contains("PRIMARY KEY (\"id\")"));

    assert_eq!(executed[1], "COMMENT ON COLUMN \"users\".\"bio\" IS 'About'");
    assert_eq!(
        executed[2],
        "CREATE UNIQUE INDEX \"idx_name\" ON \"users\" (\"name\")"
    );
}

#[tokio::test]
async fn create_seeds_the_backing_sequence_after_comments() {
    let conn = MockConnection::new();
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    table
        .create(
            &users_schema(),
            &TableOptions::default().auto_increment_seed(1000),
        )
        .await
        .unwrap();

    let executed = conn.executed();
    assert_eq!(executed.len(), 4);
    assert_eq!(executed[1], "COMMENT ON COLUMN \"users\".\"bio\" IS 'About'");
    assert_eq!(
        executed[2],
        "SELECT setval('\"users_id_seq\"', 1000, false) WHERE NOT EXISTS (SELECT 1 FROM \"users\")"
    );
    assert!(executed[3].starts_with("CREATE UNIQUE INDEX"));
}

#[tokio::test]
async fn create_on_existing_table_leaves_its_sequence_alone() {
    let conn = MockConnection::new().with_table("users");
    let mut table = Table::new("users", PostgresDialect::new(), &conn);
    let schema = Schema::new()
        .column(integer("id").auto_increment().primary())
        .column(text("bio"));

    table.create(&schema, &TableOptions::default()).await.unwrap();

    let executed = conn.executed();
    assert_eq!(executed.len(), 1);
    assert!(executed[0].starts_with("CREATE TABLE IF NOT EXISTS"));
    assert!(!executed
        .iter()
        .any(|sql| sql.contains("SEQUENCE") || sql.contains("setval")));

    // a custom seed only applies while the table is empty
    conn.clear();
    table
        .create(&schema, &TableOptions::default().auto_increment_seed(10))
        .await
        .unwrap();
    let executed = conn.executed();
    assert_eq!(executed.len(), 2);
    assert!(executed[1].ends_with("WHERE NOT EXISTS (SELECT 1 FROM \"users\")"));
}

#[tokio::test]
async fn create_comments_the_table() {
    let conn = MockConnection::new();
    let mut table = Table::new("audit", PostgresDialect::new(), &conn);
    let schema = Schema::new().column(text("line").comment("Raw line"));

    table
        .create(&schema, &TableOptions::default().comment("Audit log"))
        .await
        .unwrap();

    assert_eq!(
        &conn.executed()[1..],
        &[
            "COMMENT ON TABLE \"audit\" IS 'Audit log'".to_string(),
            "COMMENT ON COLUMN \"audit\".\"line\" IS 'Raw line'".to_string(),
        ]
    );
}

#[tokio::test]
async fn explicit_schema_is_used_by_every_statement() {
    let conn = MockConnection::new();
    script_users(&conn);
    let mut table = Table::new("users", PostgresDialect::with_schema("app"), &conn);

    table.drop_index("idx_name", false).await.unwrap();
    table
        .create(
            &users_schema(),
            &TableOptions::default().auto_increment_seed(5),
        )
        .await
        .unwrap();
    let renamed = table.plan_rename("people");

    let executed = conn.executed();
    assert_eq!(executed[0], "DROP INDEX IF EXISTS \"app\".\"idx_name\"");
    assert!(executed[1].starts_with("CREATE TABLE IF NOT EXISTS \"app\".\"users\" ("));
    assert_eq!(executed[2], "COMMENT ON COLUMN \"app\".\"users\".\"bio\" IS 'About'");
    assert!(executed[3].contains("setval('\"app\".\"users_id_seq\"', 5, false)"));
    assert_eq!(
        executed[4],
        "CREATE UNIQUE INDEX \"idx_name\" ON \"app\".\"users\" (\"name\")"
    );
    assert_eq!(
        renamed,
        vec!["ALTER TABLE \"app\".\"users\" RENAME TO \"people\"".to_string()]
    );

    let catalog: Vec<String> = conn
        .queries()
        .into_iter()
        .filter(|q| q.contains("pg_namespace"))
        .collect();
    assert!(!catalog.is_empty());
    assert!(catalog.iter().all(|q| q.contains("n.nspname = 'app'")));
}

#[tokio::test]
async fn create_comments_indexes_only_when_given() {
    let conn = MockConnection::new();
    let mut table = Table::new("users", PostgresDialect::new(), &conn);
    let schema = Schema::new()
        .column(integer("id").primary())
        .column(integer("age"))
        .key(Key::index("idx_age", ["age"]).comment("by age"));

    table
        .create(&schema, &TableOptions::default().auto_increment_seed(50))
        .await
        .unwrap();

    let executed = conn.executed();
    // no auto-increment column, so no sequence statement
    assert_eq!(
        &executed[1..],
        &[
            "CREATE INDEX \"idx_age\" ON \"users\" (\"age\")".to_string(),
            "COMMENT ON INDEX \"idx_age\" IS 'by age'".to_string(),
        ]
    );
}

#[tokio::test]
async fn create_on_mysql_is_a_single_statement() {
    let conn = MockConnection::new();
    let mut table = Table::new("users", MysqlDialect::new(), &conn);

    table
        .create(&users_schema(), &TableOptions::default().engine("InnoDB"))
        .await
        .unwrap();

    let executed = conn.executed();
    assert_eq!(executed.len(), 1);
    assert!(executed[0].contains("`bio` text COMMENT 'About'"));
    assert!(executed[0].contains("UNIQUE KEY `idx_name` (`name`)"));
    assert!(executed[0].ends_with(") ENGINE=InnoDB AUTO_INCREMENT=1"));
}

#[tokio::test]
async fn invalid_schema_never_touches_the_connection() {
    let conn = MockConnection::new();
    let mut table = Table::new("users", PostgresDialect::new(), &conn);
    let schema = users_schema().key(Key::index("idx_email", ["email"]));

    let err = table
        .create(&schema, &TableOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(conn.executed().is_empty());
    assert!(conn.queries().is_empty());
}

#[tokio::test]
async fn plan_matches_what_runs() {
    let conn = MockConnection::new();
    let mut table = Table::new("users", PostgresDialect::new(), &conn);
    let options = TableOptions::default();

    let plan = table.plan_create(&users_schema(), &options).unwrap();
    table.create(&users_schema(), &options).await.unwrap();

    assert_eq!(plan, conn.executed());
}

#[tokio::test]
async fn dry_run_executes_nothing() {
    let conn = MockConnection::new();
    let mut table = Table::new("users", PostgresDialect::new(), &conn).dry_run(true);

    table
        .create(&users_schema(), &TableOptions::default())
        .await
        .unwrap();
    table.drop_column("bio").await.unwrap();

    assert!(conn.executed().is_empty());
}

#[tokio::test]
async fn add_column_with_comment() {
    let conn = MockConnection::new();
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    table
        .add_column(&timestamp("created_at").not_null().comment("Creation time"))
        .await
        .unwrap();

    assert_eq!(
        conn.executed(),
        vec![
            "ALTER TABLE \"users\" ADD COLUMN \"created_at\" timestamp NOT NULL",
            "COMMENT ON COLUMN \"users\".\"created_at\" IS 'Creation time'",
        ]
    );
}

#[tokio::test]
async fn add_index_twice_executes_once() {
    let conn = MockConnection::new();
    script_users(&conn);
    let mut table = Table::new("users", PostgresDialect::new(), &conn);
    let key = Key::index("idx_bio", ["bio"]);

    table.add_index(&key).await.unwrap();
    assert_eq!(
        conn.executed(),
        vec!["CREATE INDEX \"idx_bio\" ON \"users\" (\"bio\")"]
    );

    conn.on_query(
        INDEXES_QUERY,
        vec![
            pg_index("users_pkey", "id", true, true),
            pg_index("idx_name", "name", true, false),
            pg_index("idx_bio", "bio", false, false),
        ],
    );
    table.add_index(&key).await.unwrap();

    assert_eq!(conn.executed().len(), 1);
}

#[tokio::test]
async fn add_existing_index_is_a_no_op() {
    let conn = MockConnection::new();
    script_users(&conn);
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    table
        .add_index(&Key::unique("idx_name", ["name"]))
        .await
        .unwrap();

    assert!(conn.executed().is_empty());
}

#[tokio::test]
async fn add_primary_key_is_skipped_when_one_exists() {
    let conn = MockConnection::new();
    script_users(&conn);
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    // the catalog reports the key as users_pkey, not by the key's own name
    table.add_index(&Key::primary(["id"])).await.unwrap();

    assert!(conn.executed().is_empty());
}

#[tokio::test]
async fn add_primary_key_runs_when_none_exists() {
    let conn = MockConnection::new();
    conn.on_query(
        COLUMNS_QUERY,
        vec![pg_column("id", "integer", false, None)],
    );
    conn.on_query(
        INDEXES_QUERY,
        vec![pg_index("idx_id", "id", false, false)],
    );
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    table.add_index(&Key::primary(["id"])).await.unwrap();

    assert_eq!(
        conn.executed(),
        vec!["ALTER TABLE \"users\" ADD PRIMARY KEY (\"id\")"]
    );
}

#[tokio::test]
async fn add_index_validates_columns() {
    let conn = MockConnection::new();
    script_users(&conn);
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    let err = table
        .add_index(&Key::index("idx_empty", Vec::<String>::new()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Schema(SchemaError::EmptyIndexColumns(ref name)) if name == "idx_empty"
    ));
    assert!(conn.queries().is_empty());

    let err = table
        .add_index(&Key::index("idx_email", ["email"]))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(conn.executed().is_empty());
}

#[tokio::test]
async fn change_column_renders_fixed_order() {
    let conn = MockConnection::new();
    script_users(&conn);
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    let age = integer("age").not_null().default(0_i64).comment("Years");
    table.change_column("bio", &age).await.unwrap();

    assert_eq!(
        conn.executed(),
        vec![
            "ALTER TABLE \"users\" ALTER COLUMN \"bio\" TYPE integer USING trim(\"bio\")::integer",
            "ALTER TABLE \"users\" ALTER COLUMN \"bio\" SET NOT NULL",
            "ALTER TABLE \"users\" ALTER COLUMN \"bio\" SET DEFAULT 0",
            "COMMENT ON COLUMN \"users\".\"bio\" IS 'Years'",
            "ALTER TABLE \"users\" RENAME COLUMN \"bio\" TO \"age\"",
        ]
    );
}

#[tokio::test]
async fn modify_column_without_default_skips_default() {
    let conn = MockConnection::new();
    script_users(&conn);
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    table.modify_column(&bigint("id").not_null()).await.unwrap();

    // integer -> bigint needs no cast
    assert_eq!(
        conn.executed(),
        vec![
            "ALTER TABLE \"users\" ALTER COLUMN \"id\" TYPE bigint",
            "ALTER TABLE \"users\" ALTER COLUMN \"id\" SET NOT NULL",
            "COMMENT ON COLUMN \"users\".\"id\" IS NULL",
        ]
    );
}

#[tokio::test]
async fn text_to_numeric_casts_after_type_normalization() {
    let conn = MockConnection::new();
    script_users(&conn);
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    // "name" is reported as "character varying(120)"
    let plan = table
        .plan_modify_column(&decimal("name", 12, 2))
        .await
        .unwrap();

    assert_eq!(
        plan[0],
        "ALTER TABLE \"users\" ALTER COLUMN \"name\" TYPE numeric(12,2) USING trim(\"name\")::numeric(12,2)"
    );
}

#[tokio::test]
async fn numeric_to_text_has_no_cast() {
    let conn = MockConnection::new();
    script_users(&conn);
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    let plan = table.plan_modify_column(&text("id")).await.unwrap();

    assert_eq!(plan[0], "ALTER TABLE \"users\" ALTER COLUMN \"id\" TYPE text");
}

#[tokio::test]
async fn modify_missing_column_fails() {
    let conn = MockConnection::new();
    script_users(&conn);
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    let err = table.modify_column(&text("missing")).await.unwrap_err();

    assert!(matches!(err, Error::ColumnNotFound { ref column, .. } if column == "missing"));
    assert!(conn.executed().is_empty());
}

#[tokio::test]
async fn modify_on_mysql_restates_the_column() {
    let conn = MockConnection::new();
    conn.on_query(
        COLUMNS_QUERY,
        vec![CatalogRow::new()
            .with("column_name", "bio")
            .with("column_type", "text")
            .with("is_nullable", "YES")
            .with_null("column_default")
            .with("column_comment", "About")
            .with("extra", "")],
    );
    let mut table = Table::new("users", MysqlDialect::new(), &conn);

    table
        .modify_column(&integer("bio").not_null().comment("About"))
        .await
        .unwrap();

    let modify = "ALTER TABLE `users` MODIFY COLUMN `bio` int(11) NOT NULL COMMENT 'About'";
    assert_eq!(conn.executed(), vec![modify, modify]);
}

#[tokio::test]
async fn drop_missing_index_is_a_no_op() {
    let conn = MockConnection::new();
    script_users(&conn);
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    table.drop_index("idx_missing", false).await.unwrap();

    assert!(conn.executed().is_empty());
}

#[tokio::test]
async fn drop_constraint_is_never_prechecked() {
    let conn = MockConnection::new();
    script_users(&conn);
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    table.drop_index("users_name_key", true).await.unwrap();

    assert!(conn.queries().is_empty());
    assert_eq!(
        conn.executed(),
        vec!["ALTER TABLE \"users\" DROP CONSTRAINT IF EXISTS \"users_name_key\" RESTRICT"]
    );
}

#[tokio::test]
async fn drop_existing_index() {
    let conn = MockConnection::new();
    script_users(&conn);
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    table.drop_index("idx_name", false).await.unwrap();

    assert_eq!(conn.executed(), vec!["DROP INDEX IF EXISTS \"idx_name\""]);
}

#[tokio::test]
async fn rename_rebinds_to_the_new_name() {
    let conn = MockConnection::new();
    script_users(&conn);
    let mut table = Table::new("users", PostgresDialect::new(), &conn);
    table.columns().await.unwrap();
    assert!(table.is_cached());

    table.rename("people").await.unwrap();

    assert_eq!(table.name(), "people");
    assert!(!table.is_cached());
    assert_eq!(
        conn.executed(),
        vec!["ALTER TABLE \"users\" RENAME TO \"people\""]
    );
}

#[tokio::test]
async fn failed_rename_keeps_the_manager_usable() {
    let conn = MockConnection::new();
    conn.fail_on("RENAME TO");
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    let err = table.rename("people").await.unwrap_err();
    assert!(matches!(err, Error::Batch { index: 0, .. }));
    assert_eq!(table.name(), "users");

    conn.recover();
    table.rename("people").await.unwrap();
    assert_eq!(table.name(), "people");
    assert_eq!(
        conn.executed(),
        vec!["ALTER TABLE \"users\" RENAME TO \"people\""]
    );
}

#[tokio::test]
async fn cache_fills_once_and_resets_after_writes() {
    let conn = MockConnection::new();
    script_users(&conn);
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    assert!(table.has_column("bio").await.unwrap());
    assert!(table.has_index("idx_name").await.unwrap());
    table.columns().await.unwrap();
    assert_eq!(conn.queries().len(), 2);

    table.add_column(&text("notes")).await.unwrap();
    assert!(!table.is_cached());

    table.indexes().await.unwrap();
    assert_eq!(conn.queries().len(), 4);
}

#[tokio::test]
async fn failed_batch_reports_index_and_resets_cache() {
    let conn = MockConnection::new();
    script_users(&conn);
    conn.fail_on("COMMENT ON");
    let mut table = Table::new("users", PostgresDialect::new(), &conn);
    table.columns().await.unwrap();

    let err = table
        .add_column(&text("notes").comment("Free text"))
        .await
        .unwrap_err();

    match err {
        Error::Batch {
            index, statement, ..
        } => {
            assert_eq!(index, 1);
            assert!(statement.starts_with("COMMENT ON COLUMN"));
        }
        other => panic!("unexpected error: {other}"),
    }
    // the ADD COLUMN before the failure stays applied
    assert_eq!(conn.executed().len(), 1);
    assert!(!table.is_cached());
}

#[tokio::test]
async fn column_lookup() {
    let conn = MockConnection::new();
    conn.on_query(
        COLUMNS_QUERY,
        vec![pg_column("id", "integer", false, None)],
    );
    let mut table = Table::new("users", PostgresDialect::new(), &conn);

    assert_eq!(table.column("id").await.unwrap().native_type, "integer");
    assert!(matches!(
        table.column("nope").await,
        Err(Error::ColumnNotFound { .. })
    ));
}

#[tokio::test]
async fn exists_checks_table_names() {
    let conn = MockConnection::new().with_table("users");

    let users = Table::new("users", PostgresDialect::new(), &conn);
    let ghosts = Table::new("ghosts", PostgresDialect::new(), &conn);

    assert!(users.exists().await.unwrap());
    assert!(!ghosts.exists().await.unwrap());
}
