//! oxide-schema CLI
//!
//! Command-line tool for inspecting and altering tables.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_schema::prelude::*;

/// Inspect and alter PostgreSQL and MySQL tables.
#[derive(Parser)]
#[command(name = "oxide-schema")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL.
    #[arg(short, long, env = "DATABASE_URL")]
    database_url: String,

    /// SQL dialect (guessed from the URL scheme if omitted).
    #[arg(long, value_enum)]
    dialect: Option<DialectKind>,

    /// PostgreSQL schema to operate in (the connection's current schema if
    /// omitted).
    #[arg(long)]
    schema: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DialectKind {
    Postgres,
    Mysql,
}

impl DialectKind {
    fn from_url(url: &str) -> Self {
        if url.starts_with("mysql:") || url.starts_with("mariadb:") {
            Self::Mysql
        } else {
            Self::Postgres
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the table's columns as JSON.
    Columns {
        /// Table name.
        table: String,
    },

    /// Print the table's indexes as JSON.
    Indexes {
        /// Table name.
        table: String,
    },

    /// Print the sequences owned by the table as JSON.
    Sequences {
        /// Table name.
        table: String,
    },

    /// Rename a table.
    Rename {
        /// Current table name.
        table: String,

        /// New table name.
        new_name: String,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },

    /// Drop an index or constraint.
    DropIndex {
        /// Table name.
        table: String,

        /// Index or constraint name.
        name: String,

        /// Drop a constraint instead of a plain index.
        #[arg(long)]
        constraint: bool,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run<D, C>(dialect: D, connection: C, command: Commands) -> anyhow::Result<()>
where
    D: Dialect,
    C: Connection,
{
    match command {
        Commands::Columns { table } => {
            let mut table = Table::new(table, dialect, connection);
            print_json(&table.columns().await?)?;
        }

        Commands::Indexes { table } => {
            let mut table = Table::new(table, dialect, connection);
            print_json(&table.indexes().await?)?;
        }

        Commands::Sequences { table } => {
            let table = Table::new(table, dialect, connection);
            print_json(&table.sequences().await?)?;
        }

        Commands::Rename {
            table,
            new_name,
            dry_run,
        } => {
            let mut table = Table::new(table, dialect, connection);
            if dry_run {
                for sql in table.plan_rename(&new_name) {
                    println!("{sql};");
                }
            } else {
                table.rename(&new_name).await?;
                info!("Table renamed to {}", table.name());
            }
        }

        Commands::DropIndex {
            table,
            name,
            constraint,
            dry_run,
        } => {
            let mut table = Table::new(table, dialect, connection);
            if dry_run {
                for sql in table.plan_drop_index(&name, constraint) {
                    println!("{sql};");
                }
            } else {
                table.drop_index(&name, constraint).await?;
                info!("Dropped {name} on {}", table.name());
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let kind = cli
        .dialect
        .unwrap_or_else(|| DialectKind::from_url(&cli.database_url));

    match kind {
        DialectKind::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(1)
                .connect(&cli.database_url)
                .await?;
            match cli.schema {
                Some(schema) => {
                    let connection = PostgresConnection::new(pool).schema(&schema);
                    run(PostgresDialect::with_schema(schema), connection, cli.command).await
                }
                None => run(PostgresDialect::new(), PostgresConnection::new(pool), cli.command).await,
            }
        }
        DialectKind::Mysql => {
            let pool = MySqlPoolOptions::new()
                .max_connections(1)
                .connect(&cli.database_url)
                .await?;
            run(MysqlDialect::new(), MysqlConnection::new(pool), cli.command).await
        }
    }
}
