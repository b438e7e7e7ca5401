//! sqlx-backed [`Connection`](crate::connection::Connection) adapters.
//!
//! Catalog cells are decoded to text by trying the common wire types in
//! turn, since catalog columns differ in type across servers and versions.

mod mysql;
mod postgres;

pub use mysql::MysqlConnection;
pub use postgres::PostgresConnection;
