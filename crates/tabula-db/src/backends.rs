//! # Tabula Database Backends
//!
//! Low-level database boundary for the fixture loader.
//!
//! ## Supported Databases
//!
//! | Database | Feature Flag | Backend Type |
//! |----------|--------------|--------------|
//! | SQLite | `sqlite` | [`SqliteBackend`] |
//! | PostgreSQL | `postgres` | [`PostgresBackend`] |
//! | MySQL/MariaDB | `mysql` | [`MySqlBackend`] |
//!
//! ## Core Traits
//!
//! - **[`DatabaseBackend`]**: opens transactions and describes its [`Dialect`]
//! - **[`TransactionExecutor`]**: executes statements, commits, rolls back
//!
//! Statements are produced by [`InsertBuilder`] and [`DeleteBuilder`] and run
//! inside a [`TransactionScope`], which rolls back if it is dropped unfinished.

pub mod backend;
pub mod dialect;
pub mod error;
pub mod query_builder;
pub mod transaction;
pub mod types;

pub use backend::{DatabaseBackend, TransactionExecutor};
pub use error::{DatabaseError, Result};
pub use query_builder::{DeleteBuilder, InsertBuilder, OnConflictAction};
pub use transaction::TransactionScope;
pub use types::{DatabaseType, Dialect, InsertValue, QueryResult, Statement, UpsertSupport};

#[cfg(feature = "mysql")]
pub use dialect::mysql::{MySqlBackend, MySqlTransactionExecutor};
#[cfg(feature = "postgres")]
pub use dialect::postgres::{PostgresBackend, PostgresTransactionExecutor};
#[cfg(feature = "sqlite")]
pub use dialect::sqlite::{SqliteBackend, SqliteTransactionExecutor};
