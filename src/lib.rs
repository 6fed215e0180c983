//! # Tabula
//!
//! Load CSV, TSV, JSON and YAML test fixtures into relational database tables.
//!
//! Tabula is a facade over two crates:
//!
//! - [`db`] (`tabula-db`): backend and transaction traits, dialect
//!   descriptors, statement building and sqlx backends
//! - [`fixtures`] (`tabula-fixtures`): fixture parsing, option resolution and
//!   the transactional loader
//!
//! ## Feature Flags
//!
//! - `db-sqlite` (default) - SQLite backend
//! - `db-postgres` - PostgreSQL backend
//! - `db-mysql` - MySQL backend
//! - `yaml` (default) - YAML fixture support
//! - `full` - All of the above
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tabula::prelude::*;
//!
//! #[tokio::test]
//! async fn seeds_items() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(SqliteBackend::connect("sqlite::memory:").await?);
//!     let loader = FixtureLoader::new(backend);
//!
//!     loader
//!         .load_file("tests/fixtures/item.csv", &LoadOverrides::new().delete(true))
//!         .await?;
//!     Ok(())
//! }
//! ```

pub use tabula_db as db;
pub use tabula_fixtures as fixtures;

pub use tabula_db::backends::{
	DatabaseBackend, DatabaseError, DatabaseType, Dialect, TransactionExecutor, TransactionScope,
};
pub use tabula_fixtures::{
	FixtureError, FixtureFormat, FixtureLoader, FixtureResult, FixtureSource, LoadOverrides,
	LoadResult, LoaderOptions, TableData,
};

#[cfg(feature = "db-mysql")]
pub use tabula_db::backends::MySqlBackend;
#[cfg(feature = "db-postgres")]
pub use tabula_db::backends::PostgresBackend;
#[cfg(feature = "db-sqlite")]
pub use tabula_db::backends::SqliteBackend;

/// Convenience re-exports for common usage.
pub mod prelude {
	pub use tabula_db::backends::{DatabaseBackend, Dialect};
	pub use tabula_fixtures::prelude::*;

	#[cfg(feature = "db-mysql")]
	pub use tabula_db::backends::MySqlBackend;
	#[cfg(feature = "db-postgres")]
	pub use tabula_db::backends::PostgresBackend;
	#[cfg(feature = "db-sqlite")]
	pub use tabula_db::backends::SqliteBackend;
}
