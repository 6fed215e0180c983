//! In-memory SQLite database with an `item` table.

use std::path::PathBuf;
use std::sync::Arc;

use rstest::fixture;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tabula_db::backends::{DatabaseBackend, SqliteBackend};
use tabula_fixtures::{FixtureLoader, LoaderOptions};

/// Loader bound to a fresh database, plus a pool for reading it back.
pub struct TestDatabase {
	pub pool: SqlitePool,
	pub backend: Arc<dyn DatabaseBackend>,
}

impl TestDatabase {
	pub fn loader(&self) -> FixtureLoader {
		FixtureLoader::new(self.backend.clone())
	}

	pub fn loader_with(&self, options: LoaderOptions) -> FixtureLoader {
		FixtureLoader::with_options(self.backend.clone(), options)
	}

	/// All rows of `item` ordered by id.
	pub async fn items(&self) -> Vec<(i64, String)> {
		sqlx::query_as("SELECT id, name FROM item ORDER BY id")
			.fetch_all(&self.pool)
			.await
			.unwrap()
	}

	pub async fn item_count(&self) -> i64 {
		let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM item")
			.fetch_one(&self.pool)
			.await
			.unwrap();
		count
	}
}

/// Single-connection pool so the in-memory database outlives each load.
pub async fn sqlite_pool() -> SqlitePool {
	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.idle_timeout(None)
		.max_lifetime(None)
		.connect("sqlite::memory:")
		.await
		.unwrap();

	sqlx::query(
		"CREATE TABLE item (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			name TEXT NOT NULL
		)",
	)
	.execute(&pool)
	.await
	.unwrap();

	pool
}

#[fixture]
pub async fn database() -> TestDatabase {
	let pool = sqlite_pool().await;
	let backend: Arc<dyn DatabaseBackend> = Arc::new(SqliteBackend::new(pool.clone()));
	TestDatabase { pool, backend }
}

/// Path of a file under `tests/fixtures/data`.
pub fn data_path(name: &str) -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR"))
		.join("tests")
		.join("fixtures")
		.join("data")
		.join(name)
}

/// Expected content after loading `item.csv`.
pub fn initial_items() -> Vec<(i64, String)> {
	vec![(1, "Excalibur".to_string()), (2, "Masamune".to_string())]
}
