//! Fixture loading against an in-memory SQLite database.

mod helpers;

use helpers::database::{TestDatabase, data_path, database, initial_items};
use rstest::rstest;
use std::sync::Arc;
use tabula_db::backends::{Dialect, SqliteBackend};
use tabula_fixtures::prelude::*;

/// Test loading each supported format into an empty table
///
/// **Test Category**: Happy path
#[rstest]
#[case("item.csv")]
#[case("item.tsv")]
#[case("item.json")]
#[case("item.yaml")]
#[case("item.yml")]
#[tokio::test]
async fn test_load_each_format(#[future] database: TestDatabase, #[case] file: &str) {
	// Arrange
	let db = database.await;

	// Act
	let result = db
		.loader()
		.load_file(data_path(file), &LoadOverrides::new())
		.await
		.unwrap();

	// Assert
	assert_eq!(result.table, "item");
	assert_eq!(result.rows_loaded, 2);
	assert_eq!(db.items().await, initial_items());
}

/// Test that reloading with delete leaves the same rows
///
/// **Test Category**: Idempotence
#[rstest]
#[tokio::test]
async fn test_delete_makes_reload_idempotent(#[future] database: TestDatabase) {
	let db = database.await;
	let loader = db.loader();
	let overrides = LoadOverrides::new().delete(true);

	loader
		.load_file(data_path("item.csv"), &overrides)
		.await
		.unwrap();
	let second = loader
		.load_file(data_path("item.csv"), &overrides)
		.await
		.unwrap();

	assert!(second.rows_deleted.is_some());
	assert_eq!(db.items().await, initial_items());
}

/// Test that a baseline read from TOML applies to every call
///
/// **Test Category**: Configuration
#[rstest]
#[tokio::test]
async fn test_toml_baseline_delete(#[future] database: TestDatabase) {
	let db = database.await;
	let options = LoaderOptions::from_toml_str("[fixtures]\ndelete = true\n").unwrap();
	let loader = db.loader_with(options);

	for _ in 0..2 {
		loader
			.load_file(data_path("item.csv"), &LoadOverrides::new())
			.await
			.unwrap();
	}

	assert_eq!(db.item_count().await, 2);
}

/// Test that update mode overwrites names in place
///
/// **Test Category**: Conflict handling
#[rstest]
#[tokio::test]
async fn test_update_overwrites_existing_rows(#[future] database: TestDatabase) {
	// Arrange
	let db = database.await;
	let loader = db.loader();
	loader
		.load_file(data_path("item.csv"), &LoadOverrides::new())
		.await
		.unwrap();

	// Act
	loader
		.load_file(
			data_path("item_update.csv"),
			&LoadOverrides::new().table("item").update(true),
		)
		.await
		.unwrap();

	// Assert
	assert_eq!(
		db.items().await,
		vec![
			(1, "ExcaliburNew".to_string()),
			(2, "MasamuneNew".to_string())
		]
	);
}

/// Test that update mode with an explicit conflict target keeps the key
///
/// **Test Category**: Conflict handling
#[rstest]
#[tokio::test]
async fn test_update_with_conflict_columns(#[future] database: TestDatabase) {
	let db = database.await;
	let loader = db.loader();
	loader
		.load_file(data_path("item.csv"), &LoadOverrides::new())
		.await
		.unwrap();

	loader
		.load_file(
			data_path("item_update.csv"),
			&LoadOverrides::new()
				.table("item")
				.update(true)
				.conflict_columns(["id"])
				.bulk_insert(true),
		)
		.await
		.unwrap();

	assert_eq!(db.item_count().await, 2);
	assert_eq!(db.items().await[0].1, "ExcaliburNew");
}

/// Test that ignore mode keeps the original rows
///
/// **Test Category**: Conflict handling
#[rstest]
#[tokio::test]
async fn test_ignore_keeps_existing_rows(#[future] database: TestDatabase) {
	let db = database.await;
	let loader = db.loader();
	loader
		.load_file(data_path("item.csv"), &LoadOverrides::new())
		.await
		.unwrap();

	let result = loader
		.load_file(
			data_path("item_update.csv"),
			&LoadOverrides::new().table("item").ignore(true),
		)
		.await
		.unwrap();

	assert_eq!(result.rows_loaded, 2);
	assert_eq!(db.items().await, initial_items());
}

/// Test that a duplicate key rolls back rows inserted earlier in the call
///
/// **Test Category**: Error path
#[rstest]
#[case(false)]
#[case(true)]
#[tokio::test]
async fn test_duplicate_key_rolls_back_whole_load(
	#[future] database: TestDatabase,
	#[case] bulk_insert: bool,
) {
	// Arrange
	let db = database.await;
	let loader = db.loader();
	loader
		.load_file(data_path("item.csv"), &LoadOverrides::new())
		.await
		.unwrap();

	// Act
	let error = loader
		.load_file(
			data_path("item_duplicate.csv"),
			&LoadOverrides::new().table("item").bulk_insert(bulk_insert),
		)
		.await
		.unwrap_err();

	// Assert
	assert!(matches!(
		error,
		FixtureError::Insert {
			phase: InsertPhase::Insert,
			..
		}
	));
	assert_eq!(db.items().await, initial_items());
}

/// Test that a failed load restores rows removed by its delete
///
/// **Test Category**: Error path
#[rstest]
#[tokio::test]
async fn test_failed_load_keeps_deleted_rows(#[future] database: TestDatabase) {
	let db = database.await;
	let loader = db.loader();
	loader
		.load_file(data_path("item.csv"), &LoadOverrides::new())
		.await
		.unwrap();

	// Both rows share id 5; the insert fails after the delete has run
	let data = TableData::from_rows(
		["id", "name"],
		vec![vec!["5", "Muramasa"], vec!["5", "Kusanagi"]],
	)
	.unwrap();
	let error = loader
		.load_data(&data, &LoadOverrides::new().table("item").delete(true))
		.await
		.unwrap_err();

	assert!(matches!(error, FixtureError::Insert { .. }));
	assert_eq!(db.items().await, initial_items());
}

/// Test bulk batching of 2500 rows with the default batch size
///
/// **Test Category**: Batching
#[rstest]
#[tokio::test]
async fn test_bulk_insert_batches(#[future] database: TestDatabase) {
	// Arrange
	let db = database.await;
	let rows = (1..=2500).map(|i| vec![i.to_string(), format!("Item {i}")]);
	let data = TableData::from_rows(["id", "name"], rows).unwrap();

	// Act
	let result = db
		.loader()
		.load_data(&data, &LoadOverrides::new().table("item").bulk_insert(true))
		.await
		.unwrap();

	// Assert
	assert_eq!(result.statements_executed, 2);
	assert_eq!(result.rows_loaded, 2500);
	assert_eq!(db.item_count().await, 2500);
}

/// Test that a wide table is split below SQLite's variable limit
///
/// **Test Category**: Batching
#[rstest]
#[tokio::test]
async fn test_bulk_insert_wide_table(#[future] database: TestDatabase) {
	// Arrange
	let db = database.await;
	let columns: Vec<String> = (0..20).map(|c| format!("c{c}")).collect();
	let ddl = format!(
		"CREATE TABLE wide ({})",
		columns
			.iter()
			.map(|c| format!("{c} TEXT"))
			.collect::<Vec<_>>()
			.join(", ")
	);
	sqlx::query(&ddl).execute(&db.pool).await.unwrap();
	let rows = (0..2000).map(|r| (0..20).map(move |c| format!("{r}-{c}")).collect::<Vec<_>>());
	let data = TableData::from_rows(columns, rows).unwrap();

	// Act
	let result = db
		.loader()
		.load_data(&data, &LoadOverrides::new().table("wide").bulk_insert(true))
		.await
		.unwrap();

	// Assert
	assert_eq!(result.rows_loaded, 2000);
	assert_eq!(result.statements_executed, 2);
	let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM wide")
		.fetch_one(&db.pool)
		.await
		.unwrap();
	assert_eq!(count, 2000);
}

/// Test that empty values fall back to the column default
///
/// **Test Category**: Default values
#[rstest]
#[case("item_auto_id.csv")]
#[case("item_nullable.json")]
#[tokio::test]
async fn test_empty_id_uses_autoincrement(#[future] database: TestDatabase, #[case] file: &str) {
	let db = database.await;
	let loader = db.loader();
	loader
		.load_file(data_path("item.csv"), &LoadOverrides::new())
		.await
		.unwrap();

	loader
		.load_file(
			data_path(file),
			&LoadOverrides::new().table("item").bulk_insert(true),
		)
		.await
		.unwrap();

	assert_eq!(
		db.items().await,
		vec![
			(1, "Excalibur".to_string()),
			(2, "Masamune".to_string()),
			(3, "Muramasa".to_string()),
			(4, "Kusanagi".to_string()),
		]
	);
}

/// Test that a header-only CSV succeeds without touching the table
///
/// **Test Category**: Edge case
#[rstest]
#[tokio::test]
async fn test_header_only_csv_is_noop(#[future] database: TestDatabase) {
	let db = database.await;
	let loader = db.loader();
	loader
		.load_file(data_path("item.csv"), &LoadOverrides::new())
		.await
		.unwrap();

	let result = loader
		.load_file(data_path("item_empty.csv"), &LoadOverrides::new().table("item"))
		.await
		.unwrap();

	assert_eq!(result.rows_loaded, 0);
	assert_eq!(result.statements_executed, 0);
	assert_eq!(db.items().await, initial_items());
}

/// Test that an empty JSON array is rejected
///
/// **Test Category**: Error path
#[rstest]
#[tokio::test]
async fn test_empty_json_array_is_parse_error(#[future] database: TestDatabase) {
	let db = database.await;
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("item.json");
	std::fs::write(&path, "[]").unwrap();

	let error = db
		.loader()
		.load_file(&path, &LoadOverrides::new())
		.await
		.unwrap_err();

	assert!(error.is_parse());
	assert_eq!(db.item_count().await, 0);
}

/// Test that update and ignore together are rejected before any I/O
///
/// **Test Category**: Configuration
#[rstest]
#[tokio::test]
async fn test_update_and_ignore_are_exclusive(#[future] database: TestDatabase) {
	let db = database.await;

	let error = db
		.loader()
		.load_file(
			data_path("item.csv"),
			&LoadOverrides::new().update(true).ignore(true),
		)
		.await
		.unwrap_err();

	assert!(error.is_config());
	assert_eq!(db.item_count().await, 0);
}

/// Test that update is rejected on a driver without upsert support
///
/// **Test Category**: Configuration
#[rstest]
#[tokio::test]
async fn test_update_without_upsert_capability(#[future] database: TestDatabase) {
	let db = database.await;
	let backend =
		SqliteBackend::new(db.pool.clone()).with_dialect(Dialect::sqlite().without_upsert());
	let loader = FixtureLoader::new(Arc::new(backend));

	let error = loader
		.load_file(data_path("item.csv"), &LoadOverrides::new().update(true))
		.await
		.unwrap_err();

	assert!(error.is_config());
}

/// Test that a missing file is reported as an I/O error
///
/// **Test Category**: Error path
#[rstest]
#[tokio::test]
async fn test_missing_file_is_io_error(#[future] database: TestDatabase) {
	let db = database.await;

	let error = db
		.loader()
		.load_file(data_path("missing.csv"), &LoadOverrides::new())
		.await
		.unwrap_err();

	assert!(matches!(error, FixtureError::Io { .. }));
}
