//! Fixture loader.
//!
//! The public entry point. A load call resolves options, parses the fixture
//! when given a path, plans the statements and runs them in one transaction:
//!
//! ```text
//! BEGIN -> (DELETE) -> INSERT ... -> COMMIT
//!    \________ any failure ________-> ROLLBACK
//! ```
//!
//! Configuration, parse and statement build errors are reported before the
//! transaction is opened.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tabula_db::backends::{DatabaseBackend, Dialect, TransactionScope};

use super::{
	FixtureParser, InsertionEngine, LoadOptions, LoadOverrides, LoaderOptions, TableData, resolve,
};
use crate::error::{FixtureError, FixtureResult};

/// What to load: a fixture file or data built in code.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureSource {
	/// Fixture file; table and format are inferred from its name unless
	/// overridden.
	Path(PathBuf),
	/// Pre-parsed rows; the table must be given through the overrides.
	Data(TableData),
}

impl From<PathBuf> for FixtureSource {
	fn from(path: PathBuf) -> Self {
		Self::Path(path)
	}
}

impl From<&Path> for FixtureSource {
	fn from(path: &Path) -> Self {
		Self::Path(path.to_path_buf())
	}
}

impl From<TableData> for FixtureSource {
	fn from(data: TableData) -> Self {
		Self::Data(data)
	}
}

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResult {
	/// Target table.
	pub table: String,
	/// Fixture rows sent to the database. Rows skipped by ignore mode or
	/// merged by update mode are still counted.
	pub rows_loaded: usize,
	/// Statements executed, including the delete.
	pub statements_executed: usize,
	/// Rows reported removed by the delete phase, when it ran.
	pub rows_deleted: Option<u64>,
}

/// Loads fixtures into tables of one database.
///
/// The loader is cheap to clone and can be shared; every call works on its
/// own resolved options and its own transaction.
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use tabula_db::backends::SqliteBackend;
/// use tabula_fixtures::prelude::*;
///
/// let backend = Arc::new(SqliteBackend::connect("sqlite::memory:").await?);
/// let loader = FixtureLoader::new(backend);
///
/// loader.load_file("fixtures/item.csv", &LoadOverrides::new().delete(true)).await?;
/// ```
#[derive(Clone)]
pub struct FixtureLoader {
	backend: Arc<dyn DatabaseBackend>,
	dialect: Dialect,
	options: LoaderOptions,
	parser: FixtureParser,
}

impl FixtureLoader {
	/// Create a loader with the defaults of the backend's dialect.
	pub fn new(backend: Arc<dyn DatabaseBackend>) -> Self {
		let dialect = backend.dialect();
		let options = LoaderOptions::for_dialect(&dialect);
		Self::from_parts(backend, dialect, options)
	}

	/// Create a loader with an explicit baseline.
	pub fn with_options(backend: Arc<dyn DatabaseBackend>, options: LoaderOptions) -> Self {
		let dialect = backend.dialect();
		Self::from_parts(backend, dialect, options)
	}

	fn from_parts(
		backend: Arc<dyn DatabaseBackend>,
		dialect: Dialect,
		options: LoaderOptions,
	) -> Self {
		Self {
			backend,
			dialect,
			options,
			parser: FixtureParser::new(),
		}
	}

	pub fn options(&self) -> &LoaderOptions {
		&self.options
	}

	pub fn dialect(&self) -> &Dialect {
		&self.dialect
	}

	/// Load a fixture file or in-memory data.
	///
	/// # Errors
	///
	/// - [`FixtureError::Config`] for contradictory or unresolvable options
	/// - [`FixtureError::Io`] / [`FixtureError::Parse`] for unreadable or bad files
	/// - [`FixtureError::Transaction`] if the transaction cannot begin or commit
	/// - [`FixtureError::Insert`] if a statement fails; nothing is kept
	pub async fn load(
		&self,
		source: impl Into<FixtureSource>,
		overrides: &LoadOverrides,
	) -> FixtureResult<LoadResult> {
		match source.into() {
			FixtureSource::Path(path) => self.load_file(&path, overrides).await,
			FixtureSource::Data(data) => self.load_data(&data, overrides).await,
		}
	}

	/// Load a fixture file.
	pub async fn load_file(
		&self,
		path: impl AsRef<Path>,
		overrides: &LoadOverrides,
	) -> FixtureResult<LoadResult> {
		let path = path.as_ref();
		let options = resolve(&self.options, Some(path), overrides, &self.dialect)?;
		let format = options.format.ok_or_else(|| {
			FixtureError::Config(format!("cannot infer format from '{}'", path.display()))
		})?;

		tracing::debug!(
			path = %path.display(),
			table = %options.table,
			%format,
			"Parsing fixture"
		);
		let data = self.parser.parse_file(path, format)?;

		self.insert(&options, &data).await
	}

	/// Load rows built in code. `overrides.table` is required.
	pub async fn load_data(
		&self,
		data: &TableData,
		overrides: &LoadOverrides,
	) -> FixtureResult<LoadResult> {
		let options = resolve(&self.options, None, overrides, &self.dialect)?;
		self.insert(&options, data).await
	}

	async fn insert(&self, options: &LoadOptions, data: &TableData) -> FixtureResult<LoadResult> {
		let engine = InsertionEngine::new(&self.dialect, options);
		let plan = engine.plan(data)?;

		let mut tx = TransactionScope::begin(self.backend.as_ref())
			.await
			.map_err(|source| FixtureError::Transaction {
				context: "begin",
				source,
			})?;

		let summary = match engine.execute(&plan, &mut tx).await {
			Ok(summary) => summary,
			Err(error) => {
				if let Err(rollback_error) = tx.rollback().await {
					tracing::warn!(
						table = %options.table,
						error = %rollback_error,
						"Rollback after failed load also failed"
					);
				}
				return Err(error);
			}
		};

		tx.commit()
			.await
			.map_err(|source| FixtureError::Transaction {
				context: "commit",
				source,
			})?;

		tracing::info!(
			table = %options.table,
			rows = summary.rows_inserted,
			statements = summary.statements_executed,
			"Loaded fixture"
		);

		Ok(LoadResult {
			table: options.table.clone(),
			rows_loaded: summary.rows_inserted,
			statements_executed: summary.statements_executed,
			rows_deleted: summary.rows_deleted,
		})
	}
}

impl std::fmt::Debug for FixtureLoader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FixtureLoader")
			.field("dialect", &self.dialect)
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}
