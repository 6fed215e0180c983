//! Loader configuration and per-call option resolution.
//!
//! A [`FixtureLoader`](super::FixtureLoader) holds an immutable
//! [`LoaderOptions`] baseline. Each load call supplies [`LoadOverrides`], and
//! [`resolve`] merges the two into a fresh [`LoadOptions`] value. Nothing is
//! written back to the baseline, so calls on a shared loader never observe
//! each other's overrides.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tabula_db::Dialect;

use super::FixtureFormat;
use crate::error::{FixtureError, FixtureResult};

/// Rows per multi-row `INSERT` when bulk mode is on.
pub const DEFAULT_BULK_BATCH_SIZE: usize = 2000;

/// Leading identifier-like run of a file name.
static TABLE_NAME_PATTERN: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^([_A-Za-z0-9]+)").expect("Invalid table name regex pattern"));

/// Baseline options of a loader.
///
/// Can be deserialized from TOML, either at the top level or under a
/// `[fixtures]` table:
///
/// ```toml
/// [fixtures]
/// delete = true
/// bulk_insert = true
/// bulk_batch_size = 500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderOptions {
	/// Overwrite non-key columns of conflicting rows.
	pub update: bool,
	/// Skip conflicting rows.
	pub ignore: bool,
	/// Delete every row of the table before inserting.
	pub delete: bool,
	/// Combine rows into multi-row `INSERT` statements.
	pub bulk_insert: bool,
	/// Maximum rows per statement in bulk mode.
	pub bulk_batch_size: usize,
	/// Conflict target for update and ignore modes.
	pub conflict_columns: Vec<String>,
}

impl Default for LoaderOptions {
	fn default() -> Self {
		Self {
			update: false,
			ignore: false,
			delete: false,
			bulk_insert: false,
			bulk_batch_size: DEFAULT_BULK_BATCH_SIZE,
			conflict_columns: Vec::new(),
		}
	}
}

impl LoaderOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Defaults for a driver, taking bulk mode from the dialect.
	///
	/// # Examples
	///
	/// ```
	/// use tabula_db::Dialect;
	/// use tabula_fixtures::fixtures::LoaderOptions;
	///
	/// assert!(LoaderOptions::for_dialect(&Dialect::mysql()).bulk_insert);
	/// assert!(!LoaderOptions::for_dialect(&Dialect::sqlite()).bulk_insert);
	/// ```
	pub fn for_dialect(dialect: &Dialect) -> Self {
		Self {
			bulk_insert: dialect.bulk_insert_by_default,
			..Self::default()
		}
	}

	pub fn with_update(mut self, update: bool) -> Self {
		self.update = update;
		self
	}

	pub fn with_ignore(mut self, ignore: bool) -> Self {
		self.ignore = ignore;
		self
	}

	pub fn with_delete(mut self, delete: bool) -> Self {
		self.delete = delete;
		self
	}

	pub fn with_bulk_insert(mut self, bulk_insert: bool) -> Self {
		self.bulk_insert = bulk_insert;
		self
	}

	pub fn with_bulk_batch_size(mut self, size: usize) -> Self {
		self.bulk_batch_size = size;
		self
	}

	pub fn with_conflict_columns<I, S>(mut self, columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.conflict_columns = columns.into_iter().map(Into::into).collect();
		self
	}

	/// Parse options from TOML text.
	pub fn from_toml_str(content: &str) -> FixtureResult<Self> {
		let document: toml::Table = toml::from_str(content)
			.map_err(|e| FixtureError::Config(format!("invalid loader settings: {e}")))?;

		let table = match document.get("fixtures") {
			Some(toml::Value::Table(section)) => section.clone(),
			Some(_) => {
				return Err(FixtureError::Config(
					"loader settings: 'fixtures' must be a table".to_string(),
				));
			}
			None => document,
		};

		toml::Value::Table(table)
			.try_into()
			.map_err(|e| FixtureError::Config(format!("invalid loader settings: {e}")))
	}

	/// Read options from a TOML file.
	pub fn from_toml_file(path: &Path) -> FixtureResult<Self> {
		let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}
}

/// Per-call overrides. Unset fields inherit from the loader's baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOverrides {
	pub table: Option<String>,
	pub format: Option<String>,
	pub update: Option<bool>,
	pub ignore: Option<bool>,
	pub delete: Option<bool>,
	pub bulk_insert: Option<bool>,
	pub bulk_batch_size: Option<usize>,
	pub conflict_columns: Option<Vec<String>>,
}

impl LoadOverrides {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn table(mut self, table: impl Into<String>) -> Self {
		self.table = Some(table.into());
		self
	}

	pub fn format(mut self, format: impl Into<String>) -> Self {
		self.format = Some(format.into());
		self
	}

	pub fn update(mut self, update: bool) -> Self {
		self.update = Some(update);
		self
	}

	pub fn ignore(mut self, ignore: bool) -> Self {
		self.ignore = Some(ignore);
		self
	}

	pub fn delete(mut self, delete: bool) -> Self {
		self.delete = Some(delete);
		self
	}

	pub fn bulk_insert(mut self, bulk_insert: bool) -> Self {
		self.bulk_insert = Some(bulk_insert);
		self
	}

	pub fn bulk_batch_size(mut self, size: usize) -> Self {
		self.bulk_batch_size = Some(size);
		self
	}

	pub fn conflict_columns<I, S>(mut self, columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.conflict_columns = Some(columns.into_iter().map(Into::into).collect());
		self
	}
}

/// Fully resolved options for one load call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
	pub table: String,
	/// `None` when the call supplied in-memory data.
	pub format: Option<FixtureFormat>,
	pub update: bool,
	pub ignore: bool,
	pub delete: bool,
	pub bulk_insert: bool,
	pub bulk_batch_size: usize,
	pub conflict_columns: Vec<String>,
}

impl LoadOptions {
	/// Rows per `INSERT` statement.
	pub fn batch_size(&self) -> usize {
		if self.bulk_insert {
			self.bulk_batch_size
		} else {
			1
		}
	}
}

/// Merge overrides over the baseline and infer what is missing from `path`.
///
/// `path` is the fixture file, or `None` for in-memory data, in which case
/// the table must be given explicitly and no format is needed.
///
/// # Errors
///
/// Returns [`FixtureError::Config`] when update and ignore are both set, when
/// the dialect cannot express the requested conflict mode, when the batch
/// size is zero, or when the table or format cannot be determined.
pub fn resolve(
	base: &LoaderOptions,
	path: Option<&Path>,
	overrides: &LoadOverrides,
	dialect: &Dialect,
) -> FixtureResult<LoadOptions> {
	let update = overrides.update.unwrap_or(base.update);
	let ignore = overrides.ignore.unwrap_or(base.ignore);
	let conflict_columns = overrides
		.conflict_columns
		.clone()
		.unwrap_or_else(|| base.conflict_columns.clone());

	if update && ignore {
		return Err(FixtureError::Config(
			"update and ignore are exclusive options".to_string(),
		));
	}
	if update && !dialect.supports_upsert(!conflict_columns.is_empty()) {
		return Err(FixtureError::Config(if dialect.supports_upsert(true) {
			format!(
				"update on {} requires conflict columns",
				dialect.database_type
			)
		} else {
			format!("update is not supported by {}", dialect.database_type)
		}));
	}
	if ignore && !dialect.insert_ignore {
		return Err(FixtureError::Config(format!(
			"ignore is not supported by {}",
			dialect.database_type
		)));
	}

	let bulk_batch_size = overrides.bulk_batch_size.unwrap_or(base.bulk_batch_size);
	if bulk_batch_size == 0 {
		return Err(FixtureError::Config(
			"bulk batch size must be at least 1".to_string(),
		));
	}

	let table = match &overrides.table {
		Some(table) if !table.is_empty() => table.clone(),
		_ => infer_table(path)?,
	};
	let format = resolve_format(overrides.format.as_deref(), path)?;

	Ok(LoadOptions {
		table,
		format,
		update,
		ignore,
		delete: overrides.delete.unwrap_or(base.delete),
		bulk_insert: overrides.bulk_insert.unwrap_or(base.bulk_insert),
		bulk_batch_size,
		conflict_columns,
	})
}

/// Table name from the leading identifier characters of the file name.
///
/// `fixtures/item.csv` and `item_2.backup.json` give `item` and `item_2`.
pub fn infer_table(path: Option<&Path>) -> FixtureResult<String> {
	let path = path.ok_or_else(|| {
		FixtureError::Config("table is required when loading in-memory data".to_string())
	})?;
	let file_name = path
		.file_name()
		.and_then(|name| name.to_str())
		.unwrap_or_default();

	TABLE_NAME_PATTERN
		.captures(file_name)
		.and_then(|caps| caps.get(1))
		.map(|m| m.as_str().to_string())
		.ok_or_else(|| {
			FixtureError::Config(format!(
				"cannot infer table name from '{}'",
				path.display()
			))
		})
}

fn resolve_format(
	explicit: Option<&str>,
	path: Option<&Path>,
) -> FixtureResult<Option<FixtureFormat>> {
	if let Some(name) = explicit.filter(|name| !name.is_empty()) {
		return FixtureFormat::from_name(name)
			.map(Some)
			.ok_or_else(|| FixtureError::Config(format!("unsupported format: {name}")));
	}

	let Some(path) = path else {
		return Ok(None);
	};
	if let Some(format) = FixtureFormat::from_path(path) {
		return Ok(Some(format));
	}
	match FixtureFormat::extension_of(path) {
		Some(extension) => Err(FixtureError::Config(format!(
			"unsupported format: {extension}"
		))),
		None => Err(FixtureError::Config(format!(
			"cannot infer format from '{}'",
			path.display()
		))),
	}
}
