//! Common type definitions for database abstraction

use serde::{Deserialize, Serialize};

/// Database type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatabaseType {
	Postgres,
	Sqlite,
	Mysql,
}

impl DatabaseType {
	/// Quote an identifier the way this database expects.
	///
	/// Embedded quote characters are doubled.
	///
	/// # Examples
	///
	/// ```
	/// use tabula_db::backends::types::DatabaseType;
	///
	/// assert_eq!(DatabaseType::Postgres.quote_identifier("users"), "\"users\"");
	/// assert_eq!(DatabaseType::Mysql.quote_identifier("users"), "`users`");
	/// ```
	pub fn quote_identifier(&self, ident: &str) -> String {
		let quote = match self {
			DatabaseType::Mysql => '`',
			DatabaseType::Postgres | DatabaseType::Sqlite => '"',
		};
		let mut quoted = String::with_capacity(ident.len() + 2);
		quoted.push(quote);
		for ch in ident.chars() {
			if ch == quote {
				quoted.push(quote);
			}
			quoted.push(ch);
		}
		quoted.push(quote);
		quoted
	}
}

impl std::fmt::Display for DatabaseType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			DatabaseType::Postgres => write!(f, "postgres"),
			DatabaseType::Sqlite => write!(f, "sqlite"),
			DatabaseType::Mysql => write!(f, "mysql"),
		}
	}
}

/// How a dialect expresses "update on duplicate key".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpsertSupport {
	/// No upsert syntax available.
	Unsupported,
	/// Upsert works without naming the conflicting columns
	/// (MySQL `ON DUPLICATE KEY UPDATE`, SQLite `ON CONFLICT DO UPDATE`).
	Native,
	/// Upsert needs an explicit conflict target (PostgreSQL).
	RequiresConflictTarget,
}

/// Driver descriptor: the SQL flavour plus what the driver can express.
///
/// Capabilities are plain data so that a backend for a less capable server
/// (an old SQLite, a MySQL-compatible proxy) can switch features off
/// without a new [`DatabaseType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialect {
	pub database_type: DatabaseType,
	/// Native "insert, skipping duplicates" syntax.
	pub insert_ignore: bool,
	pub upsert: UpsertSupport,
	/// `DEFAULT` is accepted inside a `VALUES` tuple.
	pub default_keyword: bool,
	/// Values are rendered as quoted literals instead of bind parameters.
	///
	/// PostgreSQL types a bound `String` as `text` and refuses to cast it into
	/// integer or date columns; an untyped literal is coerced by the server.
	pub inline_literals: bool,
	/// Whether loaders on this driver batch rows unless told otherwise.
	pub bulk_insert_by_default: bool,
	/// Most bind parameters one statement may carry, when the driver caps it.
	pub max_bind_params: Option<usize>,
}

impl Dialect {
	pub fn postgres() -> Self {
		Self {
			database_type: DatabaseType::Postgres,
			insert_ignore: true,
			upsert: UpsertSupport::RequiresConflictTarget,
			default_keyword: true,
			inline_literals: true,
			bulk_insert_by_default: false,
			max_bind_params: None,
		}
	}

	pub fn mysql() -> Self {
		Self {
			database_type: DatabaseType::Mysql,
			insert_ignore: true,
			upsert: UpsertSupport::Native,
			default_keyword: true,
			inline_literals: false,
			bulk_insert_by_default: true,
			max_bind_params: Some(65_535),
		}
	}

	/// SQLite 3.35 or newer (upsert without a conflict target).
	pub fn sqlite() -> Self {
		Self {
			database_type: DatabaseType::Sqlite,
			insert_ignore: true,
			upsert: UpsertSupport::Native,
			default_keyword: false,
			inline_literals: false,
			bulk_insert_by_default: false,
			// SQLITE_MAX_VARIABLE_NUMBER since 3.32
			max_bind_params: Some(32_766),
		}
	}

	pub fn without_upsert(mut self) -> Self {
		self.upsert = UpsertSupport::Unsupported;
		self
	}

	pub fn without_insert_ignore(mut self) -> Self {
		self.insert_ignore = false;
		self
	}

	/// Check whether update-on-duplicate can be expressed.
	///
	/// # Examples
	///
	/// ```
	/// use tabula_db::backends::types::Dialect;
	///
	/// assert!(Dialect::mysql().supports_upsert(false));
	/// assert!(!Dialect::postgres().supports_upsert(false));
	/// assert!(Dialect::postgres().supports_upsert(true));
	/// ```
	pub fn supports_upsert(&self, has_conflict_target: bool) -> bool {
		match self.upsert {
			UpsertSupport::Unsupported => false,
			UpsertSupport::Native => true,
			UpsertSupport::RequiresConflictTarget => has_conflict_target,
		}
	}
	/// Rows that fit in one multi-row INSERT of `columns` values each,
	/// never more than `batch_size` and never fewer than one.
	///
	/// # Examples
	///
	/// ```
	/// use tabula_db::backends::types::Dialect;
	///
	/// assert_eq!(Dialect::sqlite().rows_per_statement(20, 2000), 1638);
	/// assert_eq!(Dialect::sqlite().rows_per_statement(2, 2000), 2000);
	/// assert_eq!(Dialect::postgres().rows_per_statement(20, 2000), 2000);
	/// ```
	pub fn rows_per_statement(&self, columns: usize, batch_size: usize) -> usize {
		let limit = match (self.max_bind_params, columns) {
			(Some(max), columns) if columns > 0 => max / columns,
			_ => batch_size,
		};
		batch_size.min(limit).max(1)
	}
}

/// A single cell handed to an INSERT statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsertValue {
	/// Bound (or quoted) as text; the server coerces it to the column type.
	Text(String),
	/// Represents the SQL DEFAULT keyword
	Default,
}

impl InsertValue {
	/// Map a fixture field to a cell. The empty string becomes
	/// [`InsertValue::Default`] so the column falls back to its default.
	///
	/// # Examples
	///
	/// ```
	/// use tabula_db::backends::types::InsertValue;
	///
	/// assert_eq!(InsertValue::from_field(""), InsertValue::Default);
	/// assert_eq!(InsertValue::from_field("5"), InsertValue::Text("5".into()));
	/// ```
	pub fn from_field(value: &str) -> Self {
		if value.is_empty() {
			InsertValue::Default
		} else {
			InsertValue::Text(value.to_string())
		}
	}

	pub fn is_default(&self) -> bool {
		matches!(self, InsertValue::Default)
	}
}

impl From<&str> for InsertValue {
	fn from(s: &str) -> Self {
		InsertValue::from_field(s)
	}
}

impl From<String> for InsertValue {
	fn from(s: String) -> Self {
		if s.is_empty() {
			InsertValue::Default
		} else {
			InsertValue::Text(s)
		}
	}
}

/// Query result
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryResult {
	pub rows_affected: u64,
}

/// SQL text plus its positional parameters, ready for execution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Statement {
	pub sql: String,
	pub params: Vec<String>,
}

impl Statement {
	pub fn new(sql: impl Into<String>, params: Vec<String>) -> Self {
		Self {
			sql: sql.into(),
			params,
		}
	}
}
