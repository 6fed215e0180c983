//! Error types for fixture loading.
//!
//! Every failure is classified so callers can tell a bad call (configuration)
//! from a bad file (parse, I/O) from a database problem (transaction, insert).

use std::path::PathBuf;

use tabula_db::DatabaseError;
use thiserror::Error;

/// Phase of the insertion engine that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPhase {
	/// The pre-insert `DELETE`.
	Delete,
	/// One of the `INSERT` statements.
	Insert,
}

impl std::fmt::Display for InsertPhase {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Delete => write!(f, "delete"),
			Self::Insert => write!(f, "insert"),
		}
	}
}

/// Errors that can occur while loading fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
	/// Invalid or contradictory options, or table/format inference failed.
	#[error("Configuration error: {0}")]
	Config(String),

	/// Fixture content is malformed, empty, or has an unsupported shape.
	#[error("Parse error in {source_name}: {message}")]
	Parse {
		/// File path or `<memory>` for string input.
		source_name: String,
		/// What was wrong.
		message: String,
	},

	/// Fixture file could not be read.
	#[error("IO error reading {}: {source}", .path.display())]
	Io {
		/// Fixture path.
		path: PathBuf,
		/// Underlying I/O error.
		#[source]
		source: std::io::Error,
	},

	/// Beginning or committing the transaction failed.
	#[error("Transaction error ({context}): {source}")]
	Transaction {
		/// Which transaction step failed.
		context: &'static str,
		/// Underlying database error.
		#[source]
		source: DatabaseError,
	},

	/// A delete or insert statement failed; the transaction was rolled back.
	#[error("{phase} failed on table '{table}' (statement {statement_index}): {source}")]
	Insert {
		/// Which phase failed.
		phase: InsertPhase,
		/// Target table.
		table: String,
		/// Zero-based index of the failing statement within its phase.
		statement_index: usize,
		/// Underlying database error.
		#[source]
		source: DatabaseError,
	},
}

impl FixtureError {
	pub(crate) fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Parse {
			source_name: source_name.into(),
			message: message.into(),
		}
	}

	/// Returns true for configuration errors.
	pub fn is_config(&self) -> bool {
		matches!(self, Self::Config(_))
	}

	/// Returns true for parse errors.
	pub fn is_parse(&self) -> bool {
		matches!(self, Self::Parse { .. })
	}
}

/// Result type alias for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;
