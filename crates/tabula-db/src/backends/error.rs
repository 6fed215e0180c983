//! Database error types

use thiserror::Error;

/// Errors raised at the database boundary.
#[derive(Debug, Error)]
pub enum DatabaseError {
	/// Error reported by the sqlx driver.
	#[error("Database driver error: {0}")]
	Sqlx(#[from] sqlx::Error),

	/// Statement could not be built.
	#[error("Query build error: {0}")]
	QueryBuild(String),

	/// Transaction handle misuse or failure outside of the driver.
	#[error("Transaction error: {0}")]
	TransactionError(String),

	/// Requested SQL feature is not available for the dialect.
	#[error("Unsupported by {dialect}: {feature}")]
	Unsupported {
		/// Dialect name.
		dialect: String,
		/// Feature that was requested.
		feature: String,
	},

	/// Error raised by a non-sqlx executor (custom drivers, test doubles).
	#[error("Execution error: {0}")]
	Execution(String),
}

/// Result type alias for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
