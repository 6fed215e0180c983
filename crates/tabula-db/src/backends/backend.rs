//! Backend and transaction traits

use async_trait::async_trait;

use super::{
	error::Result,
	types::{Dialect, QueryResult},
};

/// A connection-like capability that can open transactions.
#[async_trait]
pub trait DatabaseBackend: Send + Sync {
	/// Driver descriptor used to build statements for this backend.
	fn dialect(&self) -> Dialect;

	/// Begin a new transaction.
	async fn begin(&self) -> Result<Box<dyn TransactionExecutor>>;
}

/// An open transaction.
///
/// Implementations must roll back when dropped without `commit` or
/// `rollback`; sqlx transactions already behave that way.
#[async_trait]
pub trait TransactionExecutor: Send {
	/// Execute a statement with positional text parameters
	async fn execute(&mut self, sql: &str, params: &[String]) -> Result<QueryResult>;

	/// Commit the transaction
	async fn commit(self: Box<Self>) -> Result<()>;

	/// Rollback the transaction
	async fn rollback(self: Box<Self>) -> Result<()>;
}
