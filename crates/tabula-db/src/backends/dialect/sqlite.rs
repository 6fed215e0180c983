//! SQLite backend on top of sqlx
//!
//! SQLite cannot use `DEFAULT` inside `VALUES`; see [`Dialect::sqlite`].
//! In-memory databases live as long as their connection, so pools for
//! `sqlite::memory:` should keep a single, never-recycled connection.

use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Arc;

use crate::backends::{
	backend::{DatabaseBackend, TransactionExecutor},
	error::{DatabaseError, Result},
	types::{Dialect, QueryResult},
};

/// SQLite database backend
pub struct SqliteBackend {
	pool: Arc<SqlitePool>,
	dialect: Dialect,
}

impl SqliteBackend {
	pub fn new(pool: SqlitePool) -> Self {
		Self {
			pool: Arc::new(pool),
			dialect: Dialect::sqlite(),
		}
	}

	/// Connect a new pool from a database URL.
	pub async fn connect(url: &str) -> Result<Self> {
		let pool = SqlitePool::connect(url).await?;
		Ok(Self::new(pool))
	}

	/// Replace the driver descriptor, e.g. to switch capabilities off.
	pub fn with_dialect(mut self, dialect: Dialect) -> Self {
		self.dialect = dialect;
		self
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}
}

#[async_trait]
impl DatabaseBackend for SqliteBackend {
	fn dialect(&self) -> Dialect {
		self.dialect.clone()
	}

	async fn begin(&self) -> Result<Box<dyn TransactionExecutor>> {
		let tx = self.pool.begin().await?;
		Ok(Box::new(SqliteTransactionExecutor::new(tx)))
	}
}

/// SQLite transaction executor
pub struct SqliteTransactionExecutor {
	tx: Option<Transaction<'static, Sqlite>>,
}

impl SqliteTransactionExecutor {
	pub fn new(tx: Transaction<'static, Sqlite>) -> Self {
		Self { tx: Some(tx) }
	}

	fn take(&mut self) -> Result<Transaction<'static, Sqlite>> {
		self.tx.take().ok_or_else(|| {
			DatabaseError::TransactionError("Transaction already consumed".to_string())
		})
	}
}

#[async_trait]
impl TransactionExecutor for SqliteTransactionExecutor {
	async fn execute(&mut self, sql: &str, params: &[String]) -> Result<QueryResult> {
		let tx = self.tx.as_mut().ok_or_else(|| {
			DatabaseError::TransactionError("Transaction already consumed".to_string())
		})?;

		let mut query = sqlx::query(sql);
		for param in params {
			query = query.bind(param.as_str());
		}
		let result = query.execute(&mut **tx).await?;
		Ok(QueryResult {
			rows_affected: result.rows_affected(),
		})
	}

	async fn commit(self: Box<Self>) -> Result<()> {
		let mut this = self;
		let tx = this.take()?;
		tx.commit().await?;
		Ok(())
	}

	async fn rollback(self: Box<Self>) -> Result<()> {
		let mut this = self;
		let tx = this.take()?;
		tx.rollback().await?;
		Ok(())
	}
}
