//! MySQL backend on top of sqlx

use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, Transaction};
use std::sync::Arc;

use crate::backends::{
	backend::{DatabaseBackend, TransactionExecutor},
	error::{DatabaseError, Result},
	types::{Dialect, QueryResult},
};

/// MySQL database backend
pub struct MySqlBackend {
	pool: Arc<MySqlPool>,
	dialect: Dialect,
}

impl MySqlBackend {
	pub fn new(pool: MySqlPool) -> Self {
		Self {
			pool: Arc::new(pool),
			dialect: Dialect::mysql(),
		}
	}

	/// Connect a new pool from a database URL.
	pub async fn connect(url: &str) -> Result<Self> {
		let pool = MySqlPool::connect(url).await?;
		Ok(Self::new(pool))
	}

	/// Replace the driver descriptor, e.g. to switch capabilities off.
	pub fn with_dialect(mut self, dialect: Dialect) -> Self {
		self.dialect = dialect;
		self
	}

	pub fn pool(&self) -> &MySqlPool {
		&self.pool
	}
}

#[async_trait]
impl DatabaseBackend for MySqlBackend {
	fn dialect(&self) -> Dialect {
		self.dialect.clone()
	}

	async fn begin(&self) -> Result<Box<dyn TransactionExecutor>> {
		let tx = self.pool.begin().await?;
		Ok(Box::new(MySqlTransactionExecutor::new(tx)))
	}
}

/// MySQL transaction executor
pub struct MySqlTransactionExecutor {
	tx: Option<Transaction<'static, MySql>>,
}

impl MySqlTransactionExecutor {
	pub fn new(tx: Transaction<'static, MySql>) -> Self {
		Self { tx: Some(tx) }
	}

	fn take(&mut self) -> Result<Transaction<'static, MySql>> {
		self.tx.take().ok_or_else(|| {
			DatabaseError::TransactionError("Transaction already consumed".to_string())
		})
	}
}

#[async_trait]
impl TransactionExecutor for MySqlTransactionExecutor {
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
