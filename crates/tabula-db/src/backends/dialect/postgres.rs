//! PostgreSQL backend on top of sqlx

use async_trait::async_trait;
use sqlx::{Postgres, PgPool, Transaction};
use std::sync::Arc;

use crate::backends::{
	backend::{DatabaseBackend, TransactionExecutor},
	error::{DatabaseError, Result},
	types::{Dialect, QueryResult},
};

/// PostgreSQL database backend
pub struct PostgresBackend {
	pool: Arc<PgPool>,
	dialect: Dialect,
}

impl PostgresBackend {
	pub fn new(pool: PgPool) -> Self {
		Self {
			pool: Arc::new(pool),
			dialect: Dialect::postgres(),
		}
	}

	/// Connect a new pool from a database URL.
	pub async fn connect(url: &str) -> Result<Self> {
		let pool = PgPool::connect(url).await?;
		Ok(Self::new(pool))
	}

	/// Replace the driver descriptor, e.g. to switch capabilities off.
	pub fn with_dialect(mut self, dialect: Dialect) -> Self {
		self.dialect = dialect;
		self
	}

	pub fn pool(&self) -> &PgPool {
		&self.pool
	}
}

#[async_trait]
impl DatabaseBackend for PostgresBackend {
	fn dialect(&self) -> Dialect {
		self.dialect.clone()
	}

	async fn begin(&self) -> Result<Box<dyn TransactionExecutor>> {
		let tx = self.pool.begin().await?;
		Ok(Box::new(PostgresTransactionExecutor::new(tx)))
	}
}

/// PostgreSQL transaction executor
pub struct PostgresTransactionExecutor {
	tx: Option<Transaction<'static, Postgres>>,
}

impl PostgresTransactionExecutor {
	pub fn new(tx: Transaction<'static, Postgres>) -> Self {
		Self { tx: Some(tx) }
	}

	fn take(&mut self) -> Result<Transaction<'static, Postgres>> {
		self.tx.take().ok_or_else(|| {
			DatabaseError::TransactionError("Transaction already consumed".to_string())
		})
	}
}

#[async_trait]
impl TransactionExecutor for PostgresTransactionExecutor {
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
