//! Transaction scope with guaranteed finalization
//!
//! [`TransactionScope`] owns the executor for the duration of one unit of
//! work. It is finalized exactly once: through [`TransactionScope::commit`],
//! through [`TransactionScope::rollback`], or, when neither ran (early
//! return, panic unwinding, a cancelled future), by dropping the executor,
//! which rolls the transaction back.

use super::{
	backend::{DatabaseBackend, TransactionExecutor},
	error::{DatabaseError, Result},
	types::QueryResult,
};

/// RAII guard around an open transaction.
///
/// # Examples
///
/// ```rust,ignore
/// let mut tx = TransactionScope::begin(backend.as_ref()).await?;
/// tx.execute("DELETE FROM \"item\"", &[]).await?;
/// tx.commit().await?;
/// ```
pub struct TransactionScope {
	executor: Option<Box<dyn TransactionExecutor>>,
}

impl TransactionScope {
	/// Begin a new transaction on the backend.
	pub async fn begin(backend: &dyn DatabaseBackend) -> Result<Self> {
		let executor = backend.begin().await?;
		Ok(Self::from_executor(executor))
	}

	/// Wrap an already open transaction.
	pub fn from_executor(executor: Box<dyn TransactionExecutor>) -> Self {
		Self {
			executor: Some(executor),
		}
	}

	/// Execute a statement inside the transaction.
	pub async fn execute(&mut self, sql: &str, params: &[String]) -> Result<QueryResult> {
		let executor = self.executor.as_mut().ok_or_else(|| {
			DatabaseError::TransactionError("Transaction already consumed".to_string())
		})?;
		executor.execute(sql, params).await
	}

	/// Explicit commit
	pub async fn commit(mut self) -> Result<()> {
		let executor = self.executor.take().ok_or_else(|| {
			DatabaseError::TransactionError("Transaction already consumed".to_string())
		})?;
		executor.commit().await
	}

	/// Explicit rollback
	pub async fn rollback(mut self) -> Result<()> {
		let executor = self.executor.take().ok_or_else(|| {
			DatabaseError::TransactionError("Transaction already consumed".to_string())
		})?;
		executor.rollback().await
	}

	/// Whether the transaction has not been committed or rolled back yet.
	pub fn is_active(&self) -> bool {
		self.executor.is_some()
	}
}

impl Drop for TransactionScope {
	/// Roll back by dropping the executor if the scope was never finalized.
	///
	/// Errors cannot be propagated from here; the rollback itself is carried
	/// out by the executor's own drop.
	fn drop(&mut self) {
		if let Some(executor) = self.executor.take() {
			tracing::warn!(
				"TransactionScope dropped without commit or rollback; rolling back"
			);
			drop(executor);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use rstest::rstest;
	use std::sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	};

	#[derive(Default)]
	struct Counters {
		executed: AtomicUsize,
		committed: AtomicUsize,
		rolled_back: AtomicUsize,
		dropped: AtomicUsize,
	}

	struct CountingExecutor {
		counters: Arc<Counters>,
	}

	impl Drop for CountingExecutor {
		fn drop(&mut self) {
			self.counters.dropped.fetch_add(1, Ordering::SeqCst);
		}
	}

	#[async_trait]
	impl TransactionExecutor for CountingExecutor {
		async fn execute(&mut self, _sql: &str, _params: &[String]) -> Result<QueryResult> {
			self.counters.executed.fetch_add(1, Ordering::SeqCst);
			Ok(QueryResult { rows_affected: 1 })
		}

		async fn commit(self: Box<Self>) -> Result<()> {
			self.counters.committed.fetch_add(1, Ordering::SeqCst);
			Ok(())
		}

		async fn rollback(self: Box<Self>) -> Result<()> {
			self.counters.rolled_back.fetch_add(1, Ordering::SeqCst);
			Ok(())
		}
	}

	fn scope() -> (TransactionScope, Arc<Counters>) {
		let counters = Arc::new(Counters::default());
		let executor = CountingExecutor {
			counters: counters.clone(),
		};
		(TransactionScope::from_executor(Box::new(executor)), counters)
	}

	#[rstest]
	#[tokio::test]
	async fn test_commit_finalizes_once() {
		// Arrange
		let (mut tx, counters) = scope();

		// Act
		tx.execute("DELETE FROM \"item\"", &[]).await.unwrap();
		tx.commit().await.unwrap();

		// Assert
		assert_eq!(counters.executed.load(Ordering::SeqCst), 1);
		assert_eq!(counters.committed.load(Ordering::SeqCst), 1);
		assert_eq!(counters.rolled_back.load(Ordering::SeqCst), 0);
		assert_eq!(counters.dropped.load(Ordering::SeqCst), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_rollback_finalizes_once() {
		let (tx, counters) = scope();

		tx.rollback().await.unwrap();

		assert_eq!(counters.committed.load(Ordering::SeqCst), 0);
		assert_eq!(counters.rolled_back.load(Ordering::SeqCst), 1);
	}

	#[rstest]
	fn test_drop_without_finalize_releases_executor() {
		// Arrange
		let (tx, counters) = scope();
		assert!(tx.is_active());

		// Act
		drop(tx);

		// Assert - the executor is dropped, which is where drivers roll back
		assert_eq!(counters.dropped.load(Ordering::SeqCst), 1);
		assert_eq!(counters.committed.load(Ordering::SeqCst), 0);
	}
}
