//! In-memory backend that records what the loader does.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tabula_db::backends::{
	DatabaseBackend, DatabaseError, Dialect, QueryResult, Result, TransactionExecutor,
};

/// Everything a [`RecordingBackend`] observed.
#[derive(Debug, Clone, Default)]
pub(crate) struct Journal {
	/// Executed statements with their parameters, including a failing one.
	pub statements: Vec<(String, Vec<String>)>,
	pub begins: usize,
	pub commits: usize,
	pub rollbacks: usize,
	/// Executors dropped without commit or rollback.
	pub abandoned: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Failures {
	statement: Option<usize>,
	begin: bool,
	commit: bool,
	rollback: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingBackend {
	dialect: Dialect,
	journal: Arc<Mutex<Journal>>,
	failures: Failures,
}

impl RecordingBackend {
	pub fn new(dialect: Dialect) -> Self {
		Self {
			dialect,
			journal: Arc::new(Mutex::new(Journal::default())),
			failures: Failures::default(),
		}
	}

	/// Fail the statement with this zero-based index.
	pub fn failing_at(mut self, index: usize) -> Self {
		self.failures.statement = Some(index);
		self
	}

	pub fn failing_begin(mut self) -> Self {
		self.failures.begin = true;
		self
	}

	pub fn failing_commit(mut self) -> Self {
		self.failures.commit = true;
		self
	}

	pub fn failing_rollback(mut self) -> Self {
		self.failures.rollback = true;
		self
	}

	pub fn journal(&self) -> Journal {
		self.journal.lock().clone()
	}
}

#[async_trait]
impl DatabaseBackend for RecordingBackend {
	fn dialect(&self) -> Dialect {
		self.dialect.clone()
	}

	async fn begin(&self) -> Result<Box<dyn TransactionExecutor>> {
		if self.failures.begin {
			return Err(DatabaseError::Execution("connection refused".to_string()));
		}
		self.journal.lock().begins += 1;
		Ok(Box::new(RecordingExecutor {
			journal: self.journal.clone(),
			failures: self.failures,
			finished: false,
		}))
	}
}

struct RecordingExecutor {
	journal: Arc<Mutex<Journal>>,
	failures: Failures,
	finished: bool,
}

#[async_trait]
impl TransactionExecutor for RecordingExecutor {
	async fn execute(&mut self, sql: &str, params: &[String]) -> Result<QueryResult> {
		let mut journal = self.journal.lock();
		let index = journal.statements.len();
		journal.statements.push((sql.to_string(), params.to_vec()));
		if self.failures.statement == Some(index) {
			return Err(DatabaseError::Execution(format!(
				"injected failure at statement {index}"
			)));
		}
		Ok(QueryResult { rows_affected: 1 })
	}

	async fn commit(self: Box<Self>) -> Result<()> {
		let mut this = self;
		this.finished = true;
		if this.failures.commit {
			return Err(DatabaseError::Execution("commit refused".to_string()));
		}
		this.journal.lock().commits += 1;
		Ok(())
	}

	async fn rollback(self: Box<Self>) -> Result<()> {
		let mut this = self;
		this.finished = true;
		if this.failures.rollback {
			return Err(DatabaseError::Execution("rollback refused".to_string()));
		}
		this.journal.lock().rollbacks += 1;
		Ok(())
	}
}

impl Drop for RecordingExecutor {
	fn drop(&mut self) {
		if !self.finished {
			self.journal.lock().abandoned += 1;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use tabula_db::backends::TransactionScope;

	#[rstest]
	#[tokio::test]
	async fn test_unfinished_scope_is_abandoned() {
		let backend = RecordingBackend::new(Dialect::sqlite());

		let tx = TransactionScope::begin(&backend).await.unwrap();
		drop(tx);

		let journal = backend.journal();
		assert_eq!(journal.abandoned, 1);
		assert_eq!(journal.rollbacks, 0);
	}
}
