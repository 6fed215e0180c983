//! Insertion engine.
//!
//! Turns resolved options plus [`TableData`] into an [`InsertionPlan`] (an
//! optional `DELETE` followed by chunked `INSERT`s) and runs the plan inside
//! a caller-owned transaction. The first failing statement stops the run; the
//! caller rolls back.

use tabula_db::backends::{
	DeleteBuilder, Dialect, InsertBuilder, InsertValue, OnConflictAction, Statement,
	TransactionScope,
};

use super::{LoadOptions, TableData};
use crate::error::{FixtureError, FixtureResult, InsertPhase};

/// One `INSERT` statement and the number of fixture rows it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertBatch {
	pub statement: Statement,
	pub rows: usize,
}

/// Statements for one load call, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionPlan {
	pub table: String,
	pub delete: Option<Statement>,
	pub inserts: Vec<InsertBatch>,
}

impl InsertionPlan {
	/// Number of fixture rows covered by the inserts.
	pub fn row_count(&self) -> usize {
		self.inserts.iter().map(|batch| batch.rows).sum()
	}

	pub fn statement_count(&self) -> usize {
		self.inserts.len() + usize::from(self.delete.is_some())
	}
}

/// Counts reported after a plan ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertionSummary {
	pub rows_inserted: usize,
	pub statements_executed: usize,
	/// Rows removed by the delete phase, when it ran.
	pub rows_deleted: Option<u64>,
}

/// Builds and executes the statements of one load call.
#[derive(Debug, Clone, Copy)]
pub struct InsertionEngine<'a> {
	dialect: &'a Dialect,
	options: &'a LoadOptions,
}

impl<'a> InsertionEngine<'a> {
	pub fn new(dialect: &'a Dialect, options: &'a LoadOptions) -> Self {
		Self { dialect, options }
	}

	/// Conflict clause for the configured mode.
	///
	/// Update mode overwrites every column except the conflict columns.
	pub fn conflict_action(&self, columns: &[String]) -> Option<OnConflictAction> {
		let conflict_columns = if self.options.conflict_columns.is_empty() {
			None
		} else {
			Some(self.options.conflict_columns.clone())
		};

		if self.options.update {
			let update_columns = columns
				.iter()
				.filter(|column| !self.options.conflict_columns.contains(*column))
				.cloned()
				.collect();
			Some(OnConflictAction::DoUpdate {
				conflict_columns,
				update_columns,
			})
		} else if self.options.ignore {
			Some(OnConflictAction::DoNothing { conflict_columns })
		} else {
			None
		}
	}

	/// Build every statement without touching the database.
	///
	/// Rows are grouped into batches of [`LoadOptions::batch_size`], shrunk
	/// so a statement stays under the dialect's bind parameter limit. On
	/// dialects that reject `DEFAULT` inside `VALUES`, a row holding a default
	/// sentinel closes the current batch and is sent on its own, so statement
	/// order still follows row order.
	pub fn plan(&self, data: &TableData) -> FixtureResult<InsertionPlan> {
		let table = &self.options.table;
		let delete = self
			.options
			.delete
			.then(|| DeleteBuilder::new(self.dialect, table).build());

		let batch_size = self
			.dialect
			.rows_per_statement(data.columns().len(), self.options.batch_size());
		let isolate_defaults = !self.dialect.default_keyword;
		let on_conflict = self.conflict_action(data.columns());

		let mut inserts = Vec::new();
		let mut pending: Vec<Vec<InsertValue>> = Vec::with_capacity(batch_size.min(data.len()));
		for row in data.rows() {
			let values = data.row_values(row);
			if isolate_defaults && values.iter().any(InsertValue::is_default) {
				self.flush(data, &on_conflict, &mut pending, &mut inserts)?;
				pending.push(values);
				self.flush(data, &on_conflict, &mut pending, &mut inserts)?;
				continue;
			}
			pending.push(values);
			if pending.len() >= batch_size {
				self.flush(data, &on_conflict, &mut pending, &mut inserts)?;
			}
		}
		self.flush(data, &on_conflict, &mut pending, &mut inserts)?;

		Ok(InsertionPlan {
			table: table.clone(),
			delete,
			inserts,
		})
	}

	fn flush(
		&self,
		data: &TableData,
		on_conflict: &Option<OnConflictAction>,
		pending: &mut Vec<Vec<InsertValue>>,
		inserts: &mut Vec<InsertBatch>,
	) -> FixtureResult<()> {
		if pending.is_empty() {
			return Ok(());
		}
		let rows = pending.len();
		let statement = InsertBuilder::new(self.dialect, &self.options.table)
			.columns(data.columns().to_vec())
			.rows(pending.drain(..))
			.on_conflict(on_conflict.clone())
			.build()
			.map_err(|source| FixtureError::Insert {
				phase: InsertPhase::Insert,
				table: self.options.table.clone(),
				statement_index: inserts.len(),
				source,
			})?;
		inserts.push(InsertBatch { statement, rows });
		Ok(())
	}

	/// Run a plan inside an open transaction.
	///
	/// Stops at the first failing statement and reports its phase and index.
	/// Finalizing the transaction is left to the caller.
	pub async fn execute(
		&self,
		plan: &InsertionPlan,
		tx: &mut TransactionScope,
	) -> FixtureResult<InsertionSummary> {
		let mut summary = InsertionSummary::default();

		if let Some(ref statement) = plan.delete {
			tracing::debug!(
				table = %plan.table,
				phase = "delete",
				sql = %statement.sql,
				"Executing statement"
			);
			let result = tx
				.execute(&statement.sql, &statement.params)
				.await
				.map_err(|source| FixtureError::Insert {
					phase: InsertPhase::Delete,
					table: plan.table.clone(),
					statement_index: 0,
					source,
				})?;
			summary.rows_deleted = Some(result.rows_affected);
			summary.statements_executed += 1;
		}

		for (index, batch) in plan.inserts.iter().enumerate() {
			tracing::debug!(
				table = %plan.table,
				phase = "insert",
				statement_index = index,
				rows = batch.rows,
				"Executing statement"
			);
			tx.execute(&batch.statement.sql, &batch.statement.params)
				.await
				.map_err(|source| FixtureError::Insert {
					phase: InsertPhase::Insert,
					table: plan.table.clone(),
					statement_index: index,
					source,
				})?;
			summary.rows_inserted += batch.rows;
			summary.statements_executed += 1;
		}

		Ok(summary)
	}
}
