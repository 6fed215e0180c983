//! Statement builders with dialect support
//!
//! This module turns (table, columns, rows, conflict policy) into
//! executable [`Statement`]s using SeaQuery for the INSERT/DELETE bodies and
//! per-dialect suffixes for the conflict clauses.
//!
//! # Identifier Quoting
//!
//! All SQL identifiers (table names, column names) are quoted according to the database backend:
//!
//! | Backend | Quote Character | Example |
//! |---------|-----------------|---------|
//! | PostgreSQL | Double quotes (`"`) | `INSERT INTO "item" ("id", "name") VALUES ('1', 'Excalibur')` |
//! | MySQL | Backticks (`` ` ``) | `` INSERT INTO `item` (`id`, `name`) VALUES (?, ?) `` |
//! | SQLite | Double quotes (`"`) | `INSERT INTO "item" ("id", "name") VALUES (?, ?)` |
//!
//! # Parameters
//!
//! Text cells become positional parameters in row-major order, except on
//! dialects with [`Dialect::inline_literals`] where they are rendered as
//! quoted literals and the parameter list is empty. [`InsertValue::Default`]
//! is always rendered inline as the `DEFAULT` keyword.

use sea_query::{Alias, DeleteStatement, Expr, InsertStatement, Query, Value};
use sea_query::{MysqlQueryBuilder, PostgresQueryBuilder, SqliteQueryBuilder};

use super::{
	error::{DatabaseError, Result},
	types::{DatabaseType, Dialect, InsertValue, Statement},
};

/// ON CONFLICT action for INSERT statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnConflictAction {
	/// Skip conflicting rows (PostgreSQL: ON CONFLICT DO NOTHING, MySQL: INSERT IGNORE, SQLite: INSERT OR IGNORE)
	DoNothing {
		/// Conflict columns (PostgreSQL and SQLite only)
		conflict_columns: Option<Vec<String>>,
	},
	/// Overwrite conflicting rows (PostgreSQL/SQLite: ON CONFLICT DO UPDATE, MySQL: ON DUPLICATE KEY UPDATE)
	DoUpdate {
		/// Conflict columns (PostgreSQL and SQLite only)
		conflict_columns: Option<Vec<String>>,
		/// Columns to update on conflict
		update_columns: Vec<String>,
	},
}

/// Multi-row INSERT builder
///
/// # Examples
///
/// ```
/// use tabula_db::backends::query_builder::InsertBuilder;
/// use tabula_db::backends::types::{Dialect, InsertValue};
///
/// let statement = InsertBuilder::new(&Dialect::mysql(), "item")
///     .columns(vec!["id".to_string(), "name".to_string()])
///     .row(vec![InsertValue::from("1"), InsertValue::from("Excalibur")])
///     .build()
///     .unwrap();
///
/// assert_eq!(statement.sql, "INSERT INTO `item` (`id`, `name`) VALUES (?, ?)");
/// assert_eq!(statement.params, vec!["1".to_string(), "Excalibur".to_string()]);
/// ```
pub struct InsertBuilder {
	dialect: Dialect,
	table: String,
	columns: Vec<String>,
	rows: Vec<Vec<InsertValue>>,
	on_conflict: Option<OnConflictAction>,
}

impl InsertBuilder {
	pub fn new(dialect: &Dialect, table: impl Into<String>) -> Self {
		Self {
			dialect: dialect.clone(),
			table: table.into(),
			columns: Vec::new(),
			rows: Vec::new(),
			on_conflict: None,
		}
	}

	pub fn columns(mut self, columns: Vec<String>) -> Self {
		self.columns = columns;
		self
	}

	/// Add a row; values are positional against [`columns`](Self::columns).
	pub fn row(mut self, values: Vec<InsertValue>) -> Self {
		self.rows.push(values);
		self
	}

	pub fn rows<I>(mut self, rows: I) -> Self
	where
		I: IntoIterator<Item = Vec<InsertValue>>,
	{
		self.rows.extend(rows);
		self
	}

	/// Set ON CONFLICT DO NOTHING behavior
	pub fn on_conflict_do_nothing(mut self, conflict_columns: Option<Vec<String>>) -> Self {
		self.on_conflict = Some(OnConflictAction::DoNothing { conflict_columns });
		self
	}

	/// Set ON CONFLICT DO UPDATE behavior
	///
	/// # Arguments
	///
	/// * `conflict_columns` - Columns to check for conflict (required on PostgreSQL)
	/// * `update_columns` - Columns to overwrite on conflict
	pub fn on_conflict_do_update(
		mut self,
		conflict_columns: Option<Vec<String>>,
		update_columns: Vec<String>,
	) -> Self {
		self.on_conflict = Some(OnConflictAction::DoUpdate {
			conflict_columns,
			update_columns,
		});
		self
	}

	pub fn on_conflict(mut self, action: Option<OnConflictAction>) -> Self {
		self.on_conflict = action;
		self
	}

	pub fn build(&self) -> Result<Statement> {
		if self.columns.is_empty() {
			return Err(DatabaseError::QueryBuild(format!(
				"INSERT into '{}' has no columns",
				self.table
			)));
		}
		if self.rows.is_empty() {
			return Err(DatabaseError::QueryBuild(format!(
				"INSERT into '{}' has no rows",
				self.table
			)));
		}
		for (idx, row) in self.rows.iter().enumerate() {
			if row.len() != self.columns.len() {
				return Err(DatabaseError::QueryBuild(format!(
					"row {} has {} values for {} columns",
					idx,
					row.len(),
					self.columns.len()
				)));
			}
		}

		let has_default = self.rows.iter().flatten().any(InsertValue::is_default);
		let mut statement = if has_default && !self.dialect.default_keyword {
			self.build_without_default_keyword()?
		} else {
			self.build_values(&self.columns, &self.rows)?
		};

		if let Some(ref action) = self.on_conflict {
			statement.sql = self.apply_on_conflict_clause(statement.sql, action)?;
		}

		Ok(statement)
	}

	/// Dialects without `DEFAULT` inside `VALUES` can only omit the column,
	/// which is per-row; callers must send such rows one at a time.
	fn build_without_default_keyword(&self) -> Result<Statement> {
		if self.rows.len() > 1 {
			return Err(DatabaseError::Unsupported {
				dialect: self.dialect.database_type.to_string(),
				feature: "DEFAULT inside a multi-row VALUES list".to_string(),
			});
		}

		let row = &self.rows[0];
		let (columns, values): (Vec<String>, Vec<InsertValue>) = self
			.columns
			.iter()
			.zip(row.iter())
			.filter(|(_, value)| !value.is_default())
			.map(|(column, value)| (column.clone(), value.clone()))
			.unzip();

		if columns.is_empty() {
			let sql = format!(
				"INSERT INTO {} DEFAULT VALUES",
				self.dialect.database_type.quote_identifier(&self.table)
			);
			return Ok(Statement::new(sql, Vec::new()));
		}

		self.build_values(&columns, &[values])
	}

	fn build_values(&self, columns: &[String], rows: &[Vec<InsertValue>]) -> Result<Statement> {
		let mut stmt = Query::insert()
			.into_table(Alias::new(&self.table))
			.to_owned();

		let column_refs: Vec<Alias> = columns.iter().map(Alias::new).collect();
		stmt.columns(column_refs);

		let mut params = Vec::new();
		for row in rows {
			let exprs: Vec<Expr> = row
				.iter()
				.map(|value| match value {
					InsertValue::Text(text) => {
						params.push(text.clone());
						Expr::val(Value::String(Some(text.clone())))
					}
					InsertValue::Default => Expr::cust("DEFAULT"),
				})
				.collect();
			stmt.values(exprs)
				.map_err(|e| DatabaseError::QueryBuild(e.to_string()))?;
		}

		if self.dialect.inline_literals {
			return Ok(Statement::new(
				render_insert_inline(&stmt, self.dialect.database_type),
				Vec::new(),
			));
		}

		Ok(Statement::new(
			render_insert(&stmt, self.dialect.database_type),
			params,
		))
	}

	/// Apply ON CONFLICT clause to SQL string based on database type
	fn apply_on_conflict_clause(&self, mut sql: String, action: &OnConflictAction) -> Result<String> {
		let database_type = self.dialect.database_type;
		let quote = |col: &String| database_type.quote_identifier(col);

		let action = match action {
			// Nothing left to overwrite: keep the existing row.
			OnConflictAction::DoUpdate {
				conflict_columns,
				update_columns,
			} if update_columns.is_empty() => OnConflictAction::DoNothing {
				conflict_columns: conflict_columns.clone(),
			},
			other => other.clone(),
		};

		match &action {
			OnConflictAction::DoNothing { .. } if !self.dialect.insert_ignore => {
				return Err(self.unsupported("insert ignoring duplicates"));
			}
			OnConflictAction::DoUpdate {
				conflict_columns, ..
			} if !self
				.dialect
				.supports_upsert(conflict_columns.as_ref().is_some_and(|c| !c.is_empty())) =>
			{
				return Err(self.unsupported("insert updating duplicates"));
			}
			_ => {}
		}

		match database_type {
			DatabaseType::Postgres => match &action {
				OnConflictAction::DoNothing { conflict_columns } => match conflict_columns {
					Some(cols) if !cols.is_empty() => {
						let cols_str = cols.iter().map(quote).collect::<Vec<_>>().join(", ");
						sql.push_str(&format!(" ON CONFLICT ({}) DO NOTHING", cols_str));
					}
					_ => sql.push_str(" ON CONFLICT DO NOTHING"),
				},
				OnConflictAction::DoUpdate {
					conflict_columns,
					update_columns,
				} => {
					let cols_str = conflict_columns
						.iter()
						.flatten()
						.map(quote)
						.collect::<Vec<_>>()
						.join(", ");
					let update_str = update_columns
						.iter()
						.map(|col| format!("{} = EXCLUDED.{}", quote(col), quote(col)))
						.collect::<Vec<_>>()
						.join(", ");

					sql.push_str(&format!(
						" ON CONFLICT ({}) DO UPDATE SET {}",
						cols_str, update_str
					));
				}
			},
			DatabaseType::Mysql => match &action {
				OnConflictAction::DoNothing { .. } => {
					sql = sql.replacen("INSERT", "INSERT IGNORE", 1);
				}
				OnConflictAction::DoUpdate { update_columns, .. } => {
					let update_str = update_columns
						.iter()
						.map(|col| format!("{} = VALUES({})", quote(col), quote(col)))
						.collect::<Vec<_>>()
						.join(", ");

					sql.push_str(&format!(" ON DUPLICATE KEY UPDATE {}", update_str));
				}
			},
			DatabaseType::Sqlite => match &action {
				OnConflictAction::DoNothing { .. } => {
					sql = sql.replacen("INSERT", "INSERT OR IGNORE", 1);
				}
				OnConflictAction::DoUpdate {
					conflict_columns,
					update_columns,
				} => {
					if sql.ends_with("DEFAULT VALUES") {
						return Err(self.unsupported("upsert combined with DEFAULT VALUES"));
					}
					// SQLite 3.35+ accepts a target-less DO UPDATE as the last clause
					let target = match conflict_columns {
						Some(cols) if !cols.is_empty() => format!(
							" ({})",
							cols.iter().map(quote).collect::<Vec<_>>().join(", ")
						),
						_ => String::new(),
					};
					let update_str = update_columns
						.iter()
						.map(|col| format!("{} = excluded.{}", quote(col), quote(col)))
						.collect::<Vec<_>>()
						.join(", ");

					sql.push_str(&format!(
						" ON CONFLICT{} DO UPDATE SET {}",
						target, update_str
					));
				}
			},
		}

		Ok(sql)
	}

	fn unsupported(&self, feature: &str) -> DatabaseError {
		DatabaseError::Unsupported {
			dialect: self.dialect.database_type.to_string(),
			feature: feature.to_string(),
		}
	}
}

fn render_insert(stmt: &InsertStatement, database_type: DatabaseType) -> String {
	match database_type {
		DatabaseType::Postgres => stmt.build(PostgresQueryBuilder).0,
		DatabaseType::Mysql => stmt.build(MysqlQueryBuilder).0,
		DatabaseType::Sqlite => stmt.build(SqliteQueryBuilder).0,
	}
}

fn render_insert_inline(stmt: &InsertStatement, database_type: DatabaseType) -> String {
	match database_type {
		DatabaseType::Postgres => stmt.to_string(PostgresQueryBuilder),
		DatabaseType::Mysql => stmt.to_string(MysqlQueryBuilder),
		DatabaseType::Sqlite => stmt.to_string(SqliteQueryBuilder),
	}
}

/// Unconditional DELETE builder
pub struct DeleteBuilder {
	database_type: DatabaseType,
	table: String,
}

impl DeleteBuilder {
	pub fn new(dialect: &Dialect, table: impl Into<String>) -> Self {
		Self {
			database_type: dialect.database_type,
			table: table.into(),
		}
	}

	pub fn build(&self) -> Statement {
		let stmt: DeleteStatement = Query::delete()
			.from_table(Alias::new(&self.table))
			.to_owned();

		let sql = match self.database_type {
			DatabaseType::Postgres => stmt.to_string(PostgresQueryBuilder),
			DatabaseType::Mysql => stmt.to_string(MysqlQueryBuilder),
			DatabaseType::Sqlite => stmt.to_string(SqliteQueryBuilder),
		};

		Statement::new(sql, Vec::new())
	}
}
