//! Uniform in-memory shape of a fixture.

use std::collections::HashMap;

use tabula_db::InsertValue;

use crate::error::{FixtureError, FixtureResult};

/// Ordered columns plus one mapping per row.
///
/// Every row holds exactly the keys listed in `columns`. Parsers and the
/// normalizer establish this; [`TableData::push_row`] enforces it for data
/// built by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableData {
	columns: Vec<String>,
	rows: Vec<HashMap<String, String>>,
}

impl TableData {
	/// Create an empty table with the given column order.
	///
	/// Column names must be unique.
	pub fn new<I, S>(columns: I) -> FixtureResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
		for (i, column) in columns.iter().enumerate() {
			if columns[..i].contains(column) {
				return Err(FixtureError::Config(format!(
					"duplicate column '{column}' in table data"
				)));
			}
		}
		Ok(Self {
			columns,
			rows: Vec::new(),
		})
	}

	/// Build a table from positional rows, as read from a delimited file.
	///
	/// # Examples
	///
	/// ```
	/// use tabula_fixtures::fixtures::TableData;
	///
	/// let data = TableData::from_rows(
	///     ["id", "name"],
	///     vec![vec!["1", "Excalibur"], vec!["2", "Masamune"]],
	/// )
	/// .unwrap();
	/// assert_eq!(data.len(), 2);
	/// assert_eq!(data.rows()[1]["name"], "Masamune");
	/// ```
	pub fn from_rows<C, S, R, V>(columns: C, rows: R) -> FixtureResult<Self>
	where
		C: IntoIterator<Item = S>,
		S: Into<String>,
		R: IntoIterator<Item = Vec<V>>,
		V: Into<String>,
	{
		let mut data = Self::new(columns)?;
		for row in rows {
			data.push_values(row)?;
		}
		Ok(data)
	}

	/// Append a row given as a mapping.
	///
	/// The mapping must contain exactly the declared columns. Use the
	/// normalizer for records whose key sets vary.
	pub fn push_row(&mut self, row: HashMap<String, String>) -> FixtureResult<()> {
		if row.len() != self.columns.len() || !self.columns.iter().all(|c| row.contains_key(c)) {
			return Err(FixtureError::Config(format!(
				"row {} does not match columns [{}]",
				self.rows.len(),
				self.columns.join(", ")
			)));
		}
		self.rows.push(row);
		Ok(())
	}

	/// Append a row given positionally in column order.
	pub fn push_values<V: Into<String>>(&mut self, values: Vec<V>) -> FixtureResult<()> {
		if values.len() != self.columns.len() {
			return Err(FixtureError::Config(format!(
				"row {} has {} values but {} columns are declared",
				self.rows.len(),
				values.len(),
				self.columns.len()
			)));
		}
		let row = self
			.columns
			.iter()
			.cloned()
			.zip(values.into_iter().map(Into::into))
			.collect();
		self.rows.push(row);
		Ok(())
	}

	pub(crate) fn push_row_unchecked(&mut self, row: HashMap<String, String>) {
		self.rows.push(row);
	}

	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	pub fn rows(&self) -> &[HashMap<String, String>] {
		&self.rows
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Sequence one row into column order, mapping empty strings to `DEFAULT`.
	pub fn row_values(&self, row: &HashMap<String, String>) -> Vec<InsertValue> {
		self.columns
			.iter()
			.map(|column| {
				row.get(column)
					.map(|value| InsertValue::from_field(value))
					.unwrap_or(InsertValue::Default)
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_new_rejects_duplicate_columns() {
		let result = TableData::new(["id", "name", "id"]);

		assert!(result.unwrap_err().is_config());
	}

	#[rstest]
	fn test_push_row_requires_exact_keys() {
		// Arrange
		let mut data = TableData::new(["id", "name"]).unwrap();
		let short = HashMap::from([("id".to_string(), "1".to_string())]);
		let extra = HashMap::from([
			("id".to_string(), "1".to_string()),
			("name".to_string(), "Excalibur".to_string()),
			("rank".to_string(), "S".to_string()),
		]);
		let exact = HashMap::from([
			("id".to_string(), "1".to_string()),
			("name".to_string(), "Excalibur".to_string()),
		]);

		// Act & Assert
		assert!(data.push_row(short).is_err());
		assert!(data.push_row(extra).is_err());
		assert!(data.push_row(exact).is_ok());
		assert_eq!(data.len(), 1);
	}

	#[rstest]
	fn test_row_values_follow_column_order() {
		let data = TableData::from_rows(["name", "id"], vec![vec!["Masamune", ""]]).unwrap();

		let values = data.row_values(&data.rows()[0]);

		assert_eq!(
			values,
			vec![InsertValue::Text("Masamune".to_string()), InsertValue::Default]
		);
	}

	#[rstest]
	fn test_push_values_length_mismatch() {
		let mut data = TableData::new(["id", "name"]).unwrap();

		let result = data.push_values(vec!["1"]);

		assert!(result.unwrap_err().is_config());
		assert!(data.is_empty());
	}
}
