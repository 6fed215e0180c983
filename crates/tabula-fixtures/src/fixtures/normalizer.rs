//! Reconcile heterogeneous records against one column list.
//!
//! Structured fixtures may give each record its own key set. The columns are
//! taken from the first record, in its declaration order. Later records are
//! fitted to them: a missing key becomes the empty string (inserted as
//! `DEFAULT`) and a key the first record did not declare is dropped.
//!
//! Dropping keys that only appear in later records is long-standing loader
//! behavior that existing fixtures rely on. Declare every column in the first
//! record, with `null` where it has no value, to load such fields.

use std::collections::HashMap;

use super::{table_data::TableData, value::FieldValue};
use crate::error::{FixtureError, FixtureResult};

/// One decoded record with keys in declaration order.
pub type RawRecord = Vec<(String, FieldValue)>;

/// Build [`TableData`] from decoded records.
///
/// Fails with a parse error when there are no records or the first record has
/// no fields.
pub fn normalize_records(source_name: &str, records: Vec<RawRecord>) -> FixtureResult<TableData> {
	let Some(first) = records.first() else {
		return Err(FixtureError::parse(source_name, "fixture contains no records"));
	};
	if first.is_empty() {
		return Err(FixtureError::parse(source_name, "first record has no fields"));
	}

	let columns: Vec<String> = first.iter().map(|(key, _)| key.clone()).collect();
	let mut data = TableData::new(columns.clone())
		.map_err(|e| FixtureError::parse(source_name, e.to_string()))?;

	let mut dropped = 0usize;
	for record in records {
		let mut values: HashMap<String, FieldValue> = HashMap::with_capacity(record.len());
		for (key, value) in record {
			if columns.contains(&key) {
				values.insert(key, value);
			} else {
				dropped += 1;
			}
		}
		let row = columns
			.iter()
			.map(|column| {
				let text = values
					.get(column)
					.map(FieldValue::canonicalize)
					.unwrap_or_default();
				(column.clone(), text)
			})
			.collect();
		data.push_row_unchecked(row);
	}

	if dropped > 0 {
		tracing::debug!(
			source = source_name,
			dropped,
			"Dropped fields not declared by the first record"
		);
	}

	Ok(data)
}
