//! Delimited text (CSV/TSV) adapter.

use std::collections::HashSet;

use csv::{ErrorKind, ReaderBuilder, StringRecord};

use crate::error::{FixtureError, FixtureResult};
use crate::fixtures::TableData;

/// Parse delimited text with a mandatory header row.
///
/// A header without data rows yields an empty table. Ragged rows, duplicate
/// header names and a missing header are parse errors.
pub(crate) fn parse(content: &str, delimiter: u8, source_name: &str) -> FixtureResult<TableData> {
	let mut reader = ReaderBuilder::new()
		.delimiter(delimiter)
		.has_headers(true)
		.flexible(false)
		.from_reader(content.as_bytes());

	let header = reader
		.headers()
		.map_err(|e| csv_error(source_name, &e))?
		.clone();
	if header.is_empty() {
		return Err(FixtureError::parse(source_name, "missing header row"));
	}
	check_header(&header, source_name)?;

	let mut data = TableData::new(header.iter())
		.map_err(|e| FixtureError::parse(source_name, e.to_string()))?;
	for record in reader.records() {
		let record = record.map_err(|e| csv_error(source_name, &e))?;
		data.push_values(record.iter().collect::<Vec<&str>>())
			.map_err(|e| FixtureError::parse(source_name, e.to_string()))?;
	}

	Ok(data)
}

fn check_header(header: &StringRecord, source_name: &str) -> FixtureResult<()> {
	let mut seen = HashSet::with_capacity(header.len());
	for name in header.iter() {
		if name.is_empty() {
			return Err(FixtureError::parse(source_name, "header contains an empty column name"));
		}
		if !seen.insert(name) {
			return Err(FixtureError::parse(
				source_name,
				format!("duplicate column '{name}' in header"),
			));
		}
	}
	Ok(())
}

fn csv_error(source_name: &str, error: &csv::Error) -> FixtureError {
	let message = match error.kind() {
		ErrorKind::UnequalLengths {
			pos,
			expected_len,
			len,
		} => {
			let line = pos.as_ref().map(|p| p.line()).unwrap_or_default();
			format!("line {line}: expected {expected_len} fields, found {len}")
		}
		_ => error.to_string(),
	};
	FixtureError::parse(source_name, message)
}
