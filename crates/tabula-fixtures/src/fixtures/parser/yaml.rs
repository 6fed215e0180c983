//! YAML adapter: a sequence of flat mappings.

use serde_yaml::Value;

use crate::error::{FixtureError, FixtureResult};
use crate::fixtures::normalizer::{RawRecord, normalize_records};
use crate::fixtures::{TableData, value};

pub(crate) fn parse(content: &str, source_name: &str) -> FixtureResult<TableData> {
	let document: Value = serde_yaml::from_str(content)
		.map_err(|e| FixtureError::parse(source_name, format!("invalid YAML: {e}")))?;

	let items = match document {
		Value::Sequence(items) => items,
		// An empty document decodes as null
		Value::Null => Vec::new(),
		_ => {
			return Err(FixtureError::parse(
				source_name,
				"top-level value must be a sequence of mappings",
			));
		}
	};

	let mut records = Vec::with_capacity(items.len());
	for (index, item) in items.iter().enumerate() {
		let Value::Mapping(mapping) = item else {
			return Err(FixtureError::parse(
				source_name,
				format!("record {index} is not a mapping"),
			));
		};
		let mut record: RawRecord = Vec::with_capacity(mapping.len());
		for (key, value) in mapping {
			let key = mapping_key(key, source_name, index)?;
			let value = value::from_yaml(value, source_name, index, &key)?;
			record.push((key, value));
		}
		records.push(record);
	}

	normalize_records(source_name, records)
}

fn mapping_key(key: &Value, source_name: &str, index: usize) -> FixtureResult<String> {
	match key {
		Value::String(s) => Ok(s.clone()),
		Value::Number(n) => Ok(n.to_string()),
		Value::Bool(b) => Ok(b.to_string()),
		_ => Err(FixtureError::parse(
			source_name,
			format!("record {index} has a non-scalar key"),
		)),
	}
}
