//! JSON adapter: an array of flat objects.

use serde_json::Value;

use crate::error::{FixtureError, FixtureResult};
use crate::fixtures::normalizer::{RawRecord, normalize_records};
use crate::fixtures::{TableData, value};

pub(crate) fn parse(content: &str, source_name: &str) -> FixtureResult<TableData> {
	let document: Value = serde_json::from_str(content)
		.map_err(|e| FixtureError::parse(source_name, format!("invalid JSON: {e}")))?;

	let Value::Array(items) = document else {
		return Err(FixtureError::parse(
			source_name,
			"top-level value must be an array of objects",
		));
	};

	let mut records = Vec::with_capacity(items.len());
	for (index, item) in items.iter().enumerate() {
		let Value::Object(object) = item else {
			return Err(FixtureError::parse(
				source_name,
				format!("record {index} is not an object"),
			));
		};
		let record = object
			.iter()
			.map(|(key, value)| {
				value::from_json(value, source_name, index, key).map(|v| (key.clone(), v))
			})
			.collect::<FixtureResult<RawRecord>>()?;
		records.push(record);
	}

	normalize_records(source_name, records)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_parse_json_keeps_key_order() {
		let content = r#"[
			{"name": "Excalibur", "id": 1},
			{"name": "Masamune", "id": 2.0}
		]"#;

		let data = parse(content, "item.json").unwrap();

		assert_eq!(data.columns(), &["name".to_string(), "id".to_string()]);
		assert_eq!(data.rows()[1]["id"], "2");
	}

	#[rstest]
	#[case("[]", "no records")]
	#[case(r#"{"id": 1}"#, "top-level value must be an array")]
	#[case("[1, 2]", "record 0 is not an object")]
	#[case(r#"[{"id": 1, "tags": ["a"]}]"#, "field 'tags'")]
	#[case("[{", "invalid JSON")]
	fn test_parse_json_errors(#[case] content: &str, #[case] expected: &str) {
		let error = parse(content, "item.json").unwrap_err();

		assert!(error.is_parse());
		assert!(
			error.to_string().contains(expected),
			"unexpected message: {error}"
		);
	}
}
