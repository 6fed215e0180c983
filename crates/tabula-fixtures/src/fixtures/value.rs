//! Scalar field values decoded from JSON and YAML fixtures.
//!
//! Structured formats hand us typed scalars; the insertion layer only deals in
//! text. [`FieldValue::canonicalize`] is the single place where that
//! conversion happens.

use crate::error::{FixtureError, FixtureResult};

/// A flat scalar taken from a fixture record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
	String(String),
	Integer(i128),
	Float(f64),
	Bool(bool),
	Null,
}

impl FieldValue {
	/// Render the value in the text form handed to the database.
	///
	/// Null renders as the empty string, which the insertion layer turns into
	/// `DEFAULT`.
	///
	/// # Examples
	///
	/// ```
	/// use tabula_fixtures::fixtures::FieldValue;
	///
	/// assert_eq!(FieldValue::Integer(5).canonicalize(), "5");
	/// assert_eq!(FieldValue::Float(5.0).canonicalize(), "5");
	/// assert_eq!(FieldValue::Float(1.5).canonicalize(), "1.5");
	/// assert_eq!(FieldValue::Bool(true).canonicalize(), "true");
	/// assert_eq!(FieldValue::Null.canonicalize(), "");
	/// ```
	pub fn canonicalize(&self) -> String {
		match self {
			Self::String(s) => s.clone(),
			Self::Integer(i) => i.to_string(),
			Self::Float(f) => canonical_float(*f),
			Self::Bool(b) => b.to_string(),
			Self::Null => String::new(),
		}
	}
}

fn canonical_float(value: f64) -> String {
	// 2^127 bounds what i128 can hold exactly
	if value.is_finite() && value.fract() == 0.0 && value.abs() < 1.7e38 {
		(value as i128).to_string()
	} else {
		value.to_string()
	}
}

/// Reject a nested value found under `key` in record `index`.
pub(crate) fn nested_value_error(
	source_name: &str,
	index: usize,
	key: &str,
	kind: &str,
) -> FixtureError {
	FixtureError::parse(
		source_name,
		format!("record {index}: field '{key}' holds a nested {kind}; only flat records are supported"),
	)
}

/// Convert a decoded JSON value into a [`FieldValue`].
pub(crate) fn from_json(
	value: &serde_json::Value,
	source_name: &str,
	index: usize,
	key: &str,
) -> FixtureResult<FieldValue> {
	use serde_json::Value;

	match value {
		Value::Null => Ok(FieldValue::Null),
		Value::Bool(b) => Ok(FieldValue::Bool(*b)),
		Value::String(s) => Ok(FieldValue::String(s.clone())),
		Value::Number(n) => {
			if let Some(i) = n.as_i64() {
				Ok(FieldValue::Integer(i128::from(i)))
			} else if let Some(u) = n.as_u64() {
				Ok(FieldValue::Integer(i128::from(u)))
			} else if let Some(f) = n.as_f64() {
				Ok(FieldValue::Float(f))
			} else {
				Err(FixtureError::parse(
					source_name,
					format!("record {index}: field '{key}' holds an unrepresentable number"),
				))
			}
		}
		Value::Array(_) => Err(nested_value_error(source_name, index, key, "array")),
		Value::Object(_) => Err(nested_value_error(source_name, index, key, "object")),
	}
}

/// Convert a decoded YAML value into a [`FieldValue`].
#[cfg(feature = "yaml")]
pub(crate) fn from_yaml(
	value: &serde_yaml::Value,
	source_name: &str,
	index: usize,
	key: &str,
) -> FixtureResult<FieldValue> {
	use serde_yaml::Value;

	match value {
		Value::Null => Ok(FieldValue::Null),
		Value::Bool(b) => Ok(FieldValue::Bool(*b)),
		Value::String(s) => Ok(FieldValue::String(s.clone())),
		Value::Number(n) => {
			if let Some(i) = n.as_i64() {
				Ok(FieldValue::Integer(i128::from(i)))
			} else if let Some(u) = n.as_u64() {
				Ok(FieldValue::Integer(i128::from(u)))
			} else if let Some(f) = n.as_f64() {
				Ok(FieldValue::Float(f))
			} else {
				Err(FixtureError::parse(
					source_name,
					format!("record {index}: field '{key}' holds an unrepresentable number"),
				))
			}
		}
		Value::Sequence(_) => Err(nested_value_error(source_name, index, key, "sequence")),
		Value::Mapping(_) => Err(nested_value_error(source_name, index, key, "mapping")),
		Value::Tagged(_) => Err(nested_value_error(source_name, index, key, "tagged value")),
	}
}
