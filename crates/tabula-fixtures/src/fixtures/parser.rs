//! Fixture parsing.
//!
//! Dispatches raw fixture content to the adapter for its format. Every
//! adapter produces [`TableData`] whose rows hold exactly the declared
//! columns.

mod csv;
mod json;
#[cfg(feature = "yaml")]
mod yaml;

use std::path::Path;

use super::{FixtureFormat, TableData};
use crate::error::{FixtureError, FixtureResult};

/// Name used in parse errors for content that did not come from a file.
pub const MEMORY_SOURCE: &str = "<memory>";

/// Parser for fixture files.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureParser;

impl FixtureParser {
	pub fn new() -> Self {
		Self
	}

	/// Reads and parses a fixture file in the given format.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::Io`] if the file cannot be read and
	/// [`FixtureError::Parse`] if its content is not UTF-8, malformed or empty.
	pub fn parse_file(&self, path: &Path, format: FixtureFormat) -> FixtureResult<TableData> {
		let source_name = path.display().to_string();
		let bytes = std::fs::read(path).map_err(|source| FixtureError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let content = String::from_utf8(bytes).map_err(|e| {
			FixtureError::parse(
				&source_name,
				format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
			)
		})?;
		self.parse_str(&content, format, &source_name)
	}

	/// Parses fixture content held in memory.
	///
	/// `source_name` only labels error messages.
	///
	/// # Examples
	///
	/// ```
	/// use tabula_fixtures::fixtures::{FixtureFormat, FixtureParser};
	///
	/// let data = FixtureParser::new()
	///     .parse_str("id,name\n1,Excalibur\n", FixtureFormat::Csv, "item.csv")
	///     .unwrap();
	/// assert_eq!(data.columns(), ["id", "name"]);
	/// ```
	pub fn parse_str(
		&self,
		content: &str,
		format: FixtureFormat,
		source_name: &str,
	) -> FixtureResult<TableData> {
		match format {
			FixtureFormat::Csv | FixtureFormat::Tsv => {
				let delimiter = format.delimiter().unwrap_or(b',');
				csv::parse(content, delimiter, source_name)
			}
			FixtureFormat::Json => json::parse(content, source_name),
			FixtureFormat::Yaml => self.parse_yaml(content, source_name),
		}
	}

	#[cfg(feature = "yaml")]
	fn parse_yaml(&self, content: &str, source_name: &str) -> FixtureResult<TableData> {
		yaml::parse(content, source_name)
	}

	/// Stub for YAML parsing when the feature is not enabled.
	#[cfg(not(feature = "yaml"))]
	fn parse_yaml(&self, _content: &str, _source_name: &str) -> FixtureResult<TableData> {
		Err(FixtureError::Config(
			"YAML support requires the 'yaml' feature".to_string(),
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;
	use tempfile::NamedTempFile;

	const CSV: &str = "id,name\n1,Excalibur\n2,Masamune\n";
	const TSV: &str = "id\tname\n1\tExcalibur\n2\tMasamune\n";
	const JSON: &str = r#"[{"id": 1, "name": "Excalibur"}, {"id": 2, "name": "Masamune"}]"#;

	#[rstest]
	#[case(CSV, FixtureFormat::Csv)]
	#[case(TSV, FixtureFormat::Tsv)]
	#[case(JSON, FixtureFormat::Json)]
	fn test_formats_yield_same_rows(#[case] content: &str, #[case] format: FixtureFormat) {
		let expected = TableData::from_rows(
			["id", "name"],
			vec![vec!["1", "Excalibur"], vec!["2", "Masamune"]],
		)
		.unwrap();

		let data = FixtureParser::new()
			.parse_str(content, format, MEMORY_SOURCE)
			.unwrap();

		assert_eq!(data, expected);
	}

	#[cfg(feature = "yaml")]
	#[rstest]
	fn test_yaml_matches_csv() {
		let yaml = "- id: 1\n  name: Excalibur\n- id: 2\n  name: Masamune\n";
		let parser = FixtureParser::new();

		let from_yaml = parser.parse_str(yaml, FixtureFormat::Yaml, MEMORY_SOURCE).unwrap();
		let from_csv = parser.parse_str(CSV, FixtureFormat::Csv, MEMORY_SOURCE).unwrap();

		assert_eq!(from_yaml, from_csv);
	}

	#[rstest]
	fn test_parse_file_reads_content() {
		// Arrange
		let mut file = NamedTempFile::new().unwrap();
		file.write_all(CSV.as_bytes()).unwrap();

		// Act
		let data = FixtureParser::new()
			.parse_file(file.path(), FixtureFormat::Csv)
			.unwrap();

		// Assert
		assert_eq!(data.len(), 2);
	}

	#[rstest]
	fn test_parse_file_missing_is_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("item.csv");

		let error = FixtureParser::new()
			.parse_file(&path, FixtureFormat::Csv)
			.unwrap_err();

		assert!(matches!(error, FixtureError::Io { .. }));
	}

	#[rstest]
	fn test_parse_file_latin1_is_parse_error() {
		// Arrange
		let mut file = NamedTempFile::new().unwrap();
		file.write_all(b"id,name\n1,Caf\xe9\n").unwrap();

		// Act
		let error = FixtureParser::new()
			.parse_file(file.path(), FixtureFormat::Csv)
			.unwrap_err();

		// Assert
		assert!(error.is_parse());
		assert!(error.to_string().contains("invalid UTF-8 at byte 13"));
	}

	#[cfg(not(feature = "yaml"))]
	#[rstest]
	fn test_yaml_without_feature_is_config_error() {
		let error = FixtureParser::new()
			.parse_str("- id: 1\n", FixtureFormat::Yaml, MEMORY_SOURCE)
			.unwrap_err();

		assert!(error.is_config());
	}
}
