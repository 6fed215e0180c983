//! Fixture format definitions.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported fixture file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureFormat {
	/// Comma separated values with a header row.
	Csv,
	/// Tab separated values with a header row.
	Tsv,
	/// JSON array of flat objects.
	Json,
	/// YAML sequence of flat mappings (requires `yaml` feature).
	Yaml,
}

impl FixtureFormat {
	/// Determines the fixture format from its name or file extension.
	///
	/// Matching is case sensitive: extensions are taken as given.
	///
	/// # Example
	///
	/// ```
	/// # use tabula_fixtures::fixtures::FixtureFormat;
	/// assert_eq!(FixtureFormat::from_name("csv"), Some(FixtureFormat::Csv));
	/// assert_eq!(FixtureFormat::from_name("yml"), Some(FixtureFormat::Yaml));
	/// assert_eq!(FixtureFormat::from_name("CSV"), None);
	/// assert_eq!(FixtureFormat::from_name("xml"), None);
	/// ```
	pub fn from_name(name: &str) -> Option<Self> {
		match name {
			"csv" => Some(Self::Csv),
			"tsv" => Some(Self::Tsv),
			"json" => Some(Self::Json),
			"yaml" | "yml" => Some(Self::Yaml),
			_ => None,
		}
	}

	/// Returns the final extension of a path, if any.
	pub fn extension_of(path: &Path) -> Option<&str> {
		path.extension().and_then(|ext| ext.to_str())
	}

	/// Determines the fixture format from a file path's final extension.
	pub fn from_path(path: &Path) -> Option<Self> {
		Self::extension_of(path).and_then(Self::from_name)
	}

	/// Field delimiter for the delimited formats.
	pub fn delimiter(&self) -> Option<u8> {
		match self {
			Self::Csv => Some(b','),
			Self::Tsv => Some(b'\t'),
			Self::Json | Self::Yaml => None,
		}
	}
}

impl std::fmt::Display for FixtureFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Csv => write!(f, "CSV"),
			Self::Tsv => write!(f, "TSV"),
			Self::Json => write!(f, "JSON"),
			Self::Yaml => write!(f, "YAML"),
		}
	}
}
