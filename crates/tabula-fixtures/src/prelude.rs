//! Convenience re-exports for common usage.
//!
//! ```ignore
//! use tabula_fixtures::prelude::*;
//! ```

// Error types
pub use crate::error::{FixtureError, FixtureResult, InsertPhase};

// Fixture types
pub use crate::fixtures::{
	FieldValue, FixtureFormat, FixtureLoader, FixtureParser, FixtureSource, LoadOptions,
	LoadOverrides, LoadResult, LoaderOptions, TableData,
};
