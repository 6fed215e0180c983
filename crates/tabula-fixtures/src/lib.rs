//! Test fixture loading for relational databases.
//!
//! Reads CSV, TSV, JSON and YAML fixture files into a uniform [`TableData`]
//! shape and inserts them into one table per file, inside a single
//! transaction per call.
//!
//! # Features
//!
//! - `yaml` - YAML fixture support (enabled by default)
//!
//! # Quick Start
//!
//! Create a fixture file (`fixtures/item.csv`):
//!
//! ```text
//! id,name
//! 1,Excalibur
//! 2,Masamune
//! ```
//!
//! Load it:
//!
//! ```ignore
//! use std::sync::Arc;
//! use tabula_db::backends::SqliteBackend;
//! use tabula_fixtures::prelude::*;
//!
//! let backend = Arc::new(SqliteBackend::connect("sqlite://test.db").await?);
//! let loader = FixtureLoader::new(backend);
//!
//! let result = loader
//!     .load_file("fixtures/item.csv", &LoadOverrides::new().delete(true))
//!     .await?;
//! println!("Loaded {} rows into {}", result.rows_loaded, result.table);
//! ```
//!
//! The table name comes from the leading identifier characters of the file
//! name and the format from its extension; both can be overridden per call.
//!
//! # Conflict handling
//!
//! - default: a duplicate key fails the load and nothing is kept
//! - `ignore`: duplicates are skipped by the database
//! - `update`: duplicates have their non-key columns overwritten
//!
//! Both modes use the driver's native syntax and are rejected with
//! [`FixtureError::Config`] on drivers that lack it.
//!
//! # Empty values
//!
//! An empty field (or a JSON/YAML `null`) is inserted as `DEFAULT`, so
//! auto-increment keys and column defaults apply.

#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod fixtures;
pub mod prelude;

#[cfg(test)]
mod test_support;

pub use error::{FixtureError, FixtureResult, InsertPhase};
pub use fixtures::{
	FixtureFormat, FixtureLoader, FixtureParser, FixtureSource, LoadOverrides, LoadResult,
	LoaderOptions, TableData,
};
