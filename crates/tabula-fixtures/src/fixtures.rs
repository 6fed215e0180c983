//! Fixture system.
//!
//! - [`FixtureFormat`]: supported file formats
//! - [`FixtureParser`]: format adapters producing [`TableData`]
//! - [`LoaderOptions`], [`LoadOverrides`], [`resolve`]: layered configuration
//! - [`InsertionEngine`]: statement planning and execution
//! - [`FixtureLoader`]: the transactional entry point

mod format;
mod insertion;
mod loader;
mod normalizer;
mod options;
mod parser;
mod table_data;
mod value;

pub use format::FixtureFormat;
pub use insertion::{InsertBatch, InsertionEngine, InsertionPlan, InsertionSummary};
pub use loader::{FixtureLoader, FixtureSource, LoadResult};
pub use normalizer::{RawRecord, normalize_records};
pub use options::{
	DEFAULT_BULK_BATCH_SIZE, LoadOptions, LoadOverrides, LoaderOptions, infer_table, resolve,
};
pub use parser::{FixtureParser, MEMORY_SOURCE};
pub use table_data::TableData;
pub use value::FieldValue;
