//! Database boundary for the tabula fixture loader.
//!
//! The loader core never talks to a driver directly. It asks a
//! [`DatabaseBackend`](backends::DatabaseBackend) for a transaction, builds
//! statements for the backend's [`Dialect`](backends::Dialect), and executes
//! them through a [`TransactionScope`](backends::TransactionScope).

pub mod backends;

pub use backends::{
	DatabaseBackend, DatabaseError, DatabaseType, Dialect, InsertValue, Statement,
	TransactionExecutor, TransactionScope,
};
