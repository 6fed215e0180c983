//! sqlx-backed implementations of [`DatabaseBackend`](super::DatabaseBackend)

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;
