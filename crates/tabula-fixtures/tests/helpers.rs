//! Test helpers for tabula-fixtures integration tests.

#[path = "helpers/database.rs"]
pub mod database;
