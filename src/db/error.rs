//! Catalog store error types
//!
//! Only genuine failures live here. Expected outcomes of a catalog operation
//! (duplicate path, missing file row, tag already attached, ...) are modelled
//! as outcome enums in [`super::types`] and never surface as `DbError`.
//!
//! # Error Types
//!
//! - **`SqliteError`**: Errors from the embedded SQLite engine (storage failures)
//! - **`IoError`**: Failures creating the catalog directory
//! - **`NotInitialized`**: The catalog database file has not been created yet
//! - **`InvalidInput`**: A value violates a schema limit (e.g. path length)
//! - **`UnsupportedVersion`**: The stored schema version cannot be migrated

use std::path::PathBuf;
use thiserror::Error;

/// Catalog store errors
#[derive(Debug, Error)]
pub enum DbError {
    /// Represents an error raised by SQLite
    #[error("Database error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// Represents an I/O error while preparing the catalog directory
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The catalog file does not exist yet
    #[error("Catalog not initialized at {}", .0.display())]
    NotInitialized(PathBuf),

    /// Invalid input provided (e.g., path longer than the schema allows)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The catalog reports a schema version no migration starts from
    #[error("Unsupported catalog schema version {0}")]
    UnsupportedVersion(i64),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
