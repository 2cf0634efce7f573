//! Catalog service error types

use thiserror::Error;

use crate::db::DbError;
use crate::scan::ScanError;

/// Errors returned by catalog service operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required input was empty or out of range; storage was not touched
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Catalog store failure
    #[error(transparent)]
    Db(#[from] DbError),

    /// The repository could not be scanned
    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl CatalogError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
