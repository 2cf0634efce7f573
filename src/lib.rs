//! kbmanager - a repository-scoped file catalog with tags
//!
//! Each repository keeps its catalog in an embedded SQLite database under
//! `.kbdatabase/KbInfo.db`. The scanner reconciles the working tree with the
//! catalog, and tags can be attached to, detached from and searched across the
//! catalogued files.
//!
//! ```no_run
//! use kbmanager::catalog::Catalog;
//!
//! let catalog = Catalog::for_repository("/path/to/repo");
//! let summary = catalog.reconcile()?;
//! println!("{} new files", summary.added);
//! catalog.attach_tag("notes/todo.md", "draft")?;
//! # Ok::<(), kbmanager::catalog::CatalogError>(())
//! ```

use thiserror::Error;

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod logging;
pub mod menu;
pub mod output;
pub mod scan;
pub mod vcs;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum KbError {
    /// Catalog store error
    #[error("Database error: {0}")]
    DbError(#[from] db::DbError),
    /// Catalog service error
    #[error("Catalog error: {0}")]
    CatalogError(#[from] catalog::CatalogError),
    /// Repository scan error
    #[error("Scan error: {0}")]
    ScanError(#[from] scan::ScanError),
    /// Version control error
    #[error("Version control error: {0}")]
    VcsError(#[from] vcs::VcsError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Interactive prompt error
    #[error("Prompt error: {0}")]
    PromptError(#[from] dialoguer::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
