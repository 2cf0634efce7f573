//! Value types shared by the catalog store and its callers
//!
//! This module provides the normalized path wrapper used as the catalog's file
//! identity, and the outcome enums returned by each store operation.
//!
//! # Types
//!
//! - **`CatalogPath`**: A root-relative, `/`-separated, trimmed UTF-8 path that fits the schema
//! - **`FileEntry`**: A file row together with its tag names
//! - **`BatchSummary`**: Counts reported by a batch ingestion
//! - Outcome enums (`CreateOutcome`, `AddOutcome`, ...): expected results that callers branch on
//!
//! # Examples
//!
//! ```
//! use kbmanager::db::types::CatalogPath;
//! use std::path::Path;
//!
//! let path = CatalogPath::from_relative(Path::new("docs/notes.md")).unwrap();
//! assert_eq!(&*path, "docs/notes.md");
//! ```

use super::error::DbError;
use std::path::{Component, Path};

/// Maximum length, in characters, of a stored file path
pub const MAX_PATH_LEN: usize = 500;

/// Maximum length, in characters, of a tag name
pub const MAX_TAG_LEN: usize = 100;

/// Wrapper for a root-relative path in the catalog's canonical string form
///
/// Components are joined with `/` regardless of the host separator and the
/// result is trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogPath(String);

impl CatalogPath {
    /// Build a catalog path from a path relative to the repository root
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidInput` if the path contains non UTF-8 components,
    /// escapes the root, is empty, or is longer than [`MAX_PATH_LEN`].
    pub fn from_relative(path: &Path) -> Result<Self, DbError> {
        let joined = join_relative(path).ok_or_else(|| {
            DbError::InvalidInput(format!(
                "Not a UTF-8 path inside the repository: {}",
                path.display()
            ))
        })?;
        Self::new(joined)
    }

    /// Parse a path as a user or caller wrote it
    ///
    /// The input is trimmed, `\` also separates segments on Windows, and
    /// `.` and empty segments are dropped, so `./docs//a.md` and `docs/a.md`
    /// name the same file.
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidInput` for absolute paths, `..` segments, or a
    /// result that is empty or longer than [`MAX_PATH_LEN`].
    pub fn parse(raw: &str) -> Result<Self, DbError> {
        let trimmed = raw.trim();
        let unified = if cfg!(windows) {
            trimmed.replace('\\', "/")
        } else {
            trimmed.to_string()
        };
        let path = Path::new(&unified);
        if path.has_root() {
            return Err(DbError::InvalidInput(format!(
                "Path must be relative to the repository: {trimmed}"
            )));
        }
        Self::from_relative(path)
    }

    /// Wrap an already `/`-separated path string
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidInput` if the trimmed string is empty or longer
    /// than [`MAX_PATH_LEN`].
    pub fn new(path: impl AsRef<str>) -> Result<Self, DbError> {
        let trimmed = path.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DbError::InvalidInput("Path is empty".into()));
        }
        let len = trimmed.chars().count();
        if len > MAX_PATH_LEN {
            return Err(DbError::InvalidInput(format!(
                "Path is {len} characters long, the limit is {MAX_PATH_LEN}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Join the components of a relative path with `/`
///
/// Returns `None` if a component is not valid UTF-8 or the path is not
/// relative (root, prefix or `..` components).
pub(crate) fn join_relative(path: &Path) -> Option<String> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(segments.join("/"))
}

impl AsRef<str> for CatalogPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for CatalogPath {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for CatalogPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file row with the names of its tags, in attach order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub id: i64,
    pub path: String,
    pub tags: Vec<String>,
}

/// Result of a batch ingestion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Rows inserted by this batch
    pub added: usize,
    /// Input paths already present (or repeated within the batch, or unusable)
    pub skipped: usize,
}

/// Result of creating the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Result of adding a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Duplicate,
    NotInitialized,
}

/// Result of attaching a tag to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    Attached,
    FileNotFound,
    TagAlreadyAttached,
}

/// Result of detaching a tag from a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachOutcome {
    Detached,
    FileNotFound,
    AssociationNotFound,
}

/// Result of deleting a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    FileNotFound,
}

/// Result of a tag search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The tag exists; the files carrying it (possibly none)
    Found(Vec<String>),
    TagNotFound,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
