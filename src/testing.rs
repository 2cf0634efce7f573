//! Testing utilities for kbmanager
//!
//! This module provides helper types for writing tests, most importantly a
//! `TestRepo` wrapper that owns a temporary repository directory.
//!
//! Only available when compiled with `cfg(test)`.

use crate::catalog::Catalog;
use crate::db::Database;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary repository directory that is removed on drop
///
/// # Examples
/// ```ignore
/// let repo = TestRepo::new();
/// repo.write_file("sub/b.txt");
/// assert!(repo.path().join("sub/b.txt").exists());
/// ```
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create an empty repository in a fresh temporary directory
    ///
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temporary repository");
        Self { dir }
    }

    /// Root of the repository
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file with default content, creating parent directories
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn write_file(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.write_file_with_content(rel, b"test content")
    }

    /// Write a file with custom content, creating parent directories
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn write_file_with_content(&self, rel: impl AsRef<Path>, content: &[u8]) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Remove a file from the repository
    ///
    /// # Panics
    /// Panics if the file cannot be removed.
    pub fn remove_file(&self, rel: impl AsRef<Path>) {
        fs::remove_file(self.dir.path().join(rel)).expect("Failed to remove test file");
    }

    /// Catalog store handle for this repository
    #[must_use]
    pub fn db(&self) -> Database {
        Database::for_repository(self.path())
    }

    /// Catalog service for this repository
    #[must_use]
    pub fn catalog(&self) -> Catalog {
        Catalog::for_repository(self.path())
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_basic() {
        let repo = TestRepo::new();
        assert!(repo.path().is_dir());
        assert!(!repo.db().exists());
    }

    #[test]
    fn test_repo_cleanup() {
        let path = {
            let repo = TestRepo::new();
            repo.path().to_path_buf()
        };

        assert!(!path.exists());
    }

    #[test]
    fn test_write_nested_file() {
        let repo = TestRepo::new();
        let path = repo.write_file("a/b/c.txt");

        assert!(path.exists());
        assert_eq!(fs::read_to_string(path).unwrap(), "test content");
    }

    #[test]
    fn test_write_and_remove_file() {
        let repo = TestRepo::new();
        let path = repo.write_file_with_content("x.bin", b"custom");
        assert_eq!(fs::read(&path).unwrap(), b"custom");

        repo.remove_file("x.bin");
        assert!(!path.exists());
    }
}
