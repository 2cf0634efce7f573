//! Catalog service
//!
//! Orchestrates the scanner and the catalog store for one repository:
//! reconciling the filesystem with the catalog, and validating user input
//! before tag and file operations reach storage.
//!
//! Every operation logs storage and scan failures with full detail before
//! returning them, so callers only need to report the outcome.

use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::db::{
    AddOutcome, AttachOutcome, CatalogPath, CreateOutcome, Database, DbError, DeleteOutcome,
    DetachOutcome, FileEntry, MAX_PATH_LEN, MAX_TAG_LEN, SearchOutcome,
};
use crate::scan::{PathScanner, ScanStats};

pub mod error;

pub use error::CatalogError;

type Result<T> = std::result::Result<T, CatalogError>;

/// Result of reconciling a repository with its catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// The catalog did not exist and was created by this run
    pub created: bool,
    /// Files newly added to the catalog
    pub added: usize,
    /// Scanned files that were already catalogued
    pub skipped: usize,
    /// Scanner counters for this run
    pub scan: ScanStats,
}

/// Result of removing catalog entries whose files are gone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneSummary {
    /// Paths that no longer exist under the repository root
    pub missing: Vec<String>,
    /// Whether the missing paths were actually deleted
    pub applied: bool,
}

/// Catalog of one repository
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
    db: Database,
    scanner: PathScanner,
}

impl Catalog {
    /// Catalog for the repository at `root` with the default exclusion policy
    pub fn for_repository<P: AsRef<Path>>(root: P) -> Self {
        Self::with_scanner(root, PathScanner::new())
    }

    /// Catalog for the repository at `root` scanned with a custom scanner
    pub fn with_scanner<P: AsRef<Path>>(root: P, scanner: PathScanner) -> Self {
        let root = root.as_ref().to_path_buf();
        let db = Database::for_repository(&root);
        Self { root, db, scanner }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Underlying catalog store
    #[must_use]
    pub const fn db(&self) -> &Database {
        &self.db
    }

    /// Scanner used by [`Catalog::reconcile`]
    #[must_use]
    pub const fn scanner(&self) -> &PathScanner {
        &self.scanner
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.db.exists()
    }

    /// Create the catalog if it does not exist yet
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Db` if the catalog cannot be created.
    pub fn create(&self) -> Result<CreateOutcome> {
        logged("create catalog", self.db.create().map_err(Into::into))
    }

    /// Scan the repository and add every file the catalog does not know yet
    ///
    /// Creates the catalog first when needed. Running it again without
    /// filesystem changes adds nothing.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Scan` if the repository root cannot be scanned,
    /// or `CatalogError::Db` if the catalog cannot be created or written. A
    /// failed ingestion leaves the catalog as it was.
    pub fn reconcile(&self) -> Result<ReconcileSummary> {
        logged("reconcile", self.reconcile_inner())
    }

    fn reconcile_inner(&self) -> Result<ReconcileSummary> {
        let mut scan = self.scanner.scan(&self.root)?;

        let created = if self.db.exists() {
            false
        } else {
            info!(root = %self.root.display(), "catalog not found, creating it first");
            self.db.create()? == CreateOutcome::Created
        };

        let paths: Vec<String> = scan.by_ref().collect();
        let stats = scan.stats();
        debug!(?stats, "scan finished");

        let batch = self.db.batch_add_files(&paths)?;
        info!(
            added = batch.added,
            skipped = batch.skipped,
            hidden = stats.hidden,
            reserved_dirs = stats.reserved_dirs,
            too_long = stats.too_long,
            errors = stats.errors,
            "reconciled repository"
        );

        Ok(ReconcileSummary {
            created,
            added: batch.added,
            skipped: batch.skipped,
            scan: stats,
        })
    }

    /// Add a single file path, given relative to the repository root
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for an empty, overlong, absolute or
    /// escaping path, or `CatalogError::Db` on storage failure.
    pub fn add_file(&self, file: &str) -> Result<AddOutcome> {
        let file = require_path(file)?;
        logged("add file", self.db.add_file(&file).map_err(Into::into))
    }

    /// List every file with its tags, in insertion order
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Db` if the catalog is missing or unreadable.
    pub fn list_files_with_tags(&self) -> Result<Vec<FileEntry>> {
        logged("list files", self.db.list_files_with_tags().map_err(Into::into))
    }

    /// Attach a tag to a catalogued file
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for an empty or overlong file or tag
    /// name, or `CatalogError::Db` on storage failure.
    pub fn attach_tag(&self, file: &str, tag: &str) -> Result<AttachOutcome> {
        let file = require_path(file)?;
        let tag = require("tag name", tag, MAX_TAG_LEN)?;
        logged("attach tag", self.db.attach_tag(&file, tag).map_err(Into::into))
    }

    /// Detach a tag from a catalogued file
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for an empty file or tag name, or
    /// `CatalogError::Db` on storage failure.
    pub fn detach_tag(&self, file: &str, tag: &str) -> Result<DetachOutcome> {
        let file = require_path(file)?;
        let tag = require("tag name", tag, MAX_TAG_LEN)?;
        logged("detach tag", self.db.detach_tag(&file, tag).map_err(Into::into))
    }

    /// Delete a file and its associations
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for an empty file name, or
    /// `CatalogError::Db` on storage failure.
    pub fn delete_file(&self, file: &str) -> Result<DeleteOutcome> {
        let file = require_path(file)?;
        logged("delete file", self.db.delete_file(&file).map_err(Into::into))
    }

    /// Find the files carrying a tag
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for an empty tag name, or
    /// `CatalogError::Db` on storage failure.
    pub fn search_by_tag(&self, tag: &str) -> Result<SearchOutcome> {
        let tag = require("tag name", tag, MAX_TAG_LEN)?;
        logged("search by tag", self.db.search_by_tag(tag).map_err(Into::into))
    }

    /// Every tag name, including tags no file uses any more
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Db` if the catalog is missing or unreadable.
    pub fn list_all_tags(&self) -> Result<Vec<String>> {
        logged("list tags", self.db.list_all_tags().map_err(Into::into))
    }

    /// Every tag with the number of files it labels
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Db` if the catalog is missing or unreadable.
    pub fn tag_usage(&self) -> Result<Vec<(String, usize)>> {
        logged("tag usage", self.db.tag_usage().map_err(Into::into))
    }

    /// Find catalogued files that no longer exist on disk and, unless
    /// `dry_run` is set, delete them (tags are kept)
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Db` if the catalog is missing or cannot be updated.
    pub fn prune_missing(&self, dry_run: bool) -> Result<PruneSummary> {
        logged("prune missing files", self.prune_inner(dry_run))
    }

    fn prune_inner(&self, dry_run: bool) -> Result<PruneSummary> {
        let missing: Vec<String> = self
            .db
            .list_paths()?
            .into_iter()
            .filter(|path| !self.root.join(path).exists())
            .collect();

        if !dry_run {
            for path in &missing {
                self.db.delete_file(path)?;
                debug!(path = %path, "pruned missing file");
            }
        }

        Ok(PruneSummary {
            missing,
            applied: !dry_run,
        })
    }
}

/// Trim `value` and check it is non-empty and at most `max` characters
fn require<'a>(field: &'static str, value: &'a str, max: usize) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        debug!(field, "rejected empty input");
        return Err(CatalogError::validation(field, "cannot be empty or whitespace"));
    }
    let len = trimmed.chars().count();
    if len > max {
        debug!(field, len, "rejected overlong input");
        return Err(CatalogError::validation(
            field,
            format!("is {len} characters long, the limit is {max}"),
        ));
    }
    Ok(trimmed)
}

/// Check a file path and bring it to the catalog's root-relative form
fn require_path(value: &str) -> Result<CatalogPath> {
    let value = require("file name", value, MAX_PATH_LEN)?;
    CatalogPath::parse(value).map_err(|e| {
        debug!(error = %e, "rejected file path");
        let reason = match e {
            DbError::InvalidInput(reason) => reason,
            other => other.to_string(),
        };
        CatalogError::validation("file name", reason)
    })
}

/// Log storage and scan failures at the operation boundary
fn logged<T>(operation: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result
        && !matches!(e, CatalogError::Validation { .. })
    {
        error!(operation, error = %e, details = ?e, "catalog operation failed");
    }
    result
}
