//! Catalog store for kbmanager
//!
//! Provides the persistent file/tag catalog of a single repository, kept in an
//! embedded SQLite database at `<repository>/.kbdatabase/KbInfo.db`.
//!
//! The catalog has three tables:
//! - `Files`: one row per distinct root-relative path
//! - `Tags`: one row per distinct tag name
//! - `FileTagRelations`: the many-to-many join, unique per (file, tag)
//!
//! Every operation opens its own connection and drops it before returning, so
//! no connection outlives a single call. Tags are never removed once created,
//! even when nothing references them any more.

use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub mod error;
pub mod schema;
pub mod types;

pub use error::DbError;
pub use types::{
    AddOutcome, AttachOutcome, BatchSummary, CatalogPath, CreateOutcome, DeleteOutcome,
    DetachOutcome, FileEntry, MAX_PATH_LEN, MAX_TAG_LEN, SearchOutcome,
};

/// Hidden directory under the repository root that holds the catalog
pub const CATALOG_DIR_NAME: &str = ".kbdatabase";

/// File name of the catalog database inside [`CATALOG_DIR_NAME`]
pub const CATALOG_FILE_NAME: &str = "KbInfo.db";

/// Handle to the catalog of one repository
///
/// Holding a `Database` does not keep the catalog open; it only remembers
/// where the catalog lives.
#[derive(Debug, Clone)]
pub struct Database {
    db_dir: PathBuf,
    db_path: PathBuf,
}

impl Database {
    /// Create a handle for the catalog of the repository at `repository_root`
    ///
    /// Nothing is touched on disk until [`Database::create`] or another
    /// operation is called.
    ///
    /// # Examples
    /// ```no_run
    /// use kbmanager::db::Database;
    /// let db = Database::for_repository("/path/to/repo");
    /// assert!(db.path().ends_with(".kbdatabase/KbInfo.db"));
    /// ```
    pub fn for_repository<P: AsRef<Path>>(repository_root: P) -> Self {
        let db_dir = repository_root.as_ref().join(CATALOG_DIR_NAME);
        let db_path = db_dir.join(CATALOG_FILE_NAME);
        Self { db_dir, db_path }
    }

    /// Path of the backing database file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Check whether the backing database file is present
    #[must_use]
    pub fn exists(&self) -> bool {
        self.db_path.is_file()
    }

    /// Create the catalog schema
    ///
    /// Returns `CreateOutcome::AlreadyExists` without touching the file when a
    /// catalog is already present.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the catalog directory or database cannot be created.
    pub fn create(&self) -> Result<CreateOutcome, DbError> {
        if self.exists() {
            debug!(path = %self.db_path.display(), "catalog already exists");
            return Ok(CreateOutcome::AlreadyExists);
        }

        fs::create_dir_all(&self.db_dir)?;
        let mut conn = Connection::open(&self.db_path)?;
        Self::prepare(&mut conn)?;

        info!(path = %self.db_path.display(), "created catalog");
        Ok(CreateOutcome::Created)
    }

    /// Add a single file path to the catalog
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the path does not fit the schema or a database
    /// operation fails.
    pub fn add_file(&self, path: &str) -> Result<AddOutcome, DbError> {
        if !self.exists() {
            return Ok(AddOutcome::NotInitialized);
        }
        let path = CatalogPath::parse(path)?;
        let conn = self.connect()?;

        if Self::file_id(&conn, &path)?.is_some() {
            return Ok(AddOutcome::Duplicate);
        }

        conn.execute("INSERT INTO Files (FileName) VALUES (?1)", params![&*path])?;
        debug!(%path, "added file");
        Ok(AddOutcome::Added)
    }

    /// Add many paths in one transaction, skipping those already catalogued
    ///
    /// All currently known paths are read once, the new ones are inserted, and
    /// the transaction commits as a whole: either every new row becomes
    /// visible or none does.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the catalog is missing or any database operation
    /// fails; nothing is written in that case.
    pub fn batch_add_files<I, S>(&self, paths: I) -> Result<BatchSummary, DbError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let mut known: HashSet<String> = {
            let mut stmt = tx.prepare("SELECT FileName FROM Files")?;
            stmt.query_map([], |row| row.get(0))?
                .collect::<Result<_, _>>()?
        };

        let mut summary = BatchSummary::default();
        {
            let mut insert = tx.prepare("INSERT INTO Files (FileName) VALUES (?1)")?;
            for raw in paths {
                let path = match CatalogPath::parse(raw.as_ref()) {
                    Ok(path) => path,
                    Err(e) => {
                        warn!(path = raw.as_ref(), error = %e, "skipping path");
                        summary.skipped += 1;
                        continue;
                    }
                };
                if known.contains(&*path) {
                    summary.skipped += 1;
                    continue;
                }
                insert.execute(params![&*path])?;
                known.insert(path.into_string());
                summary.added += 1;
            }
        }

        tx.commit()?;
        debug!(added = summary.added, skipped = summary.skipped, "batch ingestion committed");
        Ok(summary)
    }

    /// List every file with its tags, in insertion order
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the catalog is missing or the query fails.
    pub fn list_files_with_tags(&self) -> Result<Vec<FileEntry>, DbError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT f.Id, f.FileName, t.TagName
             FROM Files f
             LEFT JOIN FileTagRelations r ON r.FileId = f.Id
             LEFT JOIN Tags t ON t.Id = r.TagId
             ORDER BY f.Id, r.rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;

        let mut entries: Vec<FileEntry> = Vec::new();
        for row in rows {
            let (id, path, tag) = row?;
            match entries.last_mut() {
                Some(last) if last.id == id => last.tags.extend(tag),
                _ => entries.push(FileEntry {
                    id,
                    path,
                    tags: tag.into_iter().collect(),
                }),
            }
        }
        Ok(entries)
    }

    /// Get the tags of one file
    ///
    /// # Returns
    /// * `Some(tags)` if the file is catalogued (possibly with no tags)
    /// * `None` if the file is not found
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the catalog is missing or the query fails.
    pub fn tags_for(&self, path: &str) -> Result<Option<Vec<String>>, DbError> {
        let path = CatalogPath::parse(path)?;
        let conn = self.connect()?;
        let Some(file_id) = Self::file_id(&conn, &path)? else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT t.TagName FROM FileTagRelations r
             JOIN Tags t ON t.Id = r.TagId
             WHERE r.FileId = ?1
             ORDER BY r.rowid",
        )?;
        let tags: Vec<String> = stmt
            .query_map(params![file_id], |row| row.get(0))?
            .collect::<Result<_, _>>()?;
        Ok(Some(tags))
    }

    /// Attach a tag to a file, creating the tag on first use
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the tag name does not fit the schema, the catalog
    /// is missing, or a database operation fails.
    pub fn attach_tag(&self, path: &str, tag: &str) -> Result<AttachOutcome, DbError> {
        check_tag(tag)?;
        let path = CatalogPath::parse(path)?;
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let Some(file_id) = Self::file_id(&tx, &path)? else {
            return Ok(AttachOutcome::FileNotFound);
        };

        if let Some(tag_id) = Self::tag_id(&tx, tag)?
            && Self::has_relation(&tx, file_id, tag_id)?
        {
            return Ok(AttachOutcome::TagAlreadyAttached);
        }

        tx.execute("INSERT OR IGNORE INTO Tags (TagName) VALUES (?1)", params![tag])?;
        let tag_id: i64 = tx.query_row(
            "SELECT Id FROM Tags WHERE TagName = ?1",
            params![tag],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO FileTagRelations (FileId, TagId) VALUES (?1, ?2)",
            params![file_id, tag_id],
        )?;
        tx.commit()?;

        debug!(%path, tag, "attached tag");
        Ok(AttachOutcome::Attached)
    }

    /// Detach a tag from a file; the tag itself is kept
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the catalog is missing or a database operation fails.
    pub fn detach_tag(&self, path: &str, tag: &str) -> Result<DetachOutcome, DbError> {
        let path = CatalogPath::parse(path)?;
        let conn = self.connect()?;

        let Some(file_id) = Self::file_id(&conn, &path)? else {
            return Ok(DetachOutcome::FileNotFound);
        };

        let removed = conn.execute(
            "DELETE FROM FileTagRelations
             WHERE FileId = ?1 AND TagId = (SELECT Id FROM Tags WHERE TagName = ?2)",
            params![file_id, tag],
        )?;

        if removed == 0 {
            return Ok(DetachOutcome::AssociationNotFound);
        }
        debug!(%path, tag, "detached tag");
        Ok(DetachOutcome::Detached)
    }

    /// Remove a file and all of its associations; tags are left intact
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the catalog is missing or a database operation fails.
    pub fn delete_file(&self, path: &str) -> Result<DeleteOutcome, DbError> {
        let path = CatalogPath::parse(path)?;
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let Some(file_id) = Self::file_id(&tx, &path)? else {
            return Ok(DeleteOutcome::FileNotFound);
        };

        tx.execute("DELETE FROM FileTagRelations WHERE FileId = ?1", params![file_id])?;
        tx.execute("DELETE FROM Files WHERE Id = ?1", params![file_id])?;
        tx.commit()?;

        debug!(%path, "deleted file");
        Ok(DeleteOutcome::Deleted)
    }

    /// Find all files carrying a tag, in file insertion order
    ///
    /// A tag that exists but labels nothing yields `Found` with an empty list.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the catalog is missing or the query fails.
    pub fn search_by_tag(&self, tag: &str) -> Result<SearchOutcome, DbError> {
        let conn = self.connect()?;

        let Some(tag_id) = Self::tag_id(&conn, tag)? else {
            return Ok(SearchOutcome::TagNotFound);
        };

        let mut stmt = conn.prepare(
            "SELECT f.FileName FROM FileTagRelations r
             JOIN Files f ON f.Id = r.FileId
             WHERE r.TagId = ?1
             ORDER BY f.Id",
        )?;
        let files: Vec<String> = stmt
            .query_map(params![tag_id], |row| row.get(0))?
            .collect::<Result<_, _>>()?;
        Ok(SearchOutcome::Found(files))
    }

    /// Get every tag name, in creation order
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the catalog is missing or the query fails.
    pub fn list_all_tags(&self) -> Result<Vec<String>, DbError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT TagName FROM Tags ORDER BY Id")?;
        let tags: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;
        Ok(tags)
    }

    /// Get every tag with the number of files it labels, in creation order
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the catalog is missing or the query fails.
    pub fn tag_usage(&self) -> Result<Vec<(String, usize)>, DbError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT t.TagName, COUNT(r.FileId)
             FROM Tags t
             LEFT JOIN FileTagRelations r ON r.TagId = t.Id
             GROUP BY t.Id
             ORDER BY t.Id",
        )?;
        let usage: Vec<(String, usize)> = stmt
            .query_map([], |row| {
                let count: i64 = row.get(1)?;
                Ok((row.get(0)?, usize::try_from(count).unwrap_or_default()))
            })?
            .collect::<Result<_, _>>()?;
        Ok(usage)
    }

    /// Get every catalogued path, in insertion order
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the catalog is missing or the query fails.
    pub fn list_paths(&self) -> Result<Vec<String>, DbError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT FileName FROM Files ORDER BY Id")?;
        let paths: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;
        Ok(paths)
    }

    /// Get the number of catalogued files
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the catalog is missing or the query fails.
    pub fn count_files(&self) -> Result<usize, DbError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM Files", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    // Connection and lookup helpers

    /// Open a connection to an existing catalog and bring its schema up to date
    fn connect(&self) -> Result<Connection, DbError> {
        if !self.exists() {
            return Err(DbError::NotInitialized(self.db_path.clone()));
        }
        let mut conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Self::prepare(&mut conn)?;
        Ok(conn)
    }

    fn prepare(conn: &mut Connection) -> Result<(), DbError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::migrate(conn)
    }

    fn file_id(conn: &Connection, path: &str) -> Result<Option<i64>, DbError> {
        Ok(conn
            .query_row(
                "SELECT Id FROM Files WHERE FileName = ?1",
                params![path],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn tag_id(conn: &Connection, tag: &str) -> Result<Option<i64>, DbError> {
        Ok(conn
            .query_row(
                "SELECT Id FROM Tags WHERE TagName = ?1",
                params![tag],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn has_relation(conn: &Connection, file_id: i64, tag_id: i64) -> Result<bool, DbError> {
        Ok(conn
            .query_row(
                "SELECT 1 FROM FileTagRelations WHERE FileId = ?1 AND TagId = ?2",
                params![file_id, tag_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some())
    }
}

fn check_tag(tag: &str) -> Result<(), DbError> {
    let len = tag.chars().count();
    if len == 0 || len > MAX_TAG_LEN {
        return Err(DbError::InvalidInput(format!(
            "Tag name must be 1 to {MAX_TAG_LEN} characters, got {len}"
        )));
    }
    Ok(())
}
