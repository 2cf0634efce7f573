//! Catalog schema and migrations
//!
//! The schema version is tracked in SQLite's `user_version` pragma. Each entry
//! of [`MIGRATIONS`] moves the catalog one version forward and is applied at
//! most once, inside a single transaction together with the version bump.

use rusqlite::Connection;
use tracing::debug;

use super::error::DbError;

/// Ordered schema migrations; index `i` upgrades version `i` to `i + 1`
pub const MIGRATIONS: &[&str] = &[
    // v1: files, tags and the join table
    "CREATE TABLE IF NOT EXISTS Files (
        Id INTEGER PRIMARY KEY AUTOINCREMENT,
        FileName TEXT NOT NULL UNIQUE CHECK (length(FileName) BETWEEN 1 AND 500)
    );

    CREATE TABLE IF NOT EXISTS Tags (
        Id INTEGER PRIMARY KEY AUTOINCREMENT,
        TagName TEXT NOT NULL UNIQUE CHECK (length(TagName) BETWEEN 1 AND 100)
    );

    CREATE TABLE IF NOT EXISTS FileTagRelations (
        FileId INTEGER NOT NULL REFERENCES Files(Id) ON DELETE CASCADE,
        TagId INTEGER NOT NULL REFERENCES Tags(Id) ON DELETE CASCADE,
        PRIMARY KEY (FileId, TagId)
    );",
    // v2: reverse lookup for searches by tag
    "CREATE INDEX IF NOT EXISTS IX_FileTagRelations_TagId ON FileTagRelations(TagId);",
];

/// Schema version a fully migrated catalog reports
#[must_use]
pub const fn current_version() -> i64 {
    MIGRATIONS.len() as i64
}

/// Read the schema version stored in the catalog
///
/// # Errors
///
/// Returns `DbError` if the pragma cannot be read.
pub fn version(conn: &Connection) -> Result<i64, DbError> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

/// Bring the catalog schema up to [`current_version`]
///
/// # Errors
///
/// Returns `DbError::UnsupportedVersion` for a negative stored version, or
/// another `DbError` if a migration fails; the catalog is left at its
/// previous version in both cases.
pub fn migrate(conn: &mut Connection) -> Result<(), DbError> {
    let from = version(conn)?;
    let target = current_version();
    if from >= target {
        return Ok(());
    }

    let applied = usize::try_from(from).map_err(|_| DbError::UnsupportedVersion(from))?;

    let tx = conn.transaction()?;
    for (index, sql) in MIGRATIONS.iter().enumerate().skip(applied) {
        debug!(version = index + 1, "applying catalog migration");
        tx.execute_batch(sql)?;
    }
    tx.pragma_update(None, "user_version", target)?;
    tx.commit()?;

    Ok(())
}
