//! Repository scanner
//!
//! Walks a repository tree and yields the root-relative paths of the files that
//! belong in the catalog:
//!
//! - directories with a reserved name (`.git`, `.kbdatabase`, plus any extra
//!   names configured) are pruned at any depth, compared case-insensitively
//! - hidden files are skipped: the hidden/system attribute on Windows, a
//!   leading `.` in the file name elsewhere
//! - paths longer than [`MAX_PATH_LEN`] characters are skipped with a warning
//! - unreadable subtrees are logged and skipped; the scan continues
//!
//! Yielded paths use `/` as the only separator and are trimmed. The walk is
//! sorted by file name, so two scans of an unchanged tree yield the same
//! sequence.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::db::{CATALOG_DIR_NAME, CatalogPath, MAX_PATH_LEN, types::join_relative};

pub mod error;

pub use error::ScanError;

/// Name of the version control metadata directory
pub const VCS_DIR_NAME: &str = ".git";

/// Counters collected while a scan runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Paths yielded
    pub files: usize,
    /// Hidden or system files skipped
    pub hidden: usize,
    /// Reserved directories pruned
    pub reserved_dirs: usize,
    /// Paths skipped for exceeding the length limit
    pub too_long: usize,
    /// Paths skipped because they cannot be represented (e.g. non UTF-8)
    pub unrepresentable: usize,
    /// Entries that could not be read
    pub errors: usize,
}

/// Walks repository trees according to an exclusion policy
#[derive(Debug, Clone)]
pub struct PathScanner {
    reserved: Vec<String>,
}

impl Default for PathScanner {
    fn default() -> Self {
        Self {
            reserved: vec![VCS_DIR_NAME.to_string(), CATALOG_DIR_NAME.to_string()],
        }
    }
}

impl PathScanner {
    /// Scanner with the built-in reserved directories
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add more reserved directory names
    #[must_use]
    pub fn with_reserved<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            let name = name.trim();
            if !name.is_empty() && !self.is_reserved(name) {
                self.reserved.push(name.to_string());
            }
        }
        self
    }

    /// Reserved directory names, in the order they were added
    #[must_use]
    pub fn reserved(&self) -> &[String] {
        &self.reserved
    }

    /// Check whether a directory name is reserved (ASCII case-insensitive)
    #[must_use]
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.iter().any(|r| r.eq_ignore_ascii_case(name))
    }

    /// Start scanning the repository at `root`
    ///
    /// The returned iterator is lazy; the tree is read as it is consumed.
    ///
    /// # Errors
    ///
    /// Returns `ScanError` if `root` does not exist, is not a directory, or
    /// cannot be inspected.
    pub fn scan<P: AsRef<Path>>(&self, root: P) -> Result<Scan<'_>, ScanError> {
        let root = root.as_ref();
        let metadata = match root.metadata() {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScanError::NotFound(root.to_path_buf()));
            }
            Err(source) => {
                return Err(ScanError::Access {
                    path: root.to_path_buf(),
                    source,
                });
            }
        };
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        debug!(root = %root.display(), reserved = ?self.reserved, "starting scan");
        Ok(Scan {
            scanner: self,
            root: root.to_path_buf(),
            walker: WalkDir::new(root).sort_by_file_name().into_iter(),
            stats: ScanStats::default(),
        })
    }

    /// Scan the whole tree and collect the results
    ///
    /// # Errors
    ///
    /// Returns `ScanError` under the same conditions as [`PathScanner::scan`].
    pub fn scan_all<P: AsRef<Path>>(&self, root: P) -> Result<(Vec<String>, ScanStats), ScanError> {
        let mut scan = self.scan(root)?;
        let paths: Vec<String> = scan.by_ref().collect();
        Ok((paths, scan.stats()))
    }
}

/// A running scan; yields root-relative catalog paths
pub struct Scan<'a> {
    scanner: &'a PathScanner,
    root: PathBuf,
    walker: walkdir::IntoIter,
    stats: ScanStats,
}

impl Scan<'_> {
    /// Counters for the entries visited so far
    #[must_use]
    pub const fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Root this scan walks
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn accept(&mut self, entry: &DirEntry) -> Option<String> {
        if is_hidden(entry) {
            self.stats.hidden += 1;
            return None;
        }

        let Some(joined) = entry
            .path()
            .strip_prefix(&self.root)
            .ok()
            .and_then(join_relative)
        else {
            warn!(path = %entry.path().display(), "skipping path that cannot be stored");
            self.stats.unrepresentable += 1;
            return None;
        };

        let len = joined.trim().chars().count();
        if len > MAX_PATH_LEN {
            warn!(path = %joined, len, "skipping path longer than {MAX_PATH_LEN} characters");
            self.stats.too_long += 1;
            return None;
        }

        match CatalogPath::new(&joined) {
            Ok(path) => Some(path.into_string()),
            Err(e) => {
                warn!(path = %joined, error = %e, "skipping path that cannot be stored");
                self.stats.unrepresentable += 1;
                None
            }
        }
    }
}

impl Iterator for Scan<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                    warn!(path = %path, error = %e, "skipping unreadable entry");
                    self.stats.errors += 1;
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                if entry.depth() > 0
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| self.scanner.is_reserved(name))
                {
                    debug!(path = %entry.path().display(), "pruning reserved directory");
                    self.stats.reserved_dirs += 1;
                    self.walker.skip_current_dir();
                }
                continue;
            }

            let is_file = file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            if let Some(path) = self.accept(&entry) {
                self.stats.files += 1;
                return Some(path);
            }
        }
    }
}

#[cfg(windows)]
fn is_hidden(entry: &DirEntry) -> bool {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    const FILE_ATTRIBUTE_SYSTEM: u32 = 0x4;

    // Unreadable attributes count as hidden
    entry.metadata().map_or(true, |m| {
        m.file_attributes() & (FILE_ATTRIBUTE_HIDDEN | FILE_ATTRIBUTE_SYSTEM) != 0
    })
}

#[cfg(not(windows))]
fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestRepo;

    fn scan_sorted(scanner: &PathScanner, repo: &TestRepo) -> Vec<String> {
        let mut paths: Vec<String> = scanner.scan(repo.path()).unwrap().collect();
        paths.sort();
        paths
    }

    #[test]
    fn test_scan_empty_repository() {
        let repo = TestRepo::new();
        let (paths, stats) = PathScanner::new().scan_all(repo.path()).unwrap();
        assert!(paths.is_empty());
        assert_eq!(stats, ScanStats::default());
    }

    #[test]
    fn test_scan_nested_files_use_forward_slashes() {
        let repo = TestRepo::new();
        repo.write_file("a.txt");
        repo.write_file("sub/b.txt");
        repo.write_file("sub/deeper/c.md");

        let paths = scan_sorted(&PathScanner::new(), &repo);
        assert_eq!(paths, vec!["a.txt", "sub/b.txt", "sub/deeper/c.md"]);
    }

    #[test]
    fn test_scan_missing_root() {
        let repo = TestRepo::new();
        let missing = repo.path().join("nope");
        let scanner = PathScanner::new();
        let result = scanner.scan(&missing);
        assert!(matches!(result, Err(ScanError::NotFound(p)) if p == missing));
    }

    #[test]
    fn test_scan_root_is_file() {
        let repo = TestRepo::new();
        let file = repo.write_file("plain.txt");
        assert!(matches!(
            PathScanner::new().scan(&file),
            Err(ScanError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_scan_excludes_reserved_directories_at_any_depth() {
        let repo = TestRepo::new();
        repo.write_file("keep.txt");
        repo.write_file(".git/config");
        repo.write_file(".git/objects/ab/cdef");
        repo.write_file("nested/.GIT/HEAD");
        repo.write_file("nested/deep/.kbdatabase/KbInfo.db");
        repo.write_file(".KbDatabase/other.db");
        repo.write_file("nested/kept.txt");

        let (mut paths, stats) = PathScanner::new().scan_all(repo.path()).unwrap();
        paths.sort();
        assert_eq!(paths, vec!["keep.txt", "nested/kept.txt"]);
        assert_eq!(stats.reserved_dirs, 4);
    }

    #[test]
    fn test_reserved_name_only_matches_whole_segments() {
        let repo = TestRepo::new();
        repo.write_file("my.git/file.txt");
        repo.write_file(".github/workflow.yml");

        let paths = scan_sorted(&PathScanner::new(), &repo);
        assert_eq!(paths, vec![".github/workflow.yml", "my.git/file.txt"]);
    }

    #[test]
    fn test_scan_with_extra_reserved_directories() {
        let repo = TestRepo::new();
        repo.write_file("src/main.rs");
        repo.write_file("target/debug/app");
        repo.write_file("sub/Target/x");

        let scanner = PathScanner::new().with_reserved(["target", " ", ".git"]);
        assert_eq!(scanner.reserved().len(), 3);

        let paths = scan_sorted(&scanner, &repo);
        assert_eq!(paths, vec!["src/main.rs"]);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_scan_skips_hidden_files_at_any_depth() {
        let repo = TestRepo::new();
        repo.write_file("visible.txt");
        repo.write_file(".hidden");
        repo.write_file("sub/.env");
        repo.write_file("sub/deep/.DS_Store");
        repo.write_file("sub/deep/shown.txt");

        let (mut paths, stats) = PathScanner::new().scan_all(repo.path()).unwrap();
        paths.sort();
        assert_eq!(paths, vec!["sub/deep/shown.txt", "visible.txt"]);
        assert_eq!(stats.hidden, 3);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_scan_excludes_reserved_and_hidden_together() {
        let repo = TestRepo::new();
        repo.write_file("a/b/.git/c/d.txt");
        repo.write_file("a/b/.secret");
        repo.write_file("a/b/ok.txt");

        let paths = scan_sorted(&PathScanner::new(), &repo);
        assert_eq!(paths, vec!["a/b/ok.txt"]);
    }

    #[test]
    fn test_scan_skips_overlong_paths() {
        let repo = TestRepo::new();
        repo.write_file("short.txt");
        // Nest directories so no single component hits filesystem name limits
        let segment = "d".repeat(100);
        let long: PathBuf = std::iter::repeat_n(segment.as_str(), 5).chain(["f.txt"]).collect();
        repo.write_file(&long);

        let (paths, stats) = PathScanner::new().scan_all(repo.path()).unwrap();
        assert_eq!(paths, vec!["short.txt"]);
        assert_eq!(stats.too_long, 1);
        assert_eq!(stats.files, 1);
    }

    #[test]
    fn test_scan_is_repeatable() {
        let repo = TestRepo::new();
        repo.write_file("b.txt");
        repo.write_file("a/z.txt");
        repo.write_file("a/y.txt");

        let scanner = PathScanner::new();
        let first: Vec<String> = scanner.scan(repo.path()).unwrap().collect();
        let second: Vec<String> = scanner.scan(repo.path()).unwrap().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_scan_is_lazy() {
        let repo = TestRepo::new();
        repo.write_file("one.txt");
        repo.write_file("two.txt");

        let scanner = PathScanner::new();
        let mut scan = scanner.scan(repo.path()).unwrap();
        assert_eq!(scan.stats().files, 0);
        assert!(scan.next().is_some());
        assert_eq!(scan.stats().files, 1);
        assert_eq!(scan.root(), repo.path());
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_recovers_from_unreadable_subtree() {
        use std::os::unix::fs::PermissionsExt;

        let repo = TestRepo::new();
        repo.write_file("open/a.txt");
        repo.write_file("locked/b.txt");
        let locked = repo.path().join("locked");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits, so only assert when the lock took effect
        let readable = std::fs::read_dir(&locked).is_ok();
        let (paths, stats) = PathScanner::new().scan_all(repo.path()).unwrap();

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert!(paths.contains(&"open/a.txt".to_string()));
        if !readable {
            assert_eq!(paths, vec!["open/a.txt"]);
            assert_eq!(stats.errors, 1);
        }
    }
}
