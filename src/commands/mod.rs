//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI
//! args and runs the operation against the catalog. Expected outcomes such as
//! an unknown file are reported as status lines; only real failures are
//! returned as errors.

use crate::{KbError, catalog::Catalog, config::KbConfig, scan::PathScanner};
use std::path::{Path, PathBuf};

pub mod add;
pub mod cleanup;
pub mod config;
pub mod git;
pub mod init;
pub mod list;
pub mod rm;
pub mod scan;
pub mod search;
pub mod tag;
pub mod tags;
pub mod untag;

// Re-export execute functions for convenience
pub use add::execute as add;
pub use cleanup::execute as cleanup;
pub use self::config::execute as config;
pub use git::execute as git;
pub use init::execute as init;
pub use list::execute as list;
pub use rm::execute as rm;
pub use scan::execute as scan;
pub use search::execute as search;
pub use tag::execute as tag;
pub use tags::execute as tags;
pub use untag::execute as untag;

/// Pick the repository root: the `--repo` flag, else the configured directory
///
/// # Errors
/// Returns `KbError::InvalidInput` if neither is set
pub fn resolve_repository(flag: Option<&Path>, config: &KbConfig) -> Result<PathBuf, KbError> {
    flag.map(Path::to_path_buf)
        .or_else(|| config.repository_directory.clone())
        .ok_or_else(|| {
            KbError::InvalidInput(
                "No repository directory. Pass --repo PATH, run 'kbm setup', or 'kbm config set repository_directory=PATH'.".into(),
            )
        })
}

/// Catalog for `repo`, skipping the extra directories named in `config`
#[must_use]
pub fn open_catalog(repo: &Path, config: &KbConfig) -> Catalog {
    let scanner = PathScanner::new().with_reserved(config.excluded_directories.iter());
    Catalog::with_scanner(repo, scanner)
}
