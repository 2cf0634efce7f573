//! Scanner error types
//!
//! Only problems with the scan root are errors. Unreadable subtrees below the
//! root are recovered during iteration and counted in `ScanStats::errors`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised before a scan can start
#[derive(Debug, Error)]
pub enum ScanError {
    /// The repository root does not exist
    #[error("Repository directory not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The repository root exists but is not a directory
    #[error("Repository path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The repository root cannot be inspected
    #[error("Cannot access repository directory {}: {source}", .path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_not_found_display() {
        let error = ScanError::NotFound(PathBuf::from("/missing/repo"));
        assert_eq!(error.to_string(), "Repository directory not found: /missing/repo");
    }

    #[test]
    fn test_access_error_chains_source() {
        let error = ScanError::Access {
            path: PathBuf::from("/locked"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.to_string().contains("/locked"));
        assert!(error.source().is_some());
    }
}
