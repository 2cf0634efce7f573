//! Version control error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcsError {
    /// libgit2 reported a failure
    #[error("Git {operation} failed: {source}")]
    Git {
        operation: &'static str,
        #[source]
        source: git2::Error,
    },

    /// Clone target exists and has content
    #[error("Target directory is not empty: {}", .0.display())]
    TargetNotEmpty(PathBuf),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl VcsError {
    /// Wrap a libgit2 error with the operation that produced it
    pub(crate) fn git(operation: &'static str) -> impl FnOnce(git2::Error) -> Self {
        move |source| Self::Git { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_git_display_names_operation() {
        let error = VcsError::git("push")(git2::Error::from_str("remote rejected"));
        assert_eq!(error.to_string(), "Git push failed: remote rejected");
        assert!(error.source().is_some());
    }

    #[test]
    fn test_target_not_empty_display() {
        let error = VcsError::TargetNotEmpty(PathBuf::from("/srv/notes"));
        assert_eq!(error.to_string(), "Target directory is not empty: /srv/notes");
    }
}
