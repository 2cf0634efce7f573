//! Unit tests for catalog store error types

#[cfg(test)]
mod tests {
    use crate::db::error::DbError;
    use std::error::Error;
    use std::path::PathBuf;

    #[test]
    fn test_not_initialized_error() {
        let error = DbError::NotInitialized(PathBuf::from("/repo/.kbdatabase/KbInfo.db"));
        assert_eq!(
            error.to_string(),
            "Catalog not initialized at /repo/.kbdatabase/KbInfo.db"
        );
    }

    #[test]
    fn test_invalid_input_error() {
        let error = DbError::InvalidInput("path too long".to_string());
        assert_eq!(error.to_string(), "Invalid input: path too long");
    }

    #[test]
    fn test_error_debug() {
        let error = DbError::InvalidInput("test error".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("InvalidInput"));
        assert!(debug.contains("test error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: DbError = io.into();
        assert!(matches!(error, DbError::IoError(_)));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_sqlite_error_conversion() {
        let error: DbError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(error, DbError::SqliteError(_)));
        assert!(error.to_string().starts_with("Database error:"));
    }

    #[test]
    fn test_error_source_absent_for_plain_variants() {
        let error = DbError::NotInitialized(PathBuf::from("x"));
        assert!(error.source().is_none());
    }
}
