//! Rm command - delete a file from the catalog

use crate::{KbError, catalog::Catalog, db::DeleteOutcome, output};

type Result<T> = std::result::Result<T, KbError>;

/// Execute the rm command
///
/// Only the catalog entry is removed; the file on disk is left alone.
///
/// # Errors
/// Returns an error if the path is invalid or the catalog cannot be written
pub fn execute(catalog: &Catalog, file: &str, quiet: bool) -> Result<DeleteOutcome> {
    let outcome = catalog.delete_file(file)?;
    let file = file.trim();
    match outcome {
        DeleteOutcome::Deleted => {
            if !quiet {
                println!("{}", output::success(&format!("Removed {file} from the catalog")));
            }
        }
        DeleteOutcome::FileNotFound => {
            eprintln!("{}", output::failure(&format!("{file} is not in the catalog")));
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestRepo;

    #[test]
    fn test_rm_keeps_file_on_disk() {
        let repo = TestRepo::new();
        let on_disk = repo.write_file("a.txt");
        let catalog = repo.catalog();
        catalog.reconcile().unwrap();

        assert_eq!(execute(&catalog, "a.txt", true).unwrap(), DeleteOutcome::Deleted);
        assert_eq!(execute(&catalog, "a.txt", true).unwrap(), DeleteOutcome::FileNotFound);
        assert!(on_disk.exists());
    }
}
