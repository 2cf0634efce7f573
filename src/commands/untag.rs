//! Untag command - detach tags from a catalogued file

use crate::{KbError, catalog::Catalog, db::DetachOutcome, output};

type Result<T> = std::result::Result<T, KbError>;

/// Execute the untag command
///
/// Tags stay in the vocabulary even when no file uses them any more.
///
/// # Errors
/// Returns an error if the file or a tag name is invalid or the catalog cannot be written
pub fn execute(catalog: &Catalog, file: &str, tags: &[String], quiet: bool) -> Result<Vec<DetachOutcome>> {
    if tags.is_empty() {
        return Err(KbError::InvalidInput("No tags provided".into()));
    }

    let file = file.trim();
    let mut outcomes = Vec::with_capacity(tags.len());
    for tag in tags {
        let outcome = catalog.detach_tag(file, tag)?;
        let tag = tag.trim();
        match outcome {
            DetachOutcome::Detached => {
                if !quiet {
                    println!("{}", output::success(&format!("Removed '{tag}' from {file}")));
                }
            }
            DetachOutcome::AssociationNotFound => {
                eprintln!("{}", output::failure(&format!("{file} does not have tag '{tag}'")));
            }
            DetachOutcome::FileNotFound => {
                eprintln!("{}", output::failure(&format!("{file} is not in the catalog")));
                outcomes.push(outcome);
                break;
            }
        }
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestRepo;

    #[test]
    fn test_untag_outcomes() {
        let repo = TestRepo::new();
        let catalog = repo.catalog();
        catalog.create().unwrap();
        catalog.add_file("a.txt").unwrap();
        catalog.attach_tag("a.txt", "draft").unwrap();

        let outcomes = execute(&catalog, "a.txt", &["draft".into(), "draft".into()], true).unwrap();
        assert_eq!(outcomes, vec![DetachOutcome::Detached, DetachOutcome::AssociationNotFound]);
        assert_eq!(catalog.list_all_tags().unwrap(), vec!["draft"]);
    }

    #[test]
    fn test_untag_unknown_file() {
        let repo = TestRepo::new();
        let catalog = repo.catalog();
        catalog.create().unwrap();

        let outcomes = execute(&catalog, "ghost.txt", &["draft".into()], true).unwrap();
        assert_eq!(outcomes, vec![DetachOutcome::FileNotFound]);
    }
}
