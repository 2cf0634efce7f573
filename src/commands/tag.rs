//! Tag command - attach tags to a catalogued file

use crate::{KbError, catalog::Catalog, db::AttachOutcome, output};

type Result<T> = std::result::Result<T, KbError>;

/// Execute the tag command
///
/// Each tag is attached independently; the outcome for every tag is returned
/// in input order.
///
/// # Errors
/// Returns an error if the file or a tag name is invalid or the catalog cannot be written
pub fn execute(catalog: &Catalog, file: &str, tags: &[String], quiet: bool) -> Result<Vec<AttachOutcome>> {
    if tags.is_empty() {
        return Err(KbError::InvalidInput("No tags provided".into()));
    }

    let file = file.trim();
    let mut outcomes = Vec::with_capacity(tags.len());
    for tag in tags {
        let outcome = catalog.attach_tag(file, tag)?;
        let tag = tag.trim();
        match outcome {
            AttachOutcome::Attached => {
                if !quiet {
                    println!("{}", output::success(&format!("Tagged {file} with '{tag}'")));
                }
            }
            AttachOutcome::TagAlreadyAttached => {
                if !quiet {
                    println!("{}", output::notice(&format!("{file} already has tag '{tag}'")));
                }
            }
            AttachOutcome::FileNotFound => {
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
    fn test_tag_multiple() {
        let repo = TestRepo::new();
        let catalog = repo.catalog();
        catalog.create().unwrap();
        catalog.add_file("a.txt").unwrap();

        let outcomes = execute(&catalog, "a.txt", &["draft".into(), "draft".into(), "todo".into()], true).unwrap();
        assert_eq!(
            outcomes,
            vec![
                AttachOutcome::Attached,
                AttachOutcome::TagAlreadyAttached,
                AttachOutcome::Attached
            ]
        );
        assert_eq!(catalog.db().tags_for("a.txt").unwrap(), Some(vec!["draft".into(), "todo".into()]));
    }

    #[test]
    fn test_tag_unknown_file_stops() {
        let repo = TestRepo::new();
        let catalog = repo.catalog();
        catalog.create().unwrap();

        let outcomes = execute(&catalog, "ghost.txt", &["a".into(), "b".into()], true).unwrap();
        assert_eq!(outcomes, vec![AttachOutcome::FileNotFound]);
        assert!(catalog.list_all_tags().unwrap().is_empty());
    }

    #[test]
    fn test_tag_requires_tags() {
        let repo = TestRepo::new();
        let catalog = repo.catalog();
        assert!(matches!(execute(&catalog, "a.txt", &[], true), Err(KbError::InvalidInput(_))));
    }
}
