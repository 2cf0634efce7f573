//! Tags command - list the tag vocabulary

use crate::{KbError, catalog::Catalog, output};

type Result<T> = std::result::Result<T, KbError>;

/// Execute the tags command
///
/// With `counts`, each tag is shown with the number of files carrying it.
///
/// # Errors
/// Returns an error if the catalog does not exist or cannot be read
pub fn execute(catalog: &Catalog, counts: bool, quiet: bool) -> Result<Vec<String>> {
    let usage = catalog.tag_usage()?;

    if usage.is_empty() {
        if !quiet {
            println!("No tags yet. Use 'kbm tag FILE TAG' to add one.");
        }
        return Ok(Vec::new());
    }

    if !quiet {
        println!("{} tag(s):", usage.len());
    }
    for (tag, count) in &usage {
        if counts {
            println!("{}", output::tag_with_count(tag, *count, quiet));
        } else if quiet {
            println!("{tag}");
        } else {
            println!("  {tag}");
        }
    }

    Ok(usage.into_iter().map(|(tag, _)| tag).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestRepo;

    #[test]
    fn test_tags_include_unused() {
        let repo = TestRepo::new();
        let catalog = repo.catalog();
        catalog.create().unwrap();
        catalog.add_file("a.txt").unwrap();
        catalog.attach_tag("a.txt", "draft").unwrap();
        catalog.attach_tag("a.txt", "todo").unwrap();
        catalog.detach_tag("a.txt", "todo").unwrap();

        assert_eq!(execute(&catalog, true, true).unwrap(), vec!["draft", "todo"]);
    }
}
