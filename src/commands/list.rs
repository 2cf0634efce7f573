//! List command - show catalogued files with their tags

use crate::{KbError, catalog::Catalog, db::FileEntry, output};

type Result<T> = std::result::Result<T, KbError>;

/// Execute the list command
///
/// # Errors
/// Returns an error if the catalog does not exist or cannot be read
pub fn execute(catalog: &Catalog, quiet: bool) -> Result<Vec<FileEntry>> {
    let entries = catalog.list_files_with_tags()?;

    if entries.is_empty() {
        if !quiet {
            println!("The catalog is empty. Run 'kbm scan' to add files.");
        }
        return Ok(entries);
    }

    if !quiet {
        println!("{} file(s):", entries.len());
    }
    for entry in &entries {
        println!("{}", output::file_with_tags(&entry.path, &entry.tags, quiet));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestRepo;

    #[test]
    fn test_list_in_insertion_order() {
        let repo = TestRepo::new();
        let catalog = repo.catalog();
        catalog.create().unwrap();
        catalog.add_file("z.txt").unwrap();
        catalog.add_file("a.txt").unwrap();
        catalog.attach_tag("a.txt", "draft").unwrap();

        let entries = execute(&catalog, true).unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["z.txt", "a.txt"]);
        assert_eq!(entries[1].tags, vec!["draft"]);
    }

    #[test]
    fn test_list_without_catalog_fails() {
        let repo = TestRepo::new();
        assert!(execute(&repo.catalog(), true).is_err());
    }
}
