//! Search command - list the files carrying a tag

use crate::{KbError, catalog::Catalog, db::SearchOutcome, output};

type Result<T> = std::result::Result<T, KbError>;

/// Execute the search command
///
/// # Errors
/// Returns an error if the tag name is invalid or the catalog cannot be read
pub fn execute(catalog: &Catalog, tag: &str, quiet: bool) -> Result<SearchOutcome> {
    let outcome = catalog.search_by_tag(tag)?;
    let tag = tag.trim();

    match &outcome {
        SearchOutcome::Found(files) if files.is_empty() => {
            if !quiet {
                println!("{}", output::notice(&format!("No files are tagged '{tag}'")));
            }
        }
        SearchOutcome::Found(files) => {
            if !quiet {
                println!("Found {} file(s) tagged '{tag}':", files.len());
            }
            for file in files {
                if quiet {
                    println!("{file}");
                } else {
                    println!("  {}", output::colorize_path(catalog.root(), file));
                }
            }
        }
        SearchOutcome::TagNotFound => {
            eprintln!("{}", output::failure(&format!("Tag '{tag}' does not exist")));
        }
    }
    Ok(outcome)
}
