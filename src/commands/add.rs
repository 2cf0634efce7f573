//! Add command - catalog a single file path

use crate::{
    KbError,
    catalog::Catalog,
    db::AddOutcome,
    output,
};

type Result<T> = std::result::Result<T, KbError>;

/// Execute the add command
///
/// The path is stored as given (trimmed); it does not have to exist on disk.
///
/// # Errors
/// Returns an error if the path is empty or too long, or if the catalog cannot be written
pub fn execute(catalog: &Catalog, file: &str, quiet: bool) -> Result<AddOutcome> {
    let outcome = catalog.add_file(file)?;
    let file = file.trim();
    match outcome {
        AddOutcome::Added => {
            if !quiet {
                println!("{}", output::success(&format!("Added {file}")));
            }
        }
        AddOutcome::Duplicate => {
            if !quiet {
                println!("{}", output::notice(&format!("{file} is already in the catalog")));
            }
        }
        AddOutcome::NotInitialized => {
            eprintln!(
                "{}",
                output::failure("No catalog for this repository yet. Run 'kbm init' or 'kbm scan' first.")
            );
        }
    }
    Ok(outcome)
}
