//! Init command - create the catalog database

use crate::{
    KbError,
    catalog::Catalog,
    db::CreateOutcome,
    output,
};

type Result<T> = std::result::Result<T, KbError>;

/// Execute the init command
///
/// # Errors
/// Returns an error if the catalog directory or database cannot be created
pub fn execute(catalog: &Catalog, quiet: bool) -> Result<CreateOutcome> {
    let outcome = catalog.create()?;
    if !quiet {
        let location = catalog.db().path().display().to_string();
        match outcome {
            CreateOutcome::Created => {
                println!("{}", output::success(&format!("Created catalog at {location}")));
            }
            CreateOutcome::AlreadyExists => {
                println!("{}", output::notice(&format!("Catalog already exists at {location}")));
            }
        }
    }
    Ok(outcome)
}
