//! Scan command - reconcile the working tree with the catalog

use crate::{
    KbError,
    catalog::{Catalog, ReconcileSummary},
    output,
};

type Result<T> = std::result::Result<T, KbError>;

/// Execute the scan command
///
/// # Errors
/// Returns an error if the repository cannot be scanned or the catalog cannot be written
pub fn execute(catalog: &Catalog, quiet: bool) -> Result<ReconcileSummary> {
    if !quiet {
        println!("Scanning {}...", catalog.root().display());
    }

    let summary = catalog.reconcile()?;

    if quiet {
        println!("{} {}", summary.added, summary.skipped);
    } else {
        if summary.created {
            println!("{}", output::success("Created a new catalog"));
        }
        println!("{}", output::success(&output::reconcile_summary(&summary)));
    }
    Ok(summary)
}
