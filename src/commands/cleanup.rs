//! Cleanup command - remove catalogued files that no longer exist on disk

use crate::{
    KbError,
    catalog::{Catalog, PruneSummary},
    output,
};
use dialoguer::{Confirm, theme::ColorfulTheme};

type Result<T> = std::result::Result<T, KbError>;

/// Execute the cleanup command
///
/// Lists the missing files, then asks before deleting them unless `yes` is
/// set. Tags of removed files stay in the vocabulary.
///
/// # Errors
/// Returns an error if the catalog cannot be read or updated, or if the
/// confirmation prompt fails
pub fn execute(catalog: &Catalog, dry_run: bool, yes: bool, quiet: bool) -> Result<PruneSummary> {
    execute_with(catalog, dry_run, yes, quiet, confirm)
}

fn execute_with<F>(
    catalog: &Catalog,
    dry_run: bool,
    yes: bool,
    quiet: bool,
    confirm: F,
) -> Result<PruneSummary>
where
    F: FnOnce(usize) -> Result<bool>,
{
    if !quiet {
        println!("Checking catalog for missing files...");
    }

    let preview = catalog.prune_missing(true)?;
    if preview.missing.is_empty() {
        if !quiet {
            println!("{}", output::success(&output::prune_summary(&preview)));
        }
        return Ok(preview);
    }

    for path in &preview.missing {
        if quiet {
            println!("{path}");
        } else {
            println!("  - {}", output::colorize_path(catalog.root(), path));
        }
    }

    if dry_run {
        if !quiet {
            println!("{}", output::notice(&output::prune_summary(&preview)));
        }
        return Ok(preview);
    }

    if !yes && !confirm(preview.missing.len())? {
        if !quiet {
            println!("Cleanup cancelled.");
        }
        return Ok(preview);
    }

    let summary = catalog.prune_missing(false)?;
    if !quiet {
        println!("{}", output::success(&output::prune_summary(&summary)));
    }
    Ok(summary)
}

fn confirm(count: usize) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Remove {count} file(s) from the catalog?"))
        .default(false)
        .interact()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestRepo;

    #[test]
    fn test_cleanup_dry_run_then_apply() {
        let repo = TestRepo::new();
        repo.write_file("keep.txt");
        repo.write_file("gone.txt");
        let catalog = repo.catalog();
        catalog.reconcile().unwrap();
        repo.remove_file("gone.txt");

        let preview = execute(&catalog, true, false, true).unwrap();
        assert!(!preview.applied);
        assert_eq!(catalog.db().count_files().unwrap(), 2);

        let applied = execute(&catalog, false, true, false).unwrap();
        assert!(applied.applied);
        assert_eq!(applied.missing, vec!["gone.txt"]);
        assert_eq!(catalog.db().list_paths().unwrap(), vec!["keep.txt"]);
    }

    #[test]
    fn test_cleanup_quiet_still_asks() {
        let repo = TestRepo::new();
        repo.write_file("gone.txt");
        let catalog = repo.catalog();
        catalog.reconcile().unwrap();
        repo.remove_file("gone.txt");

        let mut asked = None;
        let summary = execute_with(&catalog, false, false, true, |count| {
            asked = Some(count);
            Ok(false)
        })
        .unwrap();

        assert_eq!(asked, Some(1));
        assert!(!summary.applied);
        assert_eq!(catalog.db().list_paths().unwrap(), vec!["gone.txt"]);
    }

    #[test]
    fn test_cleanup_yes_skips_prompt() {
        let repo = TestRepo::new();
        repo.write_file("gone.txt");
        let catalog = repo.catalog();
        catalog.reconcile().unwrap();
        repo.remove_file("gone.txt");

        let summary = execute_with(&catalog, false, true, true, |_| {
            panic!("confirmation must not be requested")
        })
        .unwrap();

        assert!(summary.applied);
        assert!(catalog.db().list_paths().unwrap().is_empty());
    }

    #[test]
    fn test_cleanup_clean_catalog() {
        let repo = TestRepo::new();
        repo.write_file("keep.txt");
        let catalog = repo.catalog();
        catalog.reconcile().unwrap();

        let summary = execute(&catalog, false, true, true).unwrap();
        assert!(summary.missing.is_empty());
    }
}
