//! Output formatting for CLI display
//!
//! Helpers return strings so commands decide where to print them. In quiet
//! mode only the bare result values are produced.

use crate::catalog::{PruneSummary, ReconcileSummary};
use colored::Colorize;
use std::path::Path;

/// Green status line for a completed operation
#[must_use]
pub fn success(message: &str) -> String {
    format!("{} {message}", "✓".green())
}

/// Red status line for an operation that could not be carried out
#[must_use]
pub fn failure(message: &str) -> String {
    format!("{} {message}", "✗".red())
}

/// Yellow status line for a no-op
#[must_use]
pub fn notice(message: &str) -> String {
    format!("{} {message}", "•".yellow())
}

/// Format a file with its tags for display
#[must_use]
pub fn file_with_tags(path: &str, tags: &[String], quiet: bool) -> String {
    if quiet {
        path.to_string()
    } else if tags.is_empty() {
        format!("  {path} {}", "(no tags)".dimmed())
    } else {
        format!("  {path} [{}]", tags.join(", ").cyan())
    }
}

/// Format a tag with usage count
#[must_use]
pub fn tag_with_count(tag: &str, count: usize, quiet: bool) -> String {
    if quiet {
        tag.to_string()
    } else if count == 0 {
        format!("  {tag} {}", "(unused)".dimmed())
    } else {
        format!("  {tag} (used by {count} file(s))")
    }
}

/// Color a catalog path by whether it still exists under `root`
#[must_use]
pub fn colorize_path(root: &Path, path: &str) -> String {
    if root.join(path).exists() {
        path.green().to_string()
    } else {
        path.red().to_string()
    }
}

/// One-line summary of a reconcile run
#[must_use]
pub fn reconcile_summary(summary: &ReconcileSummary) -> String {
    let mut line = format!(
        "Added {} new file(s), {} already catalogued",
        summary.added, summary.skipped
    );

    let stats = summary.scan;
    let ignored = stats.hidden + stats.too_long + stats.unrepresentable;
    if ignored > 0 {
        line.push_str(&format!(", {ignored} ignored"));
    }
    if stats.errors > 0 {
        line.push_str(&format!(", {} unreadable", stats.errors));
    }
    line
}

/// Summary of a prune run
#[must_use]
pub fn prune_summary(summary: &PruneSummary) -> String {
    match (summary.missing.len(), summary.applied) {
        (0, _) => "No missing files. Catalog is clean.".to_string(),
        (n, true) => format!("Removed {n} missing file(s) from the catalog"),
        (n, false) => format!("{n} missing file(s) would be removed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::ScanStats;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_file_with_tags() {
        plain();
        assert_eq!(file_with_tags("a.txt", &[], true), "a.txt");
        assert_eq!(file_with_tags("a.txt", &[], false), "  a.txt (no tags)");
        assert_eq!(
            file_with_tags("a.txt", &["draft".into(), "todo".into()], false),
            "  a.txt [draft, todo]"
        );
    }

    #[test]
    fn test_tag_with_count() {
        plain();
        assert_eq!(tag_with_count("draft", 3, true), "draft");
        assert_eq!(tag_with_count("draft", 3, false), "  draft (used by 3 file(s))");
        assert_eq!(tag_with_count("old", 0, false), "  old (unused)");
    }

    #[test]
    fn test_reconcile_summary() {
        plain();
        let mut summary = ReconcileSummary {
            added: 2,
            skipped: 1,
            ..ReconcileSummary::default()
        };
        assert_eq!(reconcile_summary(&summary), "Added 2 new file(s), 1 already catalogued");

        summary.scan = ScanStats {
            hidden: 2,
            too_long: 1,
            errors: 1,
            ..ScanStats::default()
        };
        assert_eq!(
            reconcile_summary(&summary),
            "Added 2 new file(s), 1 already catalogued, 3 ignored, 1 unreadable"
        );
    }

    #[test]
    fn test_prune_summary() {
        let clean = PruneSummary::default();
        assert_eq!(prune_summary(&clean), "No missing files. Catalog is clean.");

        let preview = PruneSummary {
            missing: vec!["a".into(), "b".into()],
            applied: false,
        };
        assert_eq!(prune_summary(&preview), "2 missing file(s) would be removed");
    }

    #[test]
    fn test_status_lines_keep_message() {
        plain();
        assert!(success("done").ends_with("done"));
        assert!(failure("nope").ends_with("nope"));
        assert!(notice("same").ends_with("same"));
    }
}
