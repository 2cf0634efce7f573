//! Integration tests for kbmanager
//!
//! These tests build throwaway repositories in temporary directories and drive
//! the public catalog API through complete workflows.

use kbmanager::catalog::{Catalog, CatalogError};
use kbmanager::db::{
    AddOutcome, AttachOutcome, CATALOG_DIR_NAME, CATALOG_FILE_NAME, CreateOutcome, Database,
    DeleteOutcome, DetachOutcome, SearchOutcome,
};
use kbmanager::scan::PathScanner;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper function to create a file with parent directories
fn create_test_file(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"content").unwrap();
}

fn paths(catalog: &Catalog) -> Vec<String> {
    catalog
        .list_files_with_tags()
        .unwrap()
        .into_iter()
        .map(|entry| entry.path)
        .collect()
}

#[test]
fn test_full_workflow() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::for_repository(dir.path());

    let empty = catalog.reconcile().unwrap();
    assert_eq!((empty.added, empty.skipped), (0, 0));

    create_test_file(dir.path(), "a.txt");
    create_test_file(dir.path(), "sub/b.txt");

    let first = catalog.reconcile().unwrap();
    assert_eq!((first.added, first.skipped), (2, 0));

    let second = catalog.reconcile().unwrap();
    assert_eq!((second.added, second.skipped), (0, 2));

    assert_eq!(catalog.attach_tag("a.txt", "draft").unwrap(), AttachOutcome::Attached);
    assert_eq!(
        catalog.search_by_tag("draft").unwrap(),
        SearchOutcome::Found(vec!["a.txt".to_string()])
    );

    assert_eq!(catalog.detach_tag("a.txt", "draft").unwrap(), DetachOutcome::Detached);
    assert_eq!(catalog.search_by_tag("draft").unwrap(), SearchOutcome::Found(Vec::new()));

    assert_eq!(catalog.delete_file("a.txt").unwrap(), DeleteOutcome::Deleted);
    assert_eq!(paths(&catalog), vec!["sub/b.txt"]);
    assert!(catalog.list_all_tags().unwrap().contains(&"draft".to_string()));
}

#[test]
fn test_catalog_lives_in_hidden_directory() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::for_repository(dir.path());

    assert!(!catalog.exists());
    assert_eq!(catalog.create().unwrap(), CreateOutcome::Created);
    assert!(dir.path().join(CATALOG_DIR_NAME).join(CATALOG_FILE_NAME).is_file());
    assert_eq!(catalog.create().unwrap(), CreateOutcome::AlreadyExists);
}

#[test]
fn test_reconcile_excludes_reserved_and_hidden() {
    let dir = TempDir::new().unwrap();
    create_test_file(dir.path(), "keep.md");
    create_test_file(dir.path(), ".git/HEAD");
    create_test_file(dir.path(), "nested/deeper/.GIT/config");
    create_test_file(dir.path(), "nested/deeper/visible.md");
    create_test_file(dir.path(), "nested/.hidden");

    let catalog = Catalog::for_repository(dir.path());
    catalog.reconcile().unwrap();

    let mut found = paths(&catalog);
    found.sort();
    if cfg!(windows) {
        // Dot files are only hidden through attributes there
        found.retain(|p| p != "nested/.hidden");
    }
    assert_eq!(found, vec!["keep.md", "nested/deeper/visible.md"]);

    // The catalog never catalogues itself
    assert!(found.iter().all(|p| !p.starts_with(CATALOG_DIR_NAME)));
}

#[test]
fn test_duplicate_add_and_attach() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::for_repository(dir.path());
    catalog.create().unwrap();

    assert_eq!(catalog.add_file("notes/a.md").unwrap(), AddOutcome::Added);
    assert_eq!(catalog.add_file("notes/a.md").unwrap(), AddOutcome::Duplicate);
    assert_eq!(catalog.db().count_files().unwrap(), 1);

    assert_eq!(catalog.attach_tag("notes/a.md", "x").unwrap(), AttachOutcome::Attached);
    assert_eq!(
        catalog.attach_tag("notes/a.md", "x").unwrap(),
        AttachOutcome::TagAlreadyAttached
    );
    assert_eq!(catalog.db().tags_for("notes/a.md").unwrap(), Some(vec!["x".to_string()]));
}

#[test]
fn test_delete_keeps_shared_tags_searchable() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::for_repository(dir.path());
    catalog.create().unwrap();
    catalog.add_file("a.md").unwrap();
    catalog.add_file("b.md").unwrap();
    catalog.attach_tag("a.md", "shared").unwrap();
    catalog.attach_tag("b.md", "shared").unwrap();

    catalog.delete_file("a.md").unwrap();

    assert_eq!(
        catalog.search_by_tag("shared").unwrap(),
        SearchOutcome::Found(vec!["b.md".to_string()])
    );
}

#[test]
fn test_catalog_survives_reopen() {
    let dir = TempDir::new().unwrap();
    create_test_file(dir.path(), "a.txt");
    {
        let catalog = Catalog::for_repository(dir.path());
        catalog.reconcile().unwrap();
        catalog.attach_tag("a.txt", "kept").unwrap();
    }

    let db = Database::for_repository(dir.path());
    assert_eq!(db.tags_for("a.txt").unwrap(), Some(vec!["kept".to_string()]));
}

#[test]
fn test_custom_exclusions_and_prune() {
    let dir = TempDir::new().unwrap();
    create_test_file(dir.path(), "src/main.rs");
    create_test_file(dir.path(), "target/debug/app");
    create_test_file(dir.path(), "README.md");

    let catalog = Catalog::with_scanner(dir.path(), PathScanner::new().with_reserved(["target"]));
    let summary = catalog.reconcile().unwrap();
    assert_eq!(summary.added, 2);

    fs::remove_file(dir.path().join("README.md")).unwrap();
    let pruned = catalog.prune_missing(false).unwrap();
    assert_eq!(pruned.missing, vec!["README.md"]);
    assert_eq!(paths(&catalog), vec!["src/main.rs"]);
}

#[test]
fn test_invalid_input_is_rejected_before_storage() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::for_repository(dir.path());

    assert!(matches!(
        catalog.attach_tag("   ", "draft"),
        Err(CatalogError::Validation { .. })
    ));
    assert!(!catalog.exists());
}
