//! Source folder loading: package inference, mismatch checking,
//! exclusions, idempotence, and the folder/package queries.

use crate::helpers::fixtures::*;
use ned_resources::{NedResourceCache, ResourceError};

#[test]
fn loads_a_folder_tree_and_counts_ned_files() {
    let dir = source_tree(&[
        ("package.ned", "package pkg;\n"),
        ("M.ned", "package pkg;\nsimple M { }\n"),
        ("a/N.ned", "package pkg.a;\nsimple N { }\n"),
        ("a/README.txt", "not a ned file\n"),
    ]);
    let mut cache = NedResourceCache::new();
    let count = cache.load_source_folder(&folder(&dir), None).expect("load");
    assert_eq!(count, 3); // package.ned, M.ned, a/N.ned
    cache.finalize().expect("finalize");
    assert!(cache.lookup("pkg.M").is_some());
    assert!(cache.lookup("pkg.a.N").is_some());
}

#[test]
fn package_mismatch_aborts_the_folder_load() {
    let dir = source_tree(&[("a/M.ned", "package zzz;\nsimple M { }\n")]);
    let mut cache = NedResourceCache::new();
    let error = cache
        .load_source_folder(&folder(&dir), None)
        .expect_err("mismatch should fail");
    let message = error.to_string();
    assert!(
        message.starts_with("Could not load NED sources from"),
        "{message}"
    );
    assert!(
        message.contains("Declared package 'zzz' does not match expected package 'a'"),
        "{message}"
    );
}

#[test]
fn mismatch_at_the_folder_root_expects_the_empty_package() {
    // no package.ned, so the expected package of the folder itself is ''
    let dir = source_tree(&[("M.ned", "package zzz;\nsimple M { }\n")]);
    let mut cache = NedResourceCache::new();
    let error = cache
        .load_source_folder(&folder(&dir), None)
        .expect_err("mismatch should fail");
    assert!(
        error
            .to_string()
            .contains("Declared package 'zzz' does not match expected package ''"),
        "{error}"
    );
}

#[test]
fn file_keys_are_canonical() {
    let dir = source_tree(&[("sub/.keep", ""), ("M.ned", "simple M { }\n")]);
    let mut cache = NedResourceCache::new();
    let root = folder(&dir);
    let messy = format!("{root}/sub/../M.ned");
    cache.load_file(&messy, None, false).expect("load");
    assert!(cache.file(&format!("{root}/M.ned")).is_some());
    // re-loading through the messy spelling is still a no-op
    cache.load_file(&messy, None, false).expect("reload");
    assert_eq!(cache.file_count(), 1);
}

#[test]
fn root_package_comes_from_the_package_marker() {
    let dir = source_tree(&[
        ("package.ned", "package pkg;\n"),
        ("a/M.ned", "package pkg.a;\nsimple M { }\n"),
    ]);
    let mut cache = NedResourceCache::new();
    cache.load_source_folder(&folder(&dir), None).expect("load");

    let root = folder(&dir);
    let sub = format!("{root}/a");
    assert_eq!(cache.source_folder_for(&sub), Some(root.as_str()));
    assert_eq!(cache.package_for_folder(&sub).as_deref(), Some("pkg.a"));
    // the source folder itself maps to its root package
    assert_eq!(cache.package_for_folder(&root).as_deref(), Some("pkg"));
}

#[test]
fn folder_queries_miss_outside_any_source_folder() {
    let cache = NedResourceCache::new();
    assert_eq!(cache.source_folder_for("/nowhere/special"), None);
    assert_eq!(cache.package_for_folder("/nowhere/special"), None);
}

#[test]
fn reloading_the_same_file_is_a_no_op() {
    let dir = source_tree(&[("M.ned", "simple M { }\n")]);
    let mut cache = NedResourceCache::new();
    let path = format!("{}/M.ned", folder(&dir));
    cache.load_file(&path, None, false).expect("first load");
    let files_before = cache.file_count();
    cache.load_file(&path, None, false).expect("second load");
    assert_eq!(cache.file_count(), files_before);
}

#[test]
fn reloading_a_loaded_folder_adds_nothing() {
    let dir = source_tree(&[("M.ned", "simple M { }\n")]);
    let mut cache = NedResourceCache::new();
    cache.load_source_folder(&folder(&dir), None).expect("load");
    let files_before = cache.file_count();
    cache
        .load_source_folder(&folder(&dir), None)
        .expect("reload");
    assert_eq!(cache.file_count(), files_before);
}

#[test]
fn excluded_packages_skip_their_subtrees() {
    let dir = source_tree(&[
        ("a/M.ned", "package a;\nsimple M { }\n"),
        ("b/N.ned", "package b;\nsimple N { }\n"),
        ("b/sub/O.ned", "package b.sub;\nsimple O { }\n"),
    ]);
    let mut cache = NedResourceCache::new();
    let count = cache
        .load_source_folder(&folder(&dir), Some("b;unused.pkg"))
        .expect("load");
    assert_eq!(count, 1);
    cache.finalize().expect("finalize");
    assert!(cache.lookup("a.M").is_some());
    assert!(cache.lookup("b.N").is_none());
    assert!(cache.lookup("b.sub.O").is_none());
}

#[test]
fn dot_entries_are_ignored() {
    let dir = source_tree(&[
        ("M.ned", "simple M { }\n"),
        (".hidden/X.ned", "package zzz;\nsimple X { }\n"),
    ]);
    let mut cache = NedResourceCache::new();
    let count = cache.load_source_folder(&folder(&dir), None).expect("load");
    assert_eq!(count, 1);
}

#[test]
fn nested_source_folders_are_rejected() {
    let dir = source_tree(&[
        ("M.ned", "simple M { }\n"),
        ("a/N.ned", "package a;\nsimple N { }\n"),
    ]);
    let mut cache = NedResourceCache::new();
    cache.load_source_folder(&folder(&dir), None).expect("load");
    let sub = format!("{}/a", folder(&dir));
    let error = cache
        .load_source_folder(&sub, None)
        .expect_err("nested folder should fail");
    assert!(error.to_string().contains("nested"), "{error}");
}

#[test]
fn missing_folder_is_an_error_naming_the_folder() {
    let mut cache = NedResourceCache::new();
    let error = cache
        .load_source_folder("/does/not/exist", None)
        .expect_err("missing folder");
    assert!(matches!(error, ResourceError::SourceFolder { .. }));
    assert!(
        error
            .to_string()
            .starts_with("Could not load NED sources from '/does/not/exist'"),
        "{error}"
    );
}

#[test]
fn missing_file_is_an_error() {
    let mut cache = NedResourceCache::new();
    let error = cache
        .load_file("/does/not/exist.ned", None, false)
        .expect_err("missing file");
    assert!(error.to_string().contains("Cannot read file"), "{error}");
}

#[test]
fn resolve_source_directories_keeps_existing_entries_in_order() {
    let dir = source_tree(&[("x/keep.me", ""), ("y/keep.me", "")]);
    let cache = NedResourceCache::new();
    let root = folder(&dir);
    let resolved = cache
        .resolve_source_directories(&root, "x:y:missing:x")
        .expect("resolve");
    assert_eq!(resolved, vec![format!("{root}/x"), format!("{root}/y")]);
}
