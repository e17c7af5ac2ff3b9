//! Integration tests for compiling stylesheets read from the filesystem.
//!
//! Copyright (c) 2025 Posit, PBC

use std::fs;
use std::path::PathBuf;

use cssbundle_runtime::{NativeLocator, ResourceLocator, RuntimeError, compile_scss};

#[test]
fn test_compile_with_partials_on_disk() {
    let temp = tempfile::tempdir().unwrap();
    let styles = temp.path().join("styles");
    fs::create_dir_all(styles.join("vendor")).unwrap();
    fs::write(styles.join("vendor/_palette.scss"), "$accent: #ff6600;").unwrap();
    fs::write(
        styles.join("main.scss"),
        "@import 'palette';\na { color: $accent; }",
    )
    .unwrap();

    let locator = NativeLocator::new(temp.path());
    let source = locator.fetch_string("styles/main.scss").unwrap();
    let css = compile_scss(
        &locator,
        &source,
        &[PathBuf::from("styles/vendor")],
        false,
    )
    .unwrap();

    assert!(css.contains("a {"));
    assert!(css.contains("#ff6600"));
}

#[test]
fn test_compile_reports_missing_import() {
    let temp = tempfile::tempdir().unwrap();
    let locator = NativeLocator::new(temp.path());

    let err = compile_scss(&locator, "@import 'nowhere';", &[], false).unwrap_err();

    assert!(matches!(err, RuntimeError::SassError(_)));
}

#[test]
fn test_locator_resolves_absolute_paths() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("abs.css");
    fs::write(&file, ".abs {}").unwrap();

    let locator = NativeLocator::new("/definitely/not/here");
    assert_eq!(
        locator.fetch_string(&file.to_string_lossy()).unwrap(),
        ".abs {}"
    );
}
