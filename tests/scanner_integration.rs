use glob::Pattern;
use headnote::actions::{
    CheckAction, JavaTopAction, ListAction, ReformatAction, RelicenseAction, RelicenseMode,
    XmlTopAction, load_reference_license,
};
use headnote::utils::file::{DEFAULT_EXCLUDES, compile_exclude_patterns};
use headnote::{Finding, process};
use indicatif::ProgressBar;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const LICENSE: &str = "Copyright 2024 Example Corp\n\nLicensed under the Apache License, Version 2.0\n";

/// Builds a small tree: a licensed Java file, a shell script without any
/// header, a file without comment syntax and an excluded backup file.
fn create_tree() -> TempDir {
    let dir = TempDir::new().expect("Should create temp dir");
    let root = dir.path();
    fs::create_dir_all(root.join("src/main")).unwrap();
    fs::create_dir_all(root.join("scripts")).unwrap();

    fs::write(root.join("LICENSE.txt"), LICENSE).unwrap();
    fs::write(
        root.join("src/main/App.java"),
        "/*\n * Copyright 2024 Example Corp\n *\n * Licensed under the Apache License, Version 2.0\n */\npackage app;\n",
    )
    .unwrap();
    fs::write(root.join("scripts/build.sh"), "make\n").unwrap();
    fs::write(root.join("scripts/build.sh~"), "#!/bin/sh\n").unwrap();
    fs::write(root.join("README"), "Read me\n").unwrap();
    dir
}

fn patterns() -> Vec<Pattern> {
    compile_exclude_patterns(DEFAULT_EXCLUDES)
}

fn findings_for<'a>(
    files: &'a [headnote::FileReport],
    root: &Path,
    relative: &str,
) -> &'a [Finding] {
    let path = root.join(relative).to_string_lossy().to_string();
    &files
        .iter()
        .find(|file| file.path == path)
        .unwrap_or_else(|| panic!("no report for {}", relative))
        .findings
}

#[test]
fn test_list_classifies_tree() {
    let dir = create_tree();
    let root = dir.path();

    let result = process(root, 50, Arc::new(ProgressBar::hidden()), &patterns(), &ListAction)
        .expect("Scan should succeed");

    assert_eq!(result.files.len(), 2, "only files with comment syntax are reported");
    assert_eq!(result.excluded_count, 1);
    assert_eq!(
        findings_for(&result.files, root, "src/main/App.java"),
        [Finding::Licensed {
            license_id: "Apache 2.0".to_string()
        }]
    );
    assert_eq!(
        findings_for(&result.files, root, "scripts/build.sh"),
        [Finding::NoCommentBlock]
    );
}

#[test]
fn test_check_against_reference() {
    let dir = create_tree();
    let root = dir.path();
    let reference = load_reference_license(&root.join("LICENSE.txt"), "text").unwrap();

    let result = process(
        root,
        50,
        Arc::new(ProgressBar::hidden()),
        &patterns(),
        &CheckAction::new(reference),
    )
    .unwrap();

    assert!(findings_for(&result.files, root, "src/main/App.java").is_empty());
    assert_eq!(
        findings_for(&result.files, root, "scripts/build.sh"),
        [Finding::NoCommentBlock]
    );

    fs::write(root.join("scripts/build.sh"), "# build helper\nmake\n").unwrap();
    let reference = load_reference_license(&root.join("LICENSE.txt"), "text").unwrap();
    let result = process(
        root,
        50,
        Arc::new(ProgressBar::hidden()),
        &patterns(),
        &CheckAction::new(reference),
    )
    .unwrap();
    assert_eq!(
        findings_for(&result.files, root, "scripts/build.sh")[0].to_string(),
        "line numbers don't match: 1 vs. 3 lines"
    );
}

#[test]
fn test_relicense_then_check_is_clean() {
    let dir = create_tree();
    let root = dir.path();
    let reference = load_reference_license(&root.join("LICENSE.txt"), "text").unwrap();
    let action = RelicenseAction::new(
        reference.clone(),
        RelicenseMode {
            existing: true,
            new: true,
        },
    )
    .unwrap();

    let result = process(root, 50, Arc::new(ProgressBar::hidden()), &patterns(), &action).unwrap();

    assert_eq!(
        findings_for(&result.files, root, "scripts/build.sh"),
        [Finding::LicenseAdded]
    );
    assert!(findings_for(&result.files, root, "src/main/App.java").is_empty());
    assert_eq!(
        fs::read_to_string(root.join("scripts/build.sh")).unwrap(),
        "# Copyright 2024 Example Corp\n#\n# Licensed under the Apache License, Version 2.0\nmake\n"
    );
    assert_eq!(fs::read_to_string(root.join("README")).unwrap(), "Read me\n");

    let result = process(
        root,
        50,
        Arc::new(ProgressBar::hidden()),
        &patterns(),
        &CheckAction::new(reference),
    )
    .unwrap();
    assert!(result.files.iter().all(|file| file.findings.is_empty()));
}

#[test]
fn test_reformat_is_idempotent() {
    let dir = create_tree();
    let root = dir.path();
    fs::write(
        root.join("src/main/Util.java"),
        "/*\n*Utility\n*/\nclass Util {}\n",
    )
    .unwrap();

    let first = process(root, 50, Arc::new(ProgressBar::hidden()), &patterns(), &ReformatAction)
        .unwrap();
    let modified: Vec<_> = first.files.iter().filter(|file| file.modified).collect();
    assert_eq!(modified.len(), 1);
    assert!(modified[0].path.ends_with("Util.java"));

    let second = process(root, 50, Arc::new(ProgressBar::hidden()), &patterns(), &ReformatAction)
        .unwrap();
    assert!(second.files.iter().all(|file| !file.modified));
}

#[test]
fn test_structural_rewrites() {
    let dir = create_tree();
    let root = dir.path();
    fs::write(
        root.join("pom.xml"),
        "<!--\n  Copyright 2024 Example Corp\n-->\n<?xml version=\"1.0\"?>\n<project/>\n",
    )
    .unwrap();

    let result = process(root, 50, Arc::new(ProgressBar::hidden()), &patterns(), &XmlTopAction)
        .unwrap();
    assert_eq!(findings_for(&result.files, root, "pom.xml"), [Finding::Reformatted]);
    assert!(findings_for(&result.files, root, "src/main/App.java").is_empty());
    assert_eq!(
        fs::read_to_string(root.join("pom.xml")).unwrap(),
        "<?xml version=\"1.0\"?>\n<!--\n  Copyright 2024 Example Corp\n-->\n<project/>\n"
    );

    let action = JavaTopAction::new(false);
    let result = process(root, 50, Arc::new(ProgressBar::hidden()), &patterns(), &action).unwrap();
    assert_eq!(
        findings_for(&result.files, root, "src/main/App.java"),
        [Finding::Reformatted]
    );
    assert_eq!(
        fs::read_to_string(root.join("src/main/App.java")).unwrap(),
        "package app;\n\n/*\n * Copyright 2024 Example Corp\n *\n * Licensed under the Apache License, Version 2.0\n */\n\n"
    );
}
