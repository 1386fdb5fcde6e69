mod common;

use common::{write_file, TestProject};
use serde_json::json;

#[test]
fn copies_configured_and_default_assets() {
    let project = TestProject::new()
        .config("assets-strategy", json!("copy"))
        .config("assets-dir", json!("www/assets"))
        .package("components/jquery", "3.7.1", &["jquery.js", "README.md"], json!({}))
        .package(
            "acme/ui",
            "2.0.0",
            &["dist/ui.css", "dist/img/logo.svg", "src/Ui.php"],
            json!({ "assets-files": "dist" }),
        )
        .package("acme/backend", "1.0.0", &["src/Backend.php"], json!({}))
        .write();

    let result = project.refresh_assets();

    assert!(result.success, "stderr: {}", result.stderr);
    assert_eq!(
        project.files_under("www/assets"),
        vec![
            "acme/ui/img/logo.svg",
            "acme/ui/ui.css",
            "components/jquery/jquery.js",
        ]
    );
    assert_eq!(
        std::fs::read_to_string(project.path("www/assets/acme/ui/ui.css")).expect("read css"),
        "acme/ui@2.0.0:dist/ui.css"
    );
    assert!(result
        .stdout
        .contains("Manage assets for package components/jquery"));
    assert!(result.stdout.contains("  - directory dist/img/"));
    assert!(!result.stdout.contains("acme/backend"));
    assert!(!project.path("www/assets/acme/backend").exists());
}

#[test]
fn rerun_produces_identical_tree() {
    let project = TestProject::new()
        .config("assets-strategy", json!("copy"))
        .package("nette/forms", "3.1.0", &["src/assets/netteForms.js"], json!({}))
        .write();

    assert!(project.refresh_assets().success);
    let first = project.files_under("assets");
    write_file(&project.path("assets/leftover.js"), "stale");
    assert!(project.refresh_assets().success);

    assert_eq!(project.files_under("assets"), first);
    assert_eq!(first, vec!["nette/forms/netteForms.js"]);
}

#[test]
fn conflicting_targets_fail_without_touching_files() {
    let project = TestProject::new()
        .config(
            "assets-target",
            json!({ "acme/a": "public/a", "acme/b": "public/a/nested" }),
        )
        .package("acme/a", "1.0.0", &["a.js"], json!({ "assets-files": ["a.js"] }))
        .package("acme/b", "1.0.0", &["b.js"], json!({ "assets-files": ["b.js"] }))
        .write();
    write_file(&project.path("public/a/keep.txt"), "keep");

    let result = project.refresh_assets();

    assert!(!result.success);
    assert!(result.stderr.contains("conflicts with"), "{}", result.stderr);
    assert!(project.path("public/a/keep.txt").is_file());
    assert!(!project.path("assets").exists());
}

#[test]
fn missing_configured_entry_fails_the_run() {
    let project = TestProject::new()
        .config("assets-strategy", json!("copy"))
        .config("assets-files", json!({ "acme/ui": ["dist/missing.css"] }))
        .package("acme/ui", "1.0.0", &["dist/ui.css"], json!({}))
        .write();

    let result = project.refresh_assets();

    assert!(!result.success);
    assert!(
        result
            .stderr
            .contains("entry 'dist/missing.css' not found in package 'acme/ui'"),
        "{}",
        result.stderr
    );
}

#[test]
fn project_without_packages_leaves_no_assets_dir() {
    let project = TestProject::new().write();

    let result = project.refresh_assets();

    assert!(result.success, "stderr: {}", result.stderr);
    assert!(result.stdout.is_empty());
    assert!(!project.path("assets").exists());
}

#[cfg(unix)]
#[test]
fn symlink_strategy_creates_relative_links() {
    let project = TestProject::new()
        .config("assets-strategy", json!("symlink"))
        .config("assets-target", json!({ "components/jquery": "public/js/jquery" }))
        .package("components/jquery", "3.7.1", &["jquery.js"], json!({}))
        .write();

    let result = project.refresh_assets();

    assert!(result.success, "stderr: {}", result.stderr);
    let link = project.path("public/js/jquery/jquery.js");
    let target = std::fs::read_link(&link).expect("read link");
    assert_eq!(
        target,
        std::path::Path::new("../../../vendor/components/jquery/jquery.js")
    );
    assert_eq!(
        std::fs::read_to_string(&link).expect("read through link"),
        "components/jquery@3.7.1:jquery.js"
    );
    assert!(!project.path("assets").exists());
}
