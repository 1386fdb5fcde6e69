//! Shared test infrastructure for integration tests.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A throwaway Composer project with an installed-packages manifest.
pub struct TestProject {
    temp_dir: TempDir,
    config: Value,
    packages: Vec<Value>,
}

/// Captured result of one `asset-stage` invocation.
#[derive(Debug)]
pub struct RunResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for RunResult {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
            config: json!({}),
            packages: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Set one option in composer.json `config`.
    pub fn config(mut self, key: &str, value: Value) -> Self {
        self.config[key] = value;
        self
    }

    /// Install a package under `vendor/` with placeholder file contents.
    pub fn package(mut self, name: &str, version: &str, files: &[&str], extra: Value) -> Self {
        for file in files {
            write_file(
                &self.path("vendor").join(name).join(file),
                &format!("{name}@{version}:{file}"),
            );
        }
        self.packages.push(json!({
            "name": name,
            "version": version,
            "install-path": format!("../{name}"),
            "extra": extra,
        }));
        self
    }

    /// Write composer.json and vendor/composer/installed.json.
    pub fn write(self) -> Self {
        write_file(
            &self.path("composer.json"),
            &serde_json::to_string_pretty(&json!({ "config": self.config }))
                .expect("serialize composer.json"),
        );
        write_file(
            &self.path("vendor/composer/installed.json"),
            &serde_json::to_string_pretty(&json!({ "packages": self.packages }))
                .expect("serialize installed.json"),
        );
        self
    }

    pub fn refresh_assets(&self) -> RunResult {
        Command::new(env!("CARGO_BIN_EXE_asset-stage"))
            .arg("--working-dir")
            .arg(self.root())
            .arg("refresh-assets")
            .env_remove("RUST_LOG")
            .output()
            .expect("run asset-stage")
            .into()
    }

    /// Relative file paths under `rel`, sorted, following symlinks.
    pub fn files_under(&self, rel: &str) -> Vec<String> {
        let root = self.path(rel);
        let mut files = Vec::new();
        collect_files(&root, &root, &mut files);
        files.sort();
        files
    }
}

pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directory");
    }
    std::fs::write(path, contents.as_bytes()).expect("write file");
}

fn collect_files(root: &Path, dir: &Path, files: &mut Vec<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.expect("dir entry").path();
        if path.is_dir() {
            collect_files(root, &path, files);
        } else {
            let rel = path.strip_prefix(root).expect("strip root");
            files.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
}
