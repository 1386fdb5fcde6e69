//! Composer project on disk as a [`PackageSource`].
//!
//! Root options come from `composer.json` (`config`, then `extra`), installed
//! packages from `<vendor-dir>/composer/installed.json`.
use crate::host::{Package, PackageSource};
use crate::paths::{normalize_path, resolve_against};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MANIFEST_FILE: &str = "composer.json";
const DEFAULT_VENDOR_DIR: &str = "vendor";
const INSTALLED_REL: &str = "composer/installed.json";

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    config: Value,
    #[serde(default)]
    extra: Value,
}

/// One entry of `installed.json`.
#[derive(Debug, Deserialize)]
struct InstalledPackage {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    version_normalized: Option<String>,
    #[serde(default, rename = "install-path")]
    install_path: Option<String>,
    #[serde(default, rename = "target-dir")]
    target_dir: Option<String>,
    #[serde(default)]
    extra: Value,
}

/// Composer 2 wraps the list in an object; Composer 1 wrote a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstalledFile {
    Wrapped { packages: Vec<InstalledPackage> },
    Legacy(Vec<InstalledPackage>),
}

#[derive(Debug, Clone)]
pub struct ComposerProject {
    root: PathBuf,
    config: Map<String, Value>,
    extra: Map<String, Value>,
    vendor_dir: PathBuf,
}

impl ComposerProject {
    /// Load the project whose `composer.json` sits in `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("resolve project root {}", root.display()))?;
        let manifest_path = root.join(MANIFEST_FILE);
        let bytes = fs::read(&manifest_path)
            .with_context(|| format!("read {}", manifest_path.display()))?;
        let manifest: Manifest = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", manifest_path.display()))?;

        let config = into_object(manifest.config);
        let extra = into_object(manifest.extra);
        let vendor_dir = match config.get("vendor-dir") {
            None | Some(Value::Null) => root.join(DEFAULT_VENDOR_DIR),
            Some(Value::String(raw)) => resolve_against(&root, raw),
            Some(other) => return Err(anyhow!("config.vendor-dir must be a path (got {other})")),
        };

        Ok(Self {
            root,
            config,
            extra,
            vendor_dir,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn installed_path(&self) -> PathBuf {
        self.vendor_dir.join(INSTALLED_REL)
    }

    fn to_package(&self, installed: InstalledPackage) -> Package {
        // `install-path` already ends in the target-dir; only the legacy
        // layout needs it appended.
        let install_path = match installed.install_path.as_deref() {
            Some(rel) => resolve_against(&self.vendor_dir.join("composer"), rel),
            None => {
                let package_dir = self.vendor_dir.join(&installed.name);
                match installed.target_dir.as_deref().filter(|dir| !dir.is_empty()) {
                    Some(target_dir) => package_dir.join(target_dir),
                    None => package_dir,
                }
            }
        };
        let version = installed
            .version
            .or(installed.version_normalized)
            .unwrap_or_default();

        Package::new(installed.name, version, normalize_path(&install_path))
            .with_extras(into_object(installed.extra))
    }
}

impl PackageSource for ComposerProject {
    fn packages(&self) -> Result<Vec<Package>> {
        let path = self.installed_path();
        if !path.is_file() {
            debug!(path = %path.display(), "no installed packages metadata");
            return Ok(Vec::new());
        }
        let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        let installed: InstalledFile = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse installed packages {}", path.display()))?;
        let entries = match installed {
            InstalledFile::Wrapped { packages } | InstalledFile::Legacy(packages) => packages,
        };
        Ok(entries
            .into_iter()
            .map(|entry| self.to_package(entry))
            .collect())
    }

    fn root_option(&self, key: &str) -> Option<&Value> {
        self.config
            .get(key)
            .filter(|value| !value.is_null())
            .or_else(|| self.extra.get(key).filter(|value| !value.is_null()))
    }

    fn vendor_dir(&self) -> &Path {
        &self.vendor_dir
    }
}

/// PHP encodes an empty map as `[]`; anything but an object counts as empty.
fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
#[path = "composer_tests.rs"]
mod tests;
