//! The narrow view of the dependency manager that staging needs.
//!
//! A host exposes installed packages in its canonical order plus raw root
//! options; everything else about the host stays out of the core.
use anyhow::Result;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// One installed package, snapshotted for a single staging run.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub install_path: PathBuf,
    /// Package-declared `extra` metadata.
    pub extras: Map<String, Value>,
}

impl Package {
    pub fn new(name: impl Into<String>, version: impl Into<String>, install_path: PathBuf) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            install_path,
            extras: Map::new(),
        }
    }

    /// Attach package-declared `extra` metadata.
    pub fn with_extras(mut self, extras: Map<String, Value>) -> Self {
        self.extras = extras;
        self
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key).filter(|value| !value.is_null())
    }
}

/// Read-only access to installed packages and root configuration.
pub trait PackageSource {
    /// Installed packages in the host's canonical (dependency-resolved) order.
    fn packages(&self) -> Result<Vec<Package>>;

    /// A raw root-level option, `None` when absent.
    fn root_option(&self, key: &str) -> Option<&Value>;

    /// Directory packages are installed under; relative asset paths resolve
    /// against its parent.
    fn vendor_dir(&self) -> &Path;
}
