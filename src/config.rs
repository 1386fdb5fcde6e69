//! Asset configuration resolution.
//!
//! Raw option values from the root project and from each package's `extra`
//! block are parsed once per run into an immutable [`Config`]. Precedence for
//! every field is root config, then package-declared config, then the
//! built-in mapping table.
use crate::error::StageError;
use crate::host::{Package, PackageSource};
use crate::mapping::MappingResolver;
use crate::paths::{normalize_path, resolve_against};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const ASSETS_DIR_OPTION: &str = "assets-dir";
pub const ASSETS_DIRECTORY_OPTION: &str = "assets-directory";
pub const ASSETS_TARGET_OPTION: &str = "assets-target";
pub const ASSETS_FILES_OPTION: &str = "assets-files";
pub const ASSETS_STRATEGY_OPTION: &str = "assets-strategy";

/// Output directory used when neither `assets-dir` nor its alias is set.
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Which entries of a package get staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSpec {
    /// The whole package directory.
    AllFiles,
    /// Relative paths staged in order, each landing at `dest/<basename>`.
    ExplicitList(Vec<String>),
    /// One relative path. With `flatten`, a directory has each of its
    /// immediate children staged directly under the destination.
    SingleEntry { path: String, flatten: bool },
}

impl FileSpec {
    /// Parse an `assets-files` value.
    ///
    /// `Ok(None)` means the value declares nothing (`false` or `null`) and
    /// the next tier should be consulted.
    pub fn from_value(value: &Value) -> Result<Option<Self>, String> {
        match value {
            Value::Null | Value::Bool(false) => Ok(None),
            Value::Bool(true) => Ok(Some(Self::AllFiles)),
            Value::String(path) => Ok(Some(Self::SingleEntry {
                path: path.clone(),
                flatten: true,
            })),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| format!("list entries must be strings (got {item})"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(|entries| Some(Self::ExplicitList(entries))),
            Value::Object(fields) => {
                let path = fields
                    .get("path")
                    .and_then(Value::as_str)
                    .ok_or_else(|| "object form requires a string \"path\"".to_string())?;
                let flatten = match fields.get("flatten") {
                    None | Some(Value::Null) => true,
                    Some(Value::Bool(flag)) => *flag,
                    Some(other) => return Err(format!("\"flatten\" must be a boolean (got {other})")),
                };
                if let Some(unknown) = fields.keys().find(|key| *key != "path" && *key != "flatten") {
                    return Err(format!("unknown key {unknown:?} in object form"));
                }
                Ok(Some(Self::SingleEntry {
                    path: path.to_string(),
                    flatten,
                }))
            }
            Value::Number(number) => Err(format!(
                "expected true, a path, a list of paths or an object (got {number})"
            )),
        }
    }
}

/// How staged entries are materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Pick per platform once per run: copy on Windows, symlink elsewhere.
    #[default]
    Auto,
    Copy,
    Symlink,
}

impl Strategy {
    pub fn parse(raw: &str) -> Result<Self, StageError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "copy" => Ok(Self::Copy),
            "symlink" => Ok(Self::Symlink),
            _ => Err(StageError::invalid_option(
                ASSETS_STRATEGY_OPTION,
                format!("expected auto, copy or symlink (got {raw:?})"),
            )),
        }
    }

    /// Replace `Auto` with the concrete strategy for this platform.
    pub fn effective(self) -> Self {
        match self {
            Self::Auto if cfg!(windows) => Self::Copy,
            Self::Auto => Self::Symlink,
            concrete => concrete,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Copy => "copy",
            Self::Symlink => "symlink",
        };
        f.write_str(name)
    }
}

/// Root-level options as the host hands them over, before validation.
#[derive(Debug, Clone, Default)]
pub struct RootOptions {
    pub vendor_dir: PathBuf,
    pub assets_dir: Option<Value>,
    pub assets_directory: Option<Value>,
    pub assets_target: Option<Value>,
    pub assets_files: Option<Value>,
    pub assets_strategy: Option<Value>,
}

impl RootOptions {
    pub fn from_source(source: &dyn PackageSource) -> Self {
        let option = |key: &str| source.root_option(key).filter(|v| !v.is_null()).cloned();
        Self {
            vendor_dir: source.vendor_dir().to_path_buf(),
            assets_dir: option(ASSETS_DIR_OPTION),
            assets_directory: option(ASSETS_DIRECTORY_OPTION),
            assets_target: option(ASSETS_TARGET_OPTION),
            assets_files: option(ASSETS_FILES_OPTION),
            assets_strategy: option(ASSETS_STRATEGY_OPTION),
        }
    }

    /// Relative asset paths resolve against the parent of the vendor dir.
    pub fn base_dir(&self) -> PathBuf {
        normalize_path(&self.vendor_dir.join(".."))
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub output_dir: PathBuf,
    /// Per-package destination overrides, absolute and normalized.
    pub targets: BTreeMap<String, PathBuf>,
    /// Winning file spec per package after precedence is applied.
    pub file_lists: BTreeMap<String, FileSpec>,
    pub strategy: Strategy,
}

impl Config {
    /// Destination directory for a package: its override, else
    /// `output_dir/<name>`.
    pub fn destination_for(&self, package: &str) -> PathBuf {
        match self.targets.get(package) {
            Some(target) => target.clone(),
            None => self.output_dir.join(package),
        }
    }

    /// The tracked directory whose usage a package's staging counts toward.
    pub fn usage_dir_for(&self, package: &str) -> &Path {
        self.targets
            .get(package)
            .map(PathBuf::as_path)
            .unwrap_or(&self.output_dir)
    }
}

/// Merge root options, package-declared extras and built-in mappings.
pub fn resolve_config(
    root: &RootOptions,
    packages: &[Package],
    mappings: &MappingResolver,
) -> Result<Config, StageError> {
    let base_dir = root.base_dir();
    let output_dir = resolve_output_dir(root, &base_dir)?;
    let targets = resolve_targets(root.assets_target.as_ref(), &base_dir);
    let root_files = parse_root_files(root.assets_files.as_ref())?;
    let strategy = match &root.assets_strategy {
        None => Strategy::Auto,
        Some(Value::String(raw)) => Strategy::parse(raw)?,
        Some(other) => {
            return Err(StageError::invalid_option(
                ASSETS_STRATEGY_OPTION,
                format!("expected a string (got {other})"),
            ))
        }
    };

    let mut file_lists = BTreeMap::new();
    for package in packages {
        if let Some(spec) = resolve_file_spec(package, &root_files, mappings) {
            file_lists.insert(package.name.clone(), spec);
        }
    }

    Ok(Config {
        output_dir,
        targets,
        file_lists,
        strategy,
    })
}

fn resolve_output_dir(root: &RootOptions, base_dir: &Path) -> Result<PathBuf, StageError> {
    let (option, value) = match (&root.assets_dir, &root.assets_directory) {
        (Some(value), _) => (ASSETS_DIR_OPTION, Some(value)),
        (None, Some(value)) => (ASSETS_DIRECTORY_OPTION, Some(value)),
        (None, None) => (ASSETS_DIR_OPTION, None),
    };
    let raw = match value {
        None => DEFAULT_ASSETS_DIR,
        Some(Value::String(raw)) if !raw.trim().is_empty() => raw.as_str(),
        Some(other) => {
            return Err(StageError::invalid_option(
                option,
                format!("expected a non-empty path (got {other})"),
            ))
        }
    };
    Ok(resolve_against(base_dir, raw))
}

/// Parse `assets-target`. Anything but a map of strings disables overrides
/// for the whole run.
fn resolve_targets(value: Option<&Value>, base_dir: &Path) -> BTreeMap<String, PathBuf> {
    let Some(value) = value else {
        return BTreeMap::new();
    };
    let Some(entries) = value.as_object() else {
        warn!(
            option = ASSETS_TARGET_OPTION,
            "expected a mapping of package names to paths; ignoring per-package targets"
        );
        return BTreeMap::new();
    };

    let mut targets = BTreeMap::new();
    for (package, target) in entries {
        match target.as_str() {
            Some(raw) if !raw.trim().is_empty() => {
                targets.insert(package.clone(), resolve_against(base_dir, raw));
            }
            _ => {
                warn!(
                    option = ASSETS_TARGET_OPTION,
                    package = package.as_str(),
                    "target must be a non-empty path; ignoring per-package targets"
                );
                return BTreeMap::new();
            }
        }
    }
    targets
}

fn parse_root_files(value: Option<&Value>) -> Result<BTreeMap<String, FileSpec>, StageError> {
    let Some(value) = value else {
        return Ok(BTreeMap::new());
    };
    let Some(entries) = value.as_object() else {
        warn!(
            option = ASSETS_FILES_OPTION,
            "root option must be a mapping keyed by package name; ignoring it"
        );
        return Ok(BTreeMap::new());
    };

    let mut files = BTreeMap::new();
    for (package, raw) in entries {
        let spec = FileSpec::from_value(raw).map_err(|reason| {
            StageError::invalid_option(ASSETS_FILES_OPTION, format!("{package}: {reason}"))
        })?;
        if let Some(spec) = spec {
            files.insert(package.clone(), spec);
        }
    }
    Ok(files)
}

fn resolve_file_spec(
    package: &Package,
    root_files: &BTreeMap<String, FileSpec>,
    mappings: &MappingResolver,
) -> Option<FileSpec> {
    if let Some(spec) = root_files.get(&package.name) {
        debug!(package = package.name.as_str(), "using root assets-files entry");
        return Some(spec.clone());
    }

    if let Some(raw) = package.extra(ASSETS_FILES_OPTION) {
        match FileSpec::from_value(raw) {
            Ok(Some(spec)) => {
                debug!(package = package.name.as_str(), "using package-declared assets-files");
                return Some(spec);
            }
            Ok(None) => {}
            Err(reason) => warn!(
                package = package.name.as_str(),
                "ignoring malformed package-declared assets-files: {reason}"
            ),
        }
    }

    let spec = mappings.resolve(&package.name, &package.version)?;
    debug!(package = package.name.as_str(), "using built-in asset mapping");
    Some(spec.clone())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
