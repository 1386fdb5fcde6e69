//! Top-level staging run.
//!
//! A run resolves configuration, checks target overlaps, wipes every
//! destination directory, stages each package in host order and finally
//! removes destination directories that received nothing.
use crate::config::{resolve_config, Config, FileSpec, RootOptions, Strategy};
use crate::conflict::validate_targets;
use crate::error::StageError;
use crate::host::{Package, PackageSource};
use crate::mapping::MappingResolver;
use crate::output::ProgressSink;
use crate::paths::normalize_path;
use crate::transfer::{copy_or_link, read_dir_sorted, remove_entry};
use anyhow::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What a run did, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingReport {
    pub packages_staged: Vec<String>,
    pub entries_staged: usize,
    pub directories_removed: Vec<PathBuf>,
}

/// Per-directory "received content this run" flags. Packages sharing a
/// destination directory share its flag.
#[derive(Debug, Default)]
struct DirectoryUsage {
    used: BTreeMap<PathBuf, bool>,
}

impl DirectoryUsage {
    fn track(&mut self, dir: &Path) {
        self.used.entry(dir.to_path_buf()).or_insert(false);
    }

    fn mark_used(&mut self, dir: &Path) {
        self.used.insert(dir.to_path_buf(), true);
    }

    fn unused(&self) -> impl Iterator<Item = &Path> {
        self.used
            .iter()
            .filter(|(_, used)| !**used)
            .map(|(dir, _)| dir.as_path())
    }
}

pub struct StagingOrchestrator<'a> {
    source: &'a dyn PackageSource,
    mappings: &'a MappingResolver,
    sink: &'a mut dyn ProgressSink,
}

impl<'a> StagingOrchestrator<'a> {
    pub fn new(
        source: &'a dyn PackageSource,
        mappings: &'a MappingResolver,
        sink: &'a mut dyn ProgressSink,
    ) -> Self {
        Self {
            source,
            mappings,
            sink,
        }
    }

    /// Run a full staging pass. Any error aborts the run.
    pub fn run(&mut self) -> Result<StagingReport> {
        let packages = self.source.packages()?;
        if packages.is_empty() {
            debug!("no installed packages; nothing to stage");
            return Ok(StagingReport::default());
        }

        let root = RootOptions::from_source(self.source);
        let config = resolve_config(&root, &packages, self.mappings)?;
        validate_targets(&config.output_dir, &config.targets)?;
        let strategy = config.strategy.effective();
        debug!(
            output_dir = %config.output_dir.display(),
            %strategy,
            "resolved asset configuration"
        );

        let mut usage = prepare_directories(&config)?;
        let mut report = StagingReport::default();
        for package in &packages {
            let staged = self.process_package(package, &config, strategy)?;
            if staged > 0 {
                usage.mark_used(config.usage_dir_for(&package.name));
                report.packages_staged.push(package.name.clone());
                report.entries_staged += staged;
            }
        }

        for dir in usage.unused() {
            debug!(dir = %dir.display(), "removing directory without assets");
            remove_entry(dir)?;
            report.directories_removed.push(dir.to_path_buf());
        }

        info!(
            packages = report.packages_staged.len(),
            entries = report.entries_staged,
            "asset staging finished"
        );
        Ok(report)
    }

    /// Stage one package, returning how many entries were placed.
    fn process_package(
        &mut self,
        package: &Package,
        config: &Config,
        strategy: Strategy,
    ) -> Result<usize, StageError> {
        if !package.install_path.is_dir() {
            debug!(package = package.name.as_str(), "install directory missing; skipping");
            return Ok(0);
        }
        let Some(spec) = config.file_lists.get(&package.name) else {
            return Ok(0);
        };

        let dest = config.destination_for(&package.name);
        self.sink.package(&package.name);
        match spec {
            FileSpec::AllFiles => {
                copy_or_link(&package.install_path, &dest, strategy)?;
                Ok(1)
            }
            FileSpec::ExplicitList(entries) => {
                let mut staged = 0;
                for entry in entries {
                    staged += self.stage_entry(package, entry, &dest, strategy)?;
                }
                Ok(staged)
            }
            FileSpec::SingleEntry { path, flatten } => {
                let source = entry_source(package, path)?;
                if *flatten && source.is_dir() {
                    self.stage_children(path, &source, &dest, strategy)
                } else {
                    self.stage_entry(package, path, &dest, strategy)
                }
            }
        }
    }

    fn stage_entry(
        &mut self,
        package: &Package,
        entry: &str,
        dest: &Path,
        strategy: Strategy,
    ) -> Result<usize, StageError> {
        let source = entry_source(package, entry)?;
        let Some(name) = source.file_name() else {
            return Err(StageError::InvalidEntry {
                entry: entry.to_string(),
                package: package.name.clone(),
            });
        };
        self.report_entry(entry, &source);
        copy_or_link(&source, &dest.join(name), strategy)?;
        Ok(1)
    }

    /// Stage each immediate child of `source` directly under `dest`.
    fn stage_children(
        &mut self,
        entry: &str,
        source: &Path,
        dest: &Path,
        strategy: Strategy,
    ) -> Result<usize, StageError> {
        let children = read_dir_sorted(source)?;
        for child in &children {
            let Some(name) = child.file_name() else {
                continue;
            };
            let label = format!("{}/{}", entry.trim_end_matches('/'), name.to_string_lossy());
            self.report_entry(&label, child);
            copy_or_link(child, &dest.join(name), strategy)?;
        }
        Ok(children.len())
    }

    fn report_entry(&mut self, entry: &str, source: &Path) {
        if source.is_dir() {
            self.sink.directory(entry);
        } else {
            self.sink.file(entry);
        }
    }
}

/// Wipe the output directory and every per-package target. Only the output
/// directory is recreated; targets come back when something lands in them.
fn prepare_directories(config: &Config) -> Result<DirectoryUsage, StageError> {
    let mut usage = DirectoryUsage::default();

    remove_entry(&config.output_dir)?;
    fs::create_dir_all(&config.output_dir)
        .map_err(|err| StageError::io("create", &config.output_dir, err))?;
    usage.track(&config.output_dir);

    for target in config.targets.values() {
        remove_entry(target)?;
        usage.track(target);
    }
    Ok(usage)
}

/// Resolve a configured entry inside the package. Absolute entries and
/// entries climbing out of the install directory are rejected.
fn entry_source(package: &Package, entry: &str) -> Result<PathBuf, StageError> {
    let install_path = normalize_path(&package.install_path);
    let source = normalize_path(&install_path.join(entry));
    if Path::new(entry).has_root() || !source.starts_with(&install_path) {
        return Err(StageError::InvalidEntry {
            entry: entry.to_string(),
            package: package.name.clone(),
        });
    }
    if fs::symlink_metadata(&source).is_err() {
        return Err(StageError::FileNotFound {
            entry: entry.to_string(),
            package: package.name.clone(),
        });
    }
    Ok(source)
}

#[cfg(test)]
#[path = "staging_tests.rs"]
mod tests;
