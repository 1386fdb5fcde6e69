//! Filesystem staging of a single (source, destination, strategy) unit.
use crate::config::Strategy;
use crate::error::StageError;
use crate::paths::{is_stream_url, normalize_path, relative_path};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Place `source` at `dest` by copying or by a relative symlink.
///
/// `strategy` must already be concrete; `Auto` is rejected.
pub fn copy_or_link(source: &Path, dest: &Path, strategy: Strategy) -> Result<(), StageError> {
    let source = normalize_path(source);
    let dest = normalize_path(dest);

    if !is_stream_url(&source) && !source.exists() {
        return Err(StageError::SourceMissing { path: source });
    }
    ensure_parent(&source);
    ensure_parent(&dest);

    match strategy {
        Strategy::Symlink => link(&source, &dest),
        Strategy::Copy if source.is_dir() => copy_dir(&source, &dest),
        Strategy::Copy => {
            clear_link(&dest)?;
            copy_file(&source, &dest)
        }
        Strategy::Auto => Err(StageError::UnknownStrategy(strategy.to_string())),
    }
}

/// Remove whatever sits at `path`, without following symlinks.
pub fn remove_entry(path: &Path) -> Result<(), StageError> {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return Ok(());
    };
    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        remove_file_or_link(path)
    };
    result.map_err(|err| StageError::io("remove", path, err))
}

/// Parent creation is best-effort; the operation that follows reports any
/// real failure.
fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.is_dir() {
            let _ = fs::create_dir_all(parent);
        }
    }
}

fn link(source: &Path, dest: &Path) -> Result<(), StageError> {
    remove_entry(dest)?;
    let link_dir = dest.parent().unwrap_or_else(|| Path::new("/"));
    let target = relative_path(link_dir, source);
    debug!(link = %dest.display(), target = %target.display(), "create symlink");
    create_symlink(&target, source.is_dir(), dest)
        .map_err(|err| StageError::io("symlink", dest, err))
}

#[cfg(unix)]
fn create_symlink(target: &Path, _is_dir: bool, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, is_dir: bool, link: &Path) -> std::io::Result<()> {
    if is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(windows)]
fn remove_file_or_link(path: &Path) -> std::io::Result<()> {
    // Directory symlinks on Windows are removed as directories.
    fs::remove_file(path).or_else(|_| fs::remove_dir(path))
}

#[cfg(not(windows))]
fn remove_file_or_link(path: &Path) -> std::io::Result<()> {
    fs::remove_file(path)
}

/// A leftover symlink at `dest` would make a copy write through into the
/// linked package, so drop it first.
fn clear_link(dest: &Path) -> Result<(), StageError> {
    match fs::symlink_metadata(dest) {
        Ok(metadata) if metadata.file_type().is_symlink() => remove_entry(dest),
        _ => Ok(()),
    }
}

fn copy_file(source: &Path, dest: &Path) -> Result<(), StageError> {
    fs::copy(source, dest)
        .map(|_| ())
        .map_err(|err| StageError::io("copy", source, err))
}

/// Mirror `source` into `dest`. Entries already at the top level of `dest`
/// are removed first; deeper levels are only added to.
fn copy_dir(source: &Path, dest: &Path) -> Result<(), StageError> {
    clear_link(dest)?;
    if dest.is_dir() {
        for entry in read_dir_sorted(dest)? {
            remove_entry(&entry)?;
        }
    } else if dest.exists() {
        remove_entry(dest)?;
    }
    mirror_dir(source, dest)
}

fn mirror_dir(source: &Path, dest: &Path) -> Result<(), StageError> {
    fs::create_dir_all(dest).map_err(|err| StageError::io("create", dest, err))?;
    for entry in read_dir_sorted(source)? {
        let Some(name) = entry.file_name() else {
            continue;
        };
        let target = dest.join(name);
        if entry.is_dir() {
            mirror_dir(&entry, &target)?;
        } else {
            clear_link(&target)?;
            copy_file(&entry, &target)?;
        }
    }
    Ok(())
}

pub(crate) fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>, StageError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|err| StageError::io("read", dir, err))? {
        let entry = entry.map_err(|err| StageError::io("read", dir, err))?;
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
#[path = "transfer_tests.rs"]
mod tests;
