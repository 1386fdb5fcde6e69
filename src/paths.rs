//! Lexical path helpers shared by config resolution, conflict detection and
//! the transfer engine.
//!
//! Nothing here touches the filesystem: staged paths are compared and linked
//! exactly as configured, without resolving symlinks along the way.
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Collapse `.` and `..` components and drop any trailing separator.
///
/// `..` never climbs above the root of an absolute path; on a relative path
/// leading `..` components are kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            Component::Normal(part) => normalized.push(part),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

/// Resolve a configured path against `base` unless it is already absolute.
pub fn resolve_against(base: &Path, raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Render a directory as a string that always ends with a separator, so a
/// plain prefix test means "is the same directory or contains it".
pub fn dir_key(path: &Path) -> String {
    let mut key = normalize_path(path).to_string_lossy().into_owned();
    if !key.ends_with(MAIN_SEPARATOR) && !key.ends_with('/') {
        key.push(MAIN_SEPARATOR);
    }
    key
}

/// Shortest relative path leading from directory `from_dir` to `to`.
///
/// Both inputs are expected to be normalized absolute paths. When they share
/// no common ancestor (different drive prefixes) `to` is returned unchanged.
pub fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component<'_>> = from_dir.components().collect();
    let target: Vec<Component<'_>> = to.components().collect();
    let common = from
        .iter()
        .zip(&target)
        .take_while(|(left, right)| left == right)
        .count();
    if common == 0 {
        return to.to_path_buf();
    }

    let mut relative = PathBuf::new();
    for _ in common..from.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

/// True when `raw` names a stream wrapper (`scheme://...`) rather than a
/// local filesystem path.
pub fn is_stream_url(raw: &Path) -> bool {
    let text = raw.to_string_lossy();
    match text.split_once("://") {
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '.'))
        }
        None => false,
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
