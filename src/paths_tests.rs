use super::{dir_key, is_stream_url, normalize_path, relative_path, resolve_against};
use std::path::{Path, PathBuf};

#[test]
fn normalize_collapses_dots_and_trailing_separator() {
    assert_eq!(
        normalize_path(Path::new("/srv/app/vendor/../assets/./js/")),
        PathBuf::from("/srv/app/assets/js")
    );
    assert_eq!(normalize_path(Path::new("/..")), PathBuf::from("/"));
    assert_eq!(normalize_path(Path::new("../a/..")), PathBuf::from(".."));
    assert_eq!(normalize_path(Path::new("./")), PathBuf::from("."));
}

#[test]
fn resolve_against_keeps_absolute_paths() {
    let base = Path::new("/srv/app");
    assert_eq!(
        resolve_against(base, "/var/www/assets/"),
        PathBuf::from("/var/www/assets")
    );
    assert_eq!(
        resolve_against(base, "public/../www/assets"),
        PathBuf::from("/srv/app/www/assets")
    );
}

#[test]
fn dir_key_appends_one_separator() {
    let key = dir_key(Path::new("/out/a/"));
    assert!(key.ends_with(std::path::MAIN_SEPARATOR));
    assert!(!dir_key(Path::new("/out/ab")).starts_with(&key));
    assert!(dir_key(Path::new("/out/a/sub")).starts_with(&key));
}

#[test]
fn relative_path_walks_up_to_common_ancestor() {
    let rel = relative_path(
        Path::new("/srv/app/www/assets/nette/forms"),
        Path::new("/srv/app/vendor/nette/forms/src/assets/netteForms.js"),
    );
    assert_eq!(
        rel,
        PathBuf::from("../../../../vendor/nette/forms/src/assets/netteForms.js")
    );
}

#[test]
fn relative_path_to_sibling_and_self() {
    assert_eq!(
        relative_path(Path::new("/a/b"), Path::new("/a/b/c.js")),
        PathBuf::from("c.js")
    );
    assert_eq!(
        relative_path(Path::new("/a/b"), Path::new("/a/b")),
        PathBuf::from(".")
    );
}

#[test]
fn stream_urls_are_detected_by_scheme() {
    assert!(is_stream_url(Path::new("phar://archive.phar/file.js")));
    assert!(!is_stream_url(Path::new("/srv/app/file.js")));
    assert!(!is_stream_url(Path::new("C:/x")));
}
