//! Tests for the extended attribute tag backends

mod common;

use common::{raw_value, xattr_file};
use tempfile::TempDir;
use xattr_tags::backends::{LazyBackend, XattrTagBackend};
use xattr_tags::traits::TagBackend;
use xattr_tags::TagError;

const KEY: &str = "user.test.tags";

/// Tags are appended to one delimited attribute and read back in order
#[test]
fn test_add_and_load_tags() {
    let temp_dir = TempDir::new().unwrap();
    let Some(path) = xattr_file(&temp_dir, "photo.jpg") else {
        return;
    };
    let mut backend = XattrTagBackend::new(KEY, ",").unwrap();

    assert!(backend.load_tags(&path).unwrap().is_empty());

    backend.add_tag(&path, "red").unwrap();
    backend.add_tag(&path, "blue").unwrap();

    assert_eq!(backend.load_tags(&path).unwrap(), ["red", "blue"]);
    assert_eq!(raw_value(&path, KEY).as_deref(), Some("red,blue"));
}

/// Removing a tag rewrites the remaining list
#[test]
fn test_remove_tag_rewrites_list() {
    let temp_dir = TempDir::new().unwrap();
    let Some(path) = xattr_file(&temp_dir, "photo.jpg") else {
        return;
    };
    let mut backend = XattrTagBackend::new(KEY, ";").unwrap();

    for tag in ["red", "green", "red", "blue"] {
        backend.add_tag(&path, tag).unwrap();
    }
    backend.remove_tag(&path, "red").unwrap();

    assert_eq!(backend.load_tags(&path).unwrap(), ["green", "blue"]);
    assert_eq!(raw_value(&path, KEY).as_deref(), Some("green;blue"));

    // Removing the last tags leaves an empty attribute behind
    backend.remove_tag(&path, "green").unwrap();
    backend.remove_tag(&path, "blue").unwrap();
    assert!(backend.load_tags(&path).unwrap().is_empty());
    assert_eq!(raw_value(&path, KEY).as_deref(), Some(""));
}

/// Removing a tag that is not there leaves the file untouched
#[test]
fn test_remove_absent_tag_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let Some(path) = xattr_file(&temp_dir, "photo.jpg") else {
        return;
    };
    let mut backend = XattrTagBackend::new(KEY, ",").unwrap();

    backend.remove_tag(&path, "red").unwrap();
    assert_eq!(raw_value(&path, KEY), None);

    backend.add_tag(&path, "blue").unwrap();
    backend.remove_tag(&path, "red").unwrap();
    assert_eq!(raw_value(&path, KEY).as_deref(), Some("blue"));
}

/// Empty entries written by other tools are skipped on load
#[test]
fn test_load_skips_empty_entries() {
    let temp_dir = TempDir::new().unwrap();
    let Some(path) = xattr_file(&temp_dir, "doc.txt") else {
        return;
    };
    xattr::set(&path, KEY, b",red,,blue,").unwrap();

    let backend = XattrTagBackend::new(KEY, ",").unwrap();
    assert_eq!(backend.load_tags(&path).unwrap(), ["red", "blue"]);
}

/// Clearing removes the attribute and tolerates an untagged file
#[test]
fn test_clear_tags() {
    let temp_dir = TempDir::new().unwrap();
    let Some(path) = xattr_file(&temp_dir, "doc.txt") else {
        return;
    };
    let mut backend = XattrTagBackend::new(KEY, ",").unwrap();

    backend.add_tag(&path, "red").unwrap();
    backend.clear_tags(&path).unwrap();
    assert_eq!(raw_value(&path, KEY), None);

    backend.clear_tags(&path).unwrap();
}

/// Tags that would corrupt the list are rejected before touching the file
#[test]
fn test_rejects_tag_containing_delimiter() {
    let temp_dir = TempDir::new().unwrap();
    let Some(path) = xattr_file(&temp_dir, "doc.txt") else {
        return;
    };
    let mut backend = XattrTagBackend::new(KEY, ",").unwrap();

    let err = backend.add_tag(&path, "red,blue").unwrap_err();
    assert!(matches!(err, TagError::InvalidTag { .. }));
    assert!(matches!(
        backend.add_tag(&path, ""),
        Err(TagError::InvalidTag { .. })
    ));
    assert_eq!(raw_value(&path, KEY), None);
}

/// An empty delimiter would merge tags, so no backend can be built with one
#[test]
fn test_rejects_empty_delimiter() {
    let temp_dir = TempDir::new().unwrap();
    let Some(path) = xattr_file(&temp_dir, "doc.txt") else {
        return;
    };

    let err = XattrTagBackend::new(KEY, "").unwrap_err();
    assert!(matches!(err, TagError::InvalidDelimiter { .. }));
    assert_eq!(err.kind(), xattr_bridge::ErrorKind::InvalidArgument);
    assert_eq!(raw_value(&path, KEY), None);

    // The same tags with a real delimiter stay separate
    let mut backend = XattrTagBackend::new(KEY, ";").unwrap();
    backend.add_tag(&path, "red").unwrap();
    backend.add_tag(&path, "blue").unwrap();
    backend.remove_tag(&path, "red").unwrap();
    assert_eq!(backend.load_tags(&path).unwrap(), ["blue"]);
}

/// Operations on a missing file surface the store error
#[test]
fn test_missing_file_is_store_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");
    let mut backend = XattrTagBackend::new(KEY, ",").unwrap();

    assert!(matches!(
        backend.load_tags(&missing),
        Err(TagError::Store(_))
    ));
    assert!(matches!(
        backend.clear_tags(&missing),
        Err(TagError::Store(_))
    ));
    let err = backend.add_tag(&missing, "red").unwrap_err();
    assert_eq!(err.kind(), xattr_bridge::ErrorKind::NotFound);
}

/// The lazy backend writes nothing until commit, then applies in order
#[test]
fn test_lazy_backend_defers_writes() {
    let temp_dir = TempDir::new().unwrap();
    let Some(path) = xattr_file(&temp_dir, "doc.txt") else {
        return;
    };
    let mut lazy = LazyBackend::new(XattrTagBackend::new(KEY, ",").unwrap());

    lazy.add_tag(&path, "red").unwrap();
    lazy.add_tag(&path, "blue").unwrap();
    lazy.remove_tag(&path, "red").unwrap();
    assert_eq!(raw_value(&path, KEY), None);
    assert_eq!(lazy.pending_len(), 3);

    lazy.commit_transactions().unwrap();
    assert_eq!(lazy.pending_len(), 0);
    assert_eq!(lazy.load_tags(&path).unwrap(), ["blue"]);

    lazy.clear_tags(&path).unwrap();
    assert_eq!(lazy.load_tags(&path).unwrap(), ["blue"]);
    lazy.commit_transactions().unwrap();
    assert_eq!(raw_value(&path, KEY), None);
}

/// A rejected queued tag stops the commit and stays queued
#[test]
fn test_lazy_backend_stops_at_failure() {
    let temp_dir = TempDir::new().unwrap();
    let Some(path) = xattr_file(&temp_dir, "doc.txt") else {
        return;
    };
    let mut lazy = LazyBackend::new(XattrTagBackend::new(KEY, ",").unwrap());

    lazy.add_tag(&path, "red").unwrap();
    lazy.add_tag(&path, "a,b").unwrap();
    lazy.add_tag(&path, "blue").unwrap();

    assert!(lazy.commit_transactions().is_err());
    assert_eq!(lazy.load_tags(&path).unwrap(), ["red"]);
    assert_eq!(lazy.pending_len(), 2);
}
