//! JSON tag files
//!
//! ```json
//! {"version": "v2.0.0", "data": {"/photos/a.jpg": ["red", "blue"]}}
//! ```

use super::{check_version, write_atomically, TagStore};
use crate::error::{Result, TagError};
use crate::traits::TagFileWriter;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Reads and writes [`TagStore`]s as JSON objects
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileWriter;

/// Only the version, so an incompatible store is reported as such even if
/// the rest of its layout changed
#[derive(Deserialize)]
struct VersionHeader {
    version: String,
}

impl TagFileWriter for JsonFileWriter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn prohibited_characters(&self) -> &'static [char] {
        // serde_json escapes everything a tag can contain
        &[]
    }

    fn load_from(&self, path: &Path) -> Result<TagStore> {
        let bytes = fs::read(path).map_err(|e| TagError::file(path, e))?;

        let header: VersionHeader =
            serde_json::from_slice(&bytes).map_err(|e| TagError::format(path, e.to_string()))?;
        check_version(path, &header.version)?;

        let store: TagStore =
            serde_json::from_slice(&bytes).map_err(|e| TagError::format(path, e.to_string()))?;
        tracing::debug!(
            "Loaded {} tagged files from {}",
            store.tags.len(),
            path.display()
        );
        Ok(store)
    }

    fn save_to(&self, path: &Path, store: &TagStore) -> Result<()> {
        let bytes =
            serde_json::to_vec_pretty(store).map_err(|e| TagError::format(path, e.to_string()))?;
        write_atomically(path, &bytes)?;
        tracing::debug!(
            "Saved {} tagged files to {}",
            store.tags.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tags.json");

        let mut store = TagStore::new();
        store
            .tags
            .insert("/photos/a.jpg".to_string(), vec!["red".into(), "say \"hi\"".into()]);
        JsonFileWriter.save_to(&path, &store).unwrap();

        assert_eq!(JsonFileWriter.load_from(&path).unwrap(), store);
        assert!(!temp_dir.path().join("tags.json.tmpstore").exists());
    }

    #[test]
    fn test_reads_compact_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tags.json");
        fs::write(
            &path,
            r#"{"version": "v2.1.0", "data": {"/a": ["x", "y"], "/b": []}}"#,
        )
        .unwrap();

        let store = JsonFileWriter.load_from(&path).unwrap();
        assert_eq!(store.version, "v2.1.0");
        assert_eq!(store.tags["/a"], ["x", "y"]);
        assert!(store.tags["/b"].is_empty());
    }

    #[test]
    fn test_rejects_other_major_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tags.json");
        fs::write(&path, r#"{"version": "v1.0.0", "data": {"/a": [{"value": "x"}]}}"#).unwrap();

        assert!(matches!(
            JsonFileWriter.load_from(&path),
            Err(TagError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_non_store_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tags.json");

        for contents in ["[1, 2, 3]", r#"{"version": "v2.0.0"}"#, "not json"] {
            fs::write(&path, contents).unwrap();
            assert!(
                matches!(
                    JsonFileWriter.load_from(&path),
                    Err(TagError::InvalidFileFormat { .. })
                ),
                "{contents:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = JsonFileWriter
            .load_from(&temp_dir.path().join("missing.json"))
            .unwrap_err();
        assert_eq!(err.kind(), xattr_bridge::ErrorKind::NotFound);
    }
}
