//! CSV tag files
//!
//! ```text
//! v2.0.0
//! path,tags
//! /photos/a.jpg,red;blue
//! ```
//!
//! The first record holds the store version, the second is a fixed header,
//! and each remaining record is a path with its tags joined by `;`.

use super::{check_version, write_atomically, TagStore};
use crate::error::{Result, TagError};
use crate::traits::TagFileWriter;
use std::path::Path;

/// Separator between the tags of one file
pub const TAG_SEPARATOR: &str = ";";

const HEADER: [&str; 2] = ["path", "tags"];

/// Reads and writes [`TagStore`]s as CSV
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFileWriter;

fn csv_error(path: &Path, err: csv::Error) -> TagError {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => TagError::file(path, e),
        _ => TagError::format(path, reason),
    }
}

impl TagFileWriter for CsvFileWriter {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn prohibited_characters(&self) -> &'static [char] {
        &[';', ',', '\n']
    }

    fn load_from(&self, path: &Path) -> Result<TagStore> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| csv_error(path, e))?;
        let mut records = reader.records();

        let version = match records.next() {
            Some(record) => record.map_err(|e| csv_error(path, e))?,
            None => return Err(TagError::format(path, "empty tag file")),
        };
        let version = version.get(0).unwrap_or_default().to_string();
        check_version(path, &version)?;

        match records.next() {
            Some(Ok(header)) if header.iter().eq(HEADER) => {}
            Some(Err(e)) => return Err(csv_error(path, e)),
            _ => return Err(TagError::format(path, "missing path,tags header")),
        }

        let mut store = TagStore {
            version,
            ..TagStore::new()
        };
        for record in records {
            let record = record.map_err(|e| csv_error(path, e))?;
            let (Some(file), Some(tags), 2) = (record.get(0), record.get(1), record.len()) else {
                return Err(TagError::format(
                    path,
                    format!("expected 2 fields, found {}", record.len()),
                ));
            };
            let tags = tags
                .split(TAG_SEPARATOR)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
            store.tags.insert(file.to_string(), tags);
        }

        tracing::debug!(
            "Loaded {} tagged files from {}",
            store.tags.len(),
            path.display()
        );
        Ok(store)
    }

    fn save_to(&self, path: &Path, store: &TagStore) -> Result<()> {
        let bytes = encode(store).map_err(|e| csv_error(path, e))?;
        write_atomically(path, &bytes)?;
        tracing::debug!(
            "Saved {} tagged files to {}",
            store.tags.len(),
            path.display()
        );
        Ok(())
    }
}

fn encode(store: &TagStore) -> csv::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(&mut bytes);
        writer.write_record([store.version.as_str()])?;
        writer.write_record(HEADER)?;
        for (file, tags) in &store.tags {
            writer.write_record([file.as_str(), tags.join(TAG_SEPARATOR).as_str()])?;
        }
        writer.flush()?;
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_save_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tags.csv");

        let mut store = TagStore::new();
        store
            .tags
            .insert("/photos/a.jpg".to_string(), vec!["red".into(), "blue".into()]);
        store
            .tags
            .insert("/photos/b, c.jpg".to_string(), vec!["green".into()]);
        CsvFileWriter.save_to(&path, &store).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "v2.0.0\npath,tags\n/photos/a.jpg,red;blue\n\"/photos/b, c.jpg\",green\n"
        );
        assert_eq!(CsvFileWriter.load_from(&path).unwrap(), store);
    }

    #[test]
    fn test_load_skips_empty_tags() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tags.csv");
        fs::write(&path, "v2.0.0\npath,tags\n/a,;x;;y;\n/b,\n").unwrap();

        let store = CsvFileWriter.load_from(&path).unwrap();
        assert_eq!(store.tags["/a"], ["x", "y"]);
        assert!(store.tags["/b"].is_empty());
    }

    #[test]
    fn test_rejects_malformed_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tags.csv");

        for contents in [
            "",
            "v2.0.0\n",
            "v2.0.0\nfile,labels\n",
            "v2.0.0\npath,tags\n/a,x,extra\n",
            "version two\npath,tags\n",
        ] {
            fs::write(&path, contents).unwrap();
            assert!(
                matches!(
                    CsvFileWriter.load_from(&path),
                    Err(TagError::InvalidFileFormat { .. })
                ),
                "{contents:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_other_major_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tags.csv");
        fs::write(&path, "v3.0.0\npath,tags\n").unwrap();

        assert!(matches!(
            CsvFileWriter.load_from(&path),
            Err(TagError::VersionMismatch { .. })
        ));
    }
}
