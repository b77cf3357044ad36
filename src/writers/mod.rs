//! Tag store file formats
//!
//! A [`TagStore`] maps file paths to their tags and carries the store version
//! it was written with. Each format implements
//! [`TagFileWriter`](crate::traits::TagFileWriter).

pub mod csv_writer;
pub mod json_writer;

pub use csv_writer::CsvFileWriter;
pub use json_writer::JsonFileWriter;

use crate::error::{Result, TagError};
use crate::traits::TagFileWriter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Store version written by this build
pub const STORE_VERSION: &str = "v2.0.0";

/// File name, without extension, used when only a directory is given
pub const DEFAULT_STORE_STEM: &str = "graffiti.tagfile";

/// All tags kept in one tag file, keyed by absolute file path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStore {
    /// Version the store was written with (`vMAJOR.MINOR.PATCH`)
    pub version: String,

    /// Tags of each file, in insertion order
    #[serde(rename = "data")]
    pub tags: BTreeMap<String, Vec<String>>,
}

impl TagStore {
    /// Empty store at the current version
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: STORE_VERSION.to_string(),
            tags: BTreeMap::new(),
        }
    }
}

impl Default for TagStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Supported tag file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FileFormat {
    /// `{"version": ..., "data": {path: [tags]}}`
    Json,
    /// Version line, `path,tags` header, then `path,tag1;tag2` rows
    Csv,
}

impl FileFormat {
    /// Writer implementing this format
    #[must_use]
    pub fn writer(self) -> Box<dyn TagFileWriter> {
        match self {
            Self::Json => Box::new(JsonFileWriter),
            Self::Csv => Box::new(CsvFileWriter),
        }
    }

    /// File extension for this format, without the leading dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Format implied by the extension of `path`, if any
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if ext.eq_ignore_ascii_case("csv") {
            Some(Self::Csv)
        } else {
            None
        }
    }

    /// Use `explicit` if given, otherwise infer the format from `path`
    ///
    /// # Errors
    ///
    /// Returns `TagError::InvalidFileFormat` if no format was given and the
    /// extension of `path` is not a known one.
    pub fn resolve(path: &Path, explicit: Option<Self>) -> Result<Self> {
        explicit
            .or_else(|| Self::from_path(path))
            .ok_or_else(|| TagError::format(path, "unknown extension, choose a format explicitly"))
    }

    /// Path of a tag file inside `directory`
    ///
    /// Uses `name` as the file stem, or [`DEFAULT_STORE_STEM`] if `None`.
    #[must_use]
    pub fn store_path(self, directory: &Path, name: Option<&str>) -> PathBuf {
        directory.join(format!(
            "{}.{}",
            name.unwrap_or(DEFAULT_STORE_STEM),
            self.extension()
        ))
    }
}

fn parse_version(version: &str) -> Option<(u64, u64, u64)> {
    let mut parts = version.strip_prefix('v')?.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor, patch))
}

/// Check that a store written as `found` can be read by this build
///
/// Stores are read-compatible when their major versions match.
pub(crate) fn check_version(path: &Path, found: &str) -> Result<()> {
    let Some((major, _, _)) = parse_version(found) else {
        return Err(TagError::format(
            path,
            format!("unrecognised store version {found:?}"),
        ));
    };
    match parse_version(STORE_VERSION) {
        Some((current, _, _)) if current == major => Ok(()),
        _ => Err(TagError::VersionMismatch {
            path: path.to_path_buf(),
            found: found.to_string(),
            expected: STORE_VERSION,
        }),
    }
}

/// Replace `path` with `contents` through a sibling `.tmpstore` file
///
/// Readers see either the old store or the new one, never a partial write.
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmpstore");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents).map_err(|e| TagError::file(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        // Best effort; the rename error is the one worth reporting
        let _ = fs::remove_file(&tmp);
        TagError::file(path, e)
    })
}
