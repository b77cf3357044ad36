//! Moving tags between stores
//!
//! [`copy_tags`] copies the tags of a set of files from one backend to
//! another, which covers both extended attributes to tag file (export) and
//! tag file to extended attributes (import). [`convert_file`] rewrites a tag
//! file in another format.

use crate::error::{Result, TagError};
use crate::traits::TagBackend;
use crate::writers::FileFormat;
use std::path::{Path, PathBuf};
use xattr_bridge::ErrorKind;

/// Outcome of [`copy_tags`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyReport {
    /// Files whose tags were written to the target
    pub copied: usize,
    /// Files that no longer exist
    pub skipped: Vec<PathBuf>,
}

/// Make the target's tags of each file in `paths` equal the source's
///
/// Files without tags in the source are left alone in the target. Files
/// that no longer exist are skipped and reported. The target is committed
/// once at the end.
///
/// # Errors
///
/// Returns the first error other than a missing file. Changes already made
/// to an immediate target stay applied.
pub fn copy_tags<'a, S, T>(
    paths: impl IntoIterator<Item = &'a Path>,
    source: &S,
    target: &mut T,
) -> Result<CopyReport>
where
    S: TagBackend + ?Sized,
    T: TagBackend + ?Sized,
{
    let mut report = CopyReport::default();

    for path in paths {
        match copy_one(path, source, target) {
            Ok(true) => report.copied += 1,
            Ok(false) => {}
            Err(TagError::Store(e))
                if e.kind() == ErrorKind::NotFound && !e.is_attribute_missing() =>
            {
                tracing::warn!("Skipping {}: {e}", path.display());
                report.skipped.push(path.to_path_buf());
            }
            Err(e) => return Err(e),
        }
    }

    target.commit_transactions()?;
    tracing::info!(
        "Copied tags of {} files ({} skipped)",
        report.copied,
        report.skipped.len()
    );
    Ok(report)
}

fn copy_one<S, T>(path: &Path, source: &S, target: &mut T) -> Result<bool>
where
    S: TagBackend + ?Sized,
    T: TagBackend + ?Sized,
{
    let tags = source.load_tags(path)?;
    if tags.is_empty() {
        return Ok(false);
    }
    target.clear_tags(path)?;
    for tag in &tags {
        target.add_tag(path, tag)?;
    }
    tracing::debug!("Copied {} tags of {}", tags.len(), path.display());
    Ok(true)
}

/// Rewrite the tag file at `source` (in format `from`) as format `to`
///
/// The new file sits next to `source` with the extension of `to`. Returns
/// its path.
///
/// # Errors
///
/// Returns an error if `source` cannot be loaded, if source and destination
/// are the same file, or if the destination cannot be written.
pub fn convert_file(source: &Path, from: FileFormat, to: FileFormat) -> Result<PathBuf> {
    let destination = source.with_extension(to.extension());
    if destination == source {
        return Err(TagError::format(
            source,
            "source is already in the requested format",
        ));
    }

    let store = from.writer().load_from(source)?;
    to.writer().save_to(&destination, &store)?;
    tracing::info!(
        "Converted {} to {}",
        source.display(),
        destination.display()
    );
    Ok(destination)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::backends::FileTagBackend;
    use tempfile::TempDir;

    #[test]
    fn test_convert_json_to_csv() {
        let temp_dir = TempDir::new().unwrap();
        let mut backend =
            FileTagBackend::open_in(temp_dir.path(), Some("tags"), FileFormat::Json).unwrap();
        backend.add_tag(Path::new("/a"), "red").unwrap();
        backend.add_tag(Path::new("/a"), "blue").unwrap();
        backend.commit_transactions().unwrap();

        let csv = convert_file(backend.store_path(), FileFormat::Json, FileFormat::Csv).unwrap();
        assert_eq!(csv, temp_dir.path().join("tags.csv"));

        let converted = FileTagBackend::open(&csv, FileFormat::Csv.writer()).unwrap();
        assert_eq!(converted.store(), backend.store());
    }

    #[test]
    fn test_convert_to_same_format_refused() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tags.csv");

        assert!(matches!(
            convert_file(&path, FileFormat::Csv, FileFormat::Csv),
            Err(TagError::InvalidFileFormat { .. })
        ));
    }

    #[test]
    fn test_copy_between_file_stores_replaces_tags() {
        let temp_dir = TempDir::new().unwrap();
        let mut source =
            FileTagBackend::open_in(temp_dir.path(), Some("a"), FileFormat::Json).unwrap();
        let mut target =
            FileTagBackend::open_in(temp_dir.path(), Some("b"), FileFormat::Csv).unwrap();

        source.add_tag(Path::new("/x"), "red").unwrap();
        target.add_tag(Path::new("/x"), "stale").unwrap();
        target.add_tag(Path::new("/y"), "kept").unwrap();

        let paths = [Path::new("/x"), Path::new("/y")];
        let report = copy_tags(paths, &source, &mut target).unwrap();

        assert_eq!(report.copied, 1);
        assert!(report.skipped.is_empty());
        assert_eq!(target.load_tags(Path::new("/x")).unwrap(), ["red"]);
        assert_eq!(target.load_tags(Path::new("/y")).unwrap(), ["kept"]);
        assert!(!target.is_dirty());
        assert!(target.store_path().exists());
    }
}
