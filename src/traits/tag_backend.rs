//! TagBackend trait for storing tags against files
//!
//! A backend owns the encoding of a file's tag set. Implementations may apply
//! changes immediately or queue them until [`TagBackend::commit_transactions`].

use crate::error::Result;
use std::path::Path;

/// Add, remove, load and clear the tags of a file
///
/// # Examples
///
/// ```rust,ignore
/// let mut backend = XattrTagBackend::default();
/// backend.add_tag(path, "red")?;
/// backend.add_tag(path, "blue")?;
/// assert_eq!(backend.load_tags(path)?, vec!["red", "blue"]);
/// backend.clear_tags(path)?;
/// ```
pub trait TagBackend {
    /// Add a tag to the file at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is invalid for this backend or the
    /// underlying store rejects the write.
    fn add_tag(&mut self, path: &Path, tag: &str) -> Result<()>;

    /// Remove every occurrence of `tag` from the file at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the current tags cannot be read or the new tag
    /// list cannot be written.
    fn remove_tag(&mut self, path: &Path, tag: &str) -> Result<()>;

    /// Load the tags of the file at `path`, in stored order
    ///
    /// A file with no tags yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn load_tags(&self, path: &Path) -> Result<Vec<String>>;

    /// Drop all tags of the file at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the removal. A file that has no
    /// tags is not an error.
    fn clear_tags(&mut self, path: &Path) -> Result<()>;

    /// Apply any deferred changes
    ///
    /// Backends that write immediately keep the default, which does nothing.
    ///
    /// # Errors
    ///
    /// Returns the first error hit while applying deferred changes.
    fn commit_transactions(&mut self) -> Result<()> {
        Ok(())
    }
}
