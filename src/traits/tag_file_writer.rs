//! TagFileWriter trait for tag store file formats
//!
//! A writer owns one on-disk encoding of a [`TagStore`]. The file-backed tag
//! backend and format conversion only see this trait.

use crate::error::Result;
use crate::writers::TagStore;
use std::fmt::Debug;
use std::path::Path;

/// Read and write a whole tag store in one file format
pub trait TagFileWriter: Debug {
    /// File extension for this format, without the leading dot
    fn extension(&self) -> &'static str;

    /// Characters that cannot appear in a tag stored in this format
    fn prohibited_characters(&self) -> &'static [char];

    /// Load the tag store saved at `path`
    ///
    /// # Errors
    ///
    /// Returns `TagError::File` if the file cannot be read,
    /// `TagError::InvalidFileFormat` if it is not a tag store, and
    /// `TagError::VersionMismatch` if it was written by an incompatible
    /// store version.
    fn load_from(&self, path: &Path) -> Result<TagStore>;

    /// Replace the file at `path` with `store`
    ///
    /// # Errors
    ///
    /// Returns `TagError::File` if the file cannot be written.
    fn save_to(&self, path: &Path, store: &TagStore) -> Result<()>;
}
