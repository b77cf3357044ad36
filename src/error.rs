//! Error types for tag operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use xattr_bridge::XattrError;

/// Result type for tag operations
pub type Result<T> = std::result::Result<T, TagError>;

/// Errors raised by tag backends
#[derive(Error, Debug)]
pub enum TagError {
    /// Tag is empty or contains a character the backend cannot store
    #[error("Invalid tag {tag:?}: {reason}")]
    InvalidTag {
        /// Offending tag
        tag: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Delimiter cannot separate tags
    #[error("Invalid delimiter {delimiter:?}: {reason}")]
    InvalidDelimiter {
        /// Offending delimiter
        delimiter: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The attribute store rejected the operation
    #[error("Attribute store error: {0}")]
    Store(#[from] XattrError),

    /// A tag file could not be read or written
    #[error("Tag file error at {}: {source}", path.display())]
    File {
        /// Tag file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A tag file exists but its contents are not a tag store
    #[error("Invalid tag file format at {}: {reason}", path.display())]
    InvalidFileFormat {
        /// Tag file
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// A tag file was written by an incompatible store version
    #[error("Tag file {} has version {found}, expected {expected}", path.display())]
    VersionMismatch {
        /// Tag file
        path: PathBuf,
        /// Version recorded in the file
        found: String,
        /// Version this build writes
        expected: &'static str,
    },
}

impl TagError {
    /// Coarse error kind, reusing the attribute store's classification
    #[must_use]
    pub fn kind(&self) -> xattr_bridge::ErrorKind {
        match self {
            Self::InvalidTag { .. } | Self::InvalidDelimiter { .. } => {
                xattr_bridge::ErrorKind::InvalidArgument
            }
            Self::Store(e) => e.kind(),
            Self::File { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                xattr_bridge::ErrorKind::NotFound
            }
            Self::File { .. } | Self::InvalidFileFormat { .. } | Self::VersionMismatch { .. } => {
                xattr_bridge::ErrorKind::Io
            }
        }
    }

    pub(crate) fn file(path: &std::path::Path, source: io::Error) -> Self {
        Self::File {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn format(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::InvalidFileFormat {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
