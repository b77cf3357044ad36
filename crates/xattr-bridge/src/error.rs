//! Error types for extended attribute access
//!
//! Every failure carries a kind, an error domain, an optional OS error code
//! and a human-readable message. OS failures keep their `errno` so callers
//! can tell "attribute missing" apart from "file missing" or "permission
//! denied" without parsing messages.

use std::io;
use std::path::{Path, PathBuf};

/// Error domain for failures reported by the operating system
pub const POSIX_DOMAIN: &str = "posix";

/// Error domain for failures detected by this crate before reaching the OS
pub const BRIDGE_DOMAIN: &str = "xattr-bridge";

/// Result type for extended attribute operations
pub type Result<T> = std::result::Result<T, XattrError>;

/// Coarse classification of an [`XattrError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The attribute, or the file it is addressed on, does not exist
    NotFound,
    /// Permission denied, invalid path, or another store failure
    Io,
    /// The caller passed an argument that can never succeed
    InvalidArgument,
}

/// Errors returned by extended attribute operations
#[derive(Debug, thiserror::Error)]
pub enum XattrError {
    /// The named attribute is not set on the path
    #[error("attribute '{key}' not found on {}", .path.display())]
    AttributeNotFound {
        /// Path the attribute was looked up on
        path: PathBuf,
        /// Attribute name
        key: String,
    },

    /// The path itself does not exist
    #[error("path not found: {}", .path.display())]
    PathNotFound {
        /// Missing path
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// Any other failure reported by the attribute store
    #[error("{operation} failed on {}: {source}", .path.display())]
    Store {
        /// Syscall that failed (`getxattr`, `setxattr`, ...)
        operation: &'static str,
        /// Path the call was made on
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// Stored value could not be decoded as UTF-8
    #[error("attribute '{key}' on {} is not valid UTF-8", .path.display())]
    NotUtf8 {
        /// Path the attribute was read from
        path: PathBuf,
        /// Attribute name
        key: String,
    },

    /// Argument rejected before any OS call was made
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl XattrError {
    /// Coarse kind of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AttributeNotFound { .. } | Self::PathNotFound { .. } => ErrorKind::NotFound,
            Self::Store { .. } | Self::NotUtf8 { .. } => ErrorKind::Io,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }

    /// Error domain: [`POSIX_DOMAIN`] when the OS reported the failure,
    /// [`BRIDGE_DOMAIN`] otherwise
    #[must_use]
    pub fn domain(&self) -> &'static str {
        if self.code().is_some() {
            POSIX_DOMAIN
        } else {
            BRIDGE_DOMAIN
        }
    }

    /// Raw OS error code, if the failure came from a syscall
    #[must_use]
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::AttributeNotFound { .. } => Some(ENOATTR),
            Self::PathNotFound { source, .. } | Self::Store { source, .. } => {
                source.raw_os_error()
            }
            Self::NotUtf8 { .. } | Self::InvalidArgument(_) => None,
        }
    }

    /// Whether this error means the attribute itself is absent
    ///
    /// A missing file is *not* an absent attribute.
    #[must_use]
    pub const fn is_attribute_missing(&self) -> bool {
        matches!(self, Self::AttributeNotFound { .. })
    }
}

/// errno reported when an attribute does not exist
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub(crate) const ENOATTR: i32 = libc::ENOATTR;
/// errno reported when an attribute does not exist
#[cfg(not(any(target_os = "macos", target_os = "ios")))]
pub(crate) const ENOATTR: i32 = libc::ENODATA;

/// Classify a failed syscall into an [`XattrError`]
pub(crate) fn store_error(
    operation: &'static str,
    path: &Path,
    key: Option<&str>,
    source: io::Error,
) -> XattrError {
    match (source.raw_os_error(), key) {
        (Some(ENOATTR), Some(key)) => XattrError::AttributeNotFound {
            path: path.to_path_buf(),
            key: key.to_string(),
        },
        (Some(libc::ENOENT), _) => XattrError::PathNotFound {
            path: path.to_path_buf(),
            source,
        },
        _ => XattrError::Store {
            operation,
            path: path.to_path_buf(),
            source,
        },
    }
}

/// Create an invalid-argument error
pub(crate) fn invalid_argument(msg: &str) -> XattrError {
    XattrError::InvalidArgument(msg.to_string())
}
