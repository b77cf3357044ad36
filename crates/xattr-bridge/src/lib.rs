//! # xattr-bridge
//!
//! Path-addressed access to extended filesystem attributes with:
//! - String get/set/remove of a named attribute
//! - Delimited multi-value attributes (append a sub-value, read them as a list)
//! - Attribute name listing
//! - Structured errors carrying kind, domain, OS error code and message
//!
//! All calls are synchronous and go straight to the OS attribute store; the
//! crate holds no state between calls.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xattr_bridge::{accessor, ErrorKind};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let path = Path::new("notes.txt");
//! accessor::set(path, "user.tags", "red")?;
//! accessor::append(path, "user.tags", "blue", ",")?;
//!
//! for tag in accessor::get_list(path, "user.tags", ",")? {
//!     println!("tag: {tag}");
//! }
//!
//! accessor::remove(path, "user.tags")?;
//! let err = accessor::get(path, "user.tags").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//! # Ok(())
//! # }
//! ```
//!
//! Note: only Linux/Android and macOS/iOS attribute APIs are supported.

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios"
)))]
compile_error!("xattr-bridge supports Linux, Android, macOS and iOS only");

pub mod accessor;
pub mod error;
pub mod store;

// Re-export main types
pub use accessor::{
    append, get, get_list, join_values, list_keys, remove, set, split_values, DEFAULT_DELIMITER,
};
pub use error::{ErrorKind, Result, XattrError, BRIDGE_DOMAIN, POSIX_DOMAIN};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
