//! String-valued attribute access with delimited multi-value attributes
//!
//! Each function is one independent request against the OS attribute store,
//! addressed by `(path, key)`. List-valued attributes are stored as a single
//! string of sub-values joined by a delimiter ([`DEFAULT_DELIMITER`] unless
//! the caller picks another). Splitting is purely syntactic: there is no
//! escaping, so a sub-value must not contain the delimiter.
//!
//! # Concurrency
//!
//! Nothing here takes a lock. [`append`] is a read followed by a separate
//! write, so two concurrent appends to the same attribute can both read the
//! same old value and the later write wins, dropping the other sub-value.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xattr_bridge::accessor;
//!
//! # fn example() -> xattr_bridge::Result<()> {
//! let path = Path::new("/tmp/f");
//! accessor::set(path, "user.tags", "red")?;
//! accessor::append(path, "user.tags", "blue", accessor::DEFAULT_DELIMITER)?;
//! assert_eq!(
//!     accessor::get_list(path, "user.tags", ",")?,
//!     vec!["red".to_string(), "blue".to_string()]
//! );
//! accessor::remove(path, "user.tags")?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, XattrError};
use crate::store;
use std::path::Path;

/// Delimiter used for list-valued attributes when none is given
pub const DEFAULT_DELIMITER: &str = ",";

/// Read an attribute as a string
///
/// # Errors
///
/// This function will return an error if:
/// - The attribute doesn't exist (kind `NotFound`)
/// - The path is missing, permission is denied, or the value is not UTF-8
/// - The key is empty
pub fn get(path: &Path, key: &str) -> Result<String> {
    let raw = store::get_raw(path, key)?;
    String::from_utf8(raw).map_err(|_| XattrError::NotUtf8 {
        path: path.to_path_buf(),
        key: key.to_string(),
    })
}

/// Create or replace an attribute
///
/// # Errors
///
/// This function will return an error if the path is missing, permission is
/// denied, the filesystem does not support the attribute, or the key is empty
pub fn set(path: &Path, key: &str, value: &str) -> Result<()> {
    log::debug!("set {key} on {} ({} bytes)", path.display(), value.len());
    store::set_raw(path, key, value.as_bytes())
}

/// Append a sub-value to a delimited attribute
///
/// Writes `current + delimiter + value`, or just `value` when the attribute
/// is absent. This is an unlocked read-modify-write: concurrent appends to
/// the same attribute may lose updates.
///
/// # Errors
///
/// Returns any error from the read other than "attribute absent", and any
/// error from the write. A failed write leaves the previous value in place.
pub fn append(path: &Path, key: &str, value: &str, delimiter: &str) -> Result<()> {
    let updated = match get(path, key) {
        Ok(mut current) => {
            current.push_str(delimiter);
            current.push_str(value);
            current
        }
        Err(e) if e.is_attribute_missing() => {
            log::trace!("append {key} on {}: no current value", path.display());
            value.to_string()
        }
        Err(e) => return Err(e),
    };

    set(path, key, &updated)
}

/// Read a delimited attribute as an ordered list of sub-values
///
/// An absent attribute yields an empty list rather than an error. Empty
/// segments are kept; entries are not trimmed.
///
/// # Errors
///
/// This function will return an error if the path is missing, permission is
/// denied, the value is not UTF-8, or the key is empty
pub fn get_list(path: &Path, key: &str, delimiter: &str) -> Result<Vec<String>> {
    match get(path, key) {
        Ok(raw) => Ok(split_values(&raw, delimiter)),
        Err(e) if e.is_attribute_missing() => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Remove an attribute and every sub-value stored in it
///
/// # Errors
///
/// This function will return an error if:
/// - The attribute doesn't exist (kind `NotFound`)
/// - The path is missing or permission is denied
/// - The key is empty
pub fn remove(path: &Path, key: &str) -> Result<()> {
    log::debug!("remove {key} on {}", path.display());
    store::remove_raw(path, key)
}

/// Names of all attributes set on a path
///
/// # Errors
///
/// This function will return an error if the path is missing or permission
/// is denied
pub fn list_keys(path: &Path) -> Result<Vec<String>> {
    store::list_raw(path)
}

/// Split a stored value on `delimiter`
///
/// An empty delimiter, or one that never occurs, gives a single entry equal
/// to `raw`. Consecutive delimiters produce empty entries.
#[must_use]
pub fn split_values(raw: &str, delimiter: &str) -> Vec<String> {
    if delimiter.is_empty() {
        return vec![raw.to_string()];
    }
    raw.split(delimiter).map(ToString::to_string).collect()
}

/// Join sub-values with `delimiter` into a storable value
#[must_use]
pub fn join_values<S: AsRef<str>>(values: &[S], delimiter: &str) -> String {
    values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(delimiter)
}
