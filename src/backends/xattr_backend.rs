//! Extended attribute tag backend
//!
//! Stores a file's tags as one delimiter-joined list in a single extended
//! attribute on the file itself. Every call goes straight to the attribute
//! store; nothing is cached.

use crate::error::{Result, TagError};
use crate::traits::TagBackend;
use std::path::Path;
use xattr_bridge::accessor;

/// Attribute that holds the tag list
///
/// Linux only lets unprivileged users write the `user.` namespace; macOS has
/// no namespaces and uses reverse-DNS names by convention.
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub const DEFAULT_TAG_KEY: &str = "com.graffiti.tags";
/// Attribute that holds the tag list
#[cfg(not(any(target_os = "macos", target_os = "ios")))]
pub const DEFAULT_TAG_KEY: &str = "user.graffiti.tags";

/// Tag backend writing directly to an extended attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XattrTagBackend {
    key: String,
    delimiter: String,
}

impl XattrTagBackend {
    /// Create a backend storing tags under `key`, joined by `delimiter`
    ///
    /// # Errors
    ///
    /// Returns `TagError::InvalidDelimiter` if `delimiter` is empty. Joining
    /// with an empty delimiter would merge neighbouring tags into one.
    pub fn new(key: impl Into<String>, delimiter: impl Into<String>) -> Result<Self> {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            return Err(TagError::InvalidDelimiter {
                delimiter,
                reason: "delimiter must not be empty",
            });
        }
        Ok(Self {
            key: key.into(),
            delimiter,
        })
    }

    /// Attribute name used for the tag list
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Delimiter between tags
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Check that `tag` can be stored without corrupting the list
    ///
    /// # Errors
    ///
    /// Returns `TagError::InvalidTag` if the tag is empty or contains the
    /// delimiter.
    pub fn validate_tag(&self, tag: &str) -> Result<()> {
        if tag.is_empty() {
            return Err(TagError::InvalidTag {
                tag: tag.to_string(),
                reason: "tag must not be empty",
            });
        }
        if tag.contains(self.delimiter.as_str()) {
            return Err(TagError::InvalidTag {
                tag: tag.to_string(),
                reason: "tag must not contain the delimiter",
            });
        }
        Ok(())
    }
}

impl Default for XattrTagBackend {
    fn default() -> Self {
        Self {
            key: DEFAULT_TAG_KEY.to_string(),
            delimiter: accessor::DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl TagBackend for XattrTagBackend {
    fn add_tag(&mut self, path: &Path, tag: &str) -> Result<()> {
        self.validate_tag(tag)?;
        tracing::debug!("Adding tag {:?} to {}", tag, path.display());
        accessor::append(path, &self.key, tag, &self.delimiter)?;
        Ok(())
    }

    fn remove_tag(&mut self, path: &Path, tag: &str) -> Result<()> {
        let current = self.load_tags(path)?;
        let remaining: Vec<&String> = current.iter().filter(|t| *t != tag).collect();
        if remaining.len() == current.len() {
            tracing::trace!("Tag {:?} not present on {}", tag, path.display());
            return Ok(());
        }
        tracing::debug!(
            "Removing tag {:?} from {} ({} remaining)",
            tag,
            path.display(),
            remaining.len()
        );
        accessor::set(
            path,
            &self.key,
            &accessor::join_values(&remaining, &self.delimiter),
        )?;
        Ok(())
    }

    fn load_tags(&self, path: &Path) -> Result<Vec<String>> {
        let tags = accessor::get_list(path, &self.key, &self.delimiter)?;
        Ok(tags.into_iter().filter(|t| !t.is_empty()).collect())
    }

    fn clear_tags(&mut self, path: &Path) -> Result<()> {
        match accessor::remove(path, &self.key) {
            Ok(()) => Ok(()),
            Err(e) if e.is_attribute_missing() => {
                tracing::trace!("No tags to clear on {}", path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
