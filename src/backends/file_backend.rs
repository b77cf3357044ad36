//! Tag file backend
//!
//! Keeps the tags of many files in one sidecar tag file instead of on the
//! files themselves. The whole store is cached in memory; mutations mark it
//! dirty and [`TagBackend::commit_transactions`] writes it back in one go.
//!
//! The cache is reloaded before a mutation when the tag file changed on disk
//! since it was last read, unless there are unsaved changes.

use crate::error::{Result, TagError};
use crate::traits::{TagBackend, TagFileWriter};
use crate::writers::{FileFormat, TagStore};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Tag backend storing every file's tags in one tag file
#[derive(Debug)]
pub struct FileTagBackend {
    store_path: PathBuf,
    writer: Box<dyn TagFileWriter>,
    store: TagStore,
    loaded_mtime: Option<SystemTime>,
    dirty: bool,
}

impl FileTagBackend {
    /// Open the tag file at `store_path`, read and written with `writer`
    ///
    /// A missing tag file is an empty store; it is created on the first
    /// commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag file exists but cannot be loaded.
    pub fn open(store_path: impl Into<PathBuf>, writer: Box<dyn TagFileWriter>) -> Result<Self> {
        let mut backend = Self {
            store_path: store_path.into(),
            writer,
            store: TagStore::new(),
            loaded_mtime: None,
            dirty: false,
        };
        backend.reload()?;
        Ok(backend)
    }

    /// Open the tag file named `name` (or the default name) in `directory`
    ///
    /// # Errors
    ///
    /// Returns an error if the tag file exists but cannot be loaded.
    pub fn open_in(directory: &Path, name: Option<&str>, format: FileFormat) -> Result<Self> {
        Self::open(format.store_path(directory, name), format.writer())
    }

    /// Path of the tag file
    #[must_use]
    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// In-memory copy of the store
    #[must_use]
    pub fn store(&self) -> &TagStore {
        &self.store
    }

    /// Whether there are changes not yet written to the tag file
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Every file with at least one tag
    #[must_use]
    pub fn tagged_paths(&self) -> Vec<PathBuf> {
        self.store
            .tags
            .iter()
            .filter(|(_, tags)| !tags.is_empty())
            .map(|(path, _)| PathBuf::from(path))
            .collect()
    }

    /// Reload the store if the tag file changed on disk
    ///
    /// Does nothing while there are unsaved changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the changed tag file cannot be loaded.
    pub fn refresh(&mut self) -> Result<()> {
        if self.dirty {
            tracing::trace!(
                "Unsaved changes, not reloading {}",
                self.store_path.display()
            );
            return Ok(());
        }
        if self.modified()? != self.loaded_mtime {
            self.reload()?;
        }
        Ok(())
    }

    fn modified(&self) -> Result<Option<SystemTime>> {
        match fs::metadata(&self.store_path) {
            Ok(meta) => meta
                .modified()
                .map(Some)
                .map_err(|e| TagError::file(&self.store_path, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TagError::file(&self.store_path, e)),
        }
    }

    fn reload(&mut self) -> Result<()> {
        let mtime = self.modified()?;
        self.store = if mtime.is_some() {
            self.writer.load_from(&self.store_path)?
        } else {
            tracing::debug!(
                "No tag file at {}, starting empty",
                self.store_path.display()
            );
            TagStore::new()
        };
        self.loaded_mtime = mtime;
        Ok(())
    }

    fn validate_tag(&self, tag: &str) -> Result<()> {
        if tag.is_empty() {
            return Err(TagError::InvalidTag {
                tag: tag.to_string(),
                reason: "tag must not be empty",
            });
        }
        if tag.contains(self.writer.prohibited_characters()) {
            return Err(TagError::InvalidTag {
                tag: tag.to_string(),
                reason: "tag contains a character the tag file format cannot store",
            });
        }
        Ok(())
    }
}

/// Key of `path` in the store: its absolute form
fn entry_key(path: &Path) -> Result<String> {
    let absolute = std::path::absolute(path).map_err(|e| TagError::file(path, e))?;
    Ok(absolute.to_string_lossy().into_owned())
}

impl TagBackend for FileTagBackend {
    fn add_tag(&mut self, path: &Path, tag: &str) -> Result<()> {
        self.validate_tag(tag)?;
        self.refresh()?;

        let tags = self.store.tags.entry(entry_key(path)?).or_default();
        if tags.iter().any(|t| t == tag) {
            tracing::trace!("{} already tagged {:?}", path.display(), tag);
            return Ok(());
        }
        tracing::debug!("Adding tag {:?} to {}", tag, path.display());
        tags.push(tag.to_string());
        self.dirty = true;
        Ok(())
    }

    fn remove_tag(&mut self, path: &Path, tag: &str) -> Result<()> {
        self.refresh()?;

        let key = entry_key(path)?;
        let Some(tags) = self.store.tags.get_mut(&key) else {
            return Ok(());
        };
        let before = tags.len();
        tags.retain(|t| t != tag);
        if tags.len() == before {
            return Ok(());
        }
        tracing::debug!("Removed tag {:?} from {}", tag, path.display());
        if tags.is_empty() {
            self.store.tags.remove(&key);
        }
        self.dirty = true;
        Ok(())
    }

    fn load_tags(&self, path: &Path) -> Result<Vec<String>> {
        Ok(self
            .store
            .tags
            .get(&entry_key(path)?)
            .cloned()
            .unwrap_or_default())
    }

    fn clear_tags(&mut self, path: &Path) -> Result<()> {
        self.refresh()?;

        if self.store.tags.remove(&entry_key(path)?).is_some() {
            tracing::debug!("Cleared tags of {}", path.display());
            self.dirty = true;
        }
        Ok(())
    }

    fn commit_transactions(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.writer.save_to(&self.store_path, &self.store)?;
        self.loaded_mtime = self.modified()?;
        self.dirty = false;
        tracing::info!("Saved tag file {}", self.store_path.display());
        Ok(())
    }
}
