//! Deferred tag backend
//!
//! Queues mutations in memory and replays them against a backing backend on
//! [`TagBackend::commit_transactions`]. Reads always go to the backing
//! backend, so queued changes are not visible until committed.

use crate::error::Result;
use crate::traits::TagBackend;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// A queued tag mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// Add `tag` to the file at `path`
    Add { path: PathBuf, tag: String },
    /// Remove `tag` from the file at `path`
    RemoveTag { path: PathBuf, tag: String },
    /// Remove all tags from the file at `path`
    ClearTags { path: PathBuf },
}

impl Transaction {
    fn apply<B: TagBackend>(&self, backing: &mut B) -> Result<()> {
        match self {
            Self::Add { path, tag } => backing.add_tag(path, tag),
            Self::RemoveTag { path, tag } => backing.remove_tag(path, tag),
            Self::ClearTags { path } => backing.clear_tags(path),
        }
    }
}

/// Backend that defers writes until commit
#[derive(Debug)]
pub struct LazyBackend<B> {
    backing: B,
    transactions: VecDeque<Transaction>,
}

impl<B: TagBackend> LazyBackend<B> {
    /// Wrap `backing`, deferring all of its writes
    pub fn new(backing: B) -> Self {
        Self {
            backing,
            transactions: VecDeque::new(),
        }
    }

    /// Transactions waiting for commit, oldest first
    pub fn pending(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    /// Number of transactions waiting for commit
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.transactions.len()
    }

    /// Backend the transactions are applied to
    pub const fn backing(&self) -> &B {
        &self.backing
    }

    /// Unwrap the backing backend, discarding uncommitted transactions
    pub fn into_inner(self) -> B {
        self.backing
    }
}

impl<B: TagBackend> TagBackend for LazyBackend<B> {
    fn add_tag(&mut self, path: &Path, tag: &str) -> Result<()> {
        self.transactions.push_back(Transaction::Add {
            path: path.to_path_buf(),
            tag: tag.to_string(),
        });
        Ok(())
    }

    fn remove_tag(&mut self, path: &Path, tag: &str) -> Result<()> {
        self.transactions.push_back(Transaction::RemoveTag {
            path: path.to_path_buf(),
            tag: tag.to_string(),
        });
        Ok(())
    }

    fn load_tags(&self, path: &Path) -> Result<Vec<String>> {
        self.backing.load_tags(path)
    }

    fn clear_tags(&mut self, path: &Path) -> Result<()> {
        self.transactions.push_back(Transaction::ClearTags {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    /// Replay queued transactions in order
    ///
    /// Stops at the first failure; that transaction and everything after it
    /// stay queued.
    fn commit_transactions(&mut self) -> Result<()> {
        tracing::debug!("Committing {} tag transactions", self.transactions.len());
        while let Some(transaction) = self.transactions.front() {
            if let Err(e) = transaction.apply(&mut self.backing) {
                tracing::warn!("Tag transaction {:?} failed: {}", transaction, e);
                return Err(e);
            }
            self.transactions.pop_front();
        }
        self.backing.commit_transactions()
    }
}
