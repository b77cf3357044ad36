//! # xattr-tags
//!
//! Tag files with delimited lists stored in extended attributes.
//!
//! - [`backends`]: tag backends (immediate extended attribute storage, a tag
//!   file and a deferred wrapper)
//! - [`writers`]: tag file formats (JSON and CSV)
//! - [`convert`]: copying tags between backends and tag file formats
//! - [`traits`]: the [`TagBackend`](traits::TagBackend) seam
//! - [`cli`] / [`commands`]: command-line parsing and execution
//!
//! Raw attribute access lives in the `xattr-bridge` crate and is re-exported
//! as [`accessor`].

pub mod backends;
pub mod cli;
pub mod commands;
pub mod convert;
pub mod error;
pub mod traits;
pub mod writers;

pub use error::{Result, TagError};
pub use xattr_bridge::accessor;
