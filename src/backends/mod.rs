//! Tag backend implementations
//!
//! Concrete implementations of the [`TagBackend`](crate::traits::TagBackend)
//! trait: an immediate extended-attribute backend, a tag file backend and a
//! deferred wrapper.

pub mod file_backend;
pub mod lazy;
pub mod xattr_backend;

// Re-export main types for convenience
pub use file_backend::FileTagBackend;
pub use lazy::{LazyBackend, Transaction};
pub use xattr_backend::{XattrTagBackend, DEFAULT_TAG_KEY};
