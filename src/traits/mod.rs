//! Core traits for tag storage
//!
//! Backends implement [`TagBackend`] so callers can swap immediate and
//! deferred storage without changing how tags are read or written. File
//! formats implement [`TagFileWriter`].

pub mod tag_backend;
pub mod tag_file_writer;

// Re-export main traits for convenience
pub use tag_backend::TagBackend;
pub use tag_file_writer::TagFileWriter;
