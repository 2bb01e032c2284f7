//! Stowage Storage Library
//!
//! This crate provides the storage capability the upload pipeline writes
//! through: the `Storage` trait and the local filesystem implementation.
//!
//! # Addressing
//!
//! Artifacts are addressed by a destination directory plus a stored name. A
//! stored name is a single path component; names containing separators or
//! `..` are rejected so a write can never escape its directory. Directories
//! are never created by the storage layer: writing into a missing directory
//! fails with `StorageError::DirectoryNotFound`.

pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult, StoredEntry};
