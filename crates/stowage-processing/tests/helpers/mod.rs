//! Test helpers: fixtures, temporary directory layouts and storage doubles.
//!
//! Run from workspace root: `cargo test -p stowage-processing`.

#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use std::sync::Arc;

use stowage_processing::Uploader;
use stowage_storage::LocalStorage;

/// Uploader over the local filesystem with default settings.
pub fn local_uploader() -> Uploader {
    Uploader::new(Arc::new(LocalStorage::new()))
}

/// Number of entries directly inside `dir`.
pub fn count_entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .count()
}
