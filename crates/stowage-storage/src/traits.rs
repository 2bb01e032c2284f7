//! Storage abstraction trait
//!
//! This module defines the Storage trait that storage backends implement.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use stowage_core::{ErrorMetadata, LogLevel};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncSeek};

/// A readable, seekable byte stream, as delivered for each uploaded file.
pub trait ByteStream: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T> ByteStream for T where T: AsyncRead + AsyncSeek + Send + Unpin + ?Sized {}

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid stored name: {0}")]
    InvalidName(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    /// The caller's stream failed while being copied into storage.
    #[error("Failed to read source stream: {0}")]
    SourceRead(#[source] std::io::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl ErrorMetadata for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            StorageError::DirectoryNotFound(_) => "DIRECTORY_NOT_FOUND",
            StorageError::NotFound(_) => "NOT_FOUND",
            StorageError::InvalidName(_) => "INVALID_NAME",
            StorageError::WriteFailed(_) => "WRITE_FAILED",
            StorageError::ReadFailed(_) => "READ_FAILED",
            StorageError::SourceRead(_) => "SOURCE_READ_FAILED",
            StorageError::IoError(_) => "IO_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StorageError::WriteFailed(_)
                | StorageError::ReadFailed(_)
                | StorageError::SourceRead(_)
                | StorageError::IoError(_)
        )
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            StorageError::DirectoryNotFound(_) => Some("Create the directory before uploading"),
            StorageError::InvalidName(_) => Some("Use a single path component as the name"),
            StorageError::WriteFailed(_) | StorageError::IoError(_) => {
                Some("Check disk space and permissions")
            }
            _ => None,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            StorageError::DirectoryNotFound(_)
            | StorageError::NotFound(_)
            | StorageError::InvalidName(_) => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

/// A regular file found in a storage directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub name: String,
    pub size_bytes: u64,
}

/// Storage abstraction trait
///
/// The upload pipeline decides *what* is stored and *where*; implementations
/// perform the writes. Every write targets `directory/name` and returns the
/// number of bytes that ended up in storage.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write an in-memory buffer to `directory/name`.
    async fn write(&self, directory: &Path, name: &str, data: Bytes) -> StorageResult<u64>;

    /// Copy a stream to `directory/name` until EOF.
    ///
    /// Errors raised by `reader` are reported as `StorageError::SourceRead`
    /// so they can be told apart from failures of the storage itself.
    async fn write_stream(
        &self,
        directory: &Path,
        name: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64>;

    /// Check whether `directory` exists and is a directory.
    async fn dir_exists(&self, directory: &Path) -> StorageResult<bool>;

    /// List the regular files in `directory`, ordered by name.
    async fn list(&self, directory: &Path) -> StorageResult<Vec<StoredEntry>>;

    /// Open `directory/name` for reading.
    async fn open(&self, directory: &Path, name: &str) -> StorageResult<Box<dyn ByteStream>>;
}
