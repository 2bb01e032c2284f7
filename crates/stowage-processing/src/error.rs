//! Error types for the upload pipeline

use std::path::PathBuf;

use stowage_core::{ErrorMetadata, LogLevel};
use stowage_storage::StorageError;

/// Failures of the swappable image codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Every way processing a single file can fail.
///
/// Each variant identifies the step that failed; any of them aborts the
/// current file immediately.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("The provided directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Failed to read upload stream: {0}")]
    Read(#[source] std::io::Error),

    #[error("Content type could not be determined: {0}")]
    ClassificationUnavailable(String),

    #[error("This file is not an image: {mime_type}")]
    NotAnImage { mime_type: String },

    #[error("No category matches MIME type {mime_type}")]
    NoMatchingType { mime_type: String },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: StorageError,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<CodecError> for UploadError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Decode(msg) => UploadError::Decode(msg),
            CodecError::Encode(msg) => UploadError::Encode(msg),
        }
    }
}

impl UploadError {
    /// Map a failed write of `directory/name`.
    ///
    /// A missing directory at write time is reported the same way as one
    /// missing during validation.
    pub(crate) fn from_write(directory: &std::path::Path, name: &str, err: StorageError) -> Self {
        match err {
            StorageError::DirectoryNotFound(_) => {
                UploadError::DirectoryNotFound(directory.to_path_buf())
            }
            StorageError::SourceRead(e) => UploadError::Read(e),
            source => UploadError::Write {
                path: directory.join(name),
                source,
            },
        }
    }
}

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        match self {
            UploadError::DirectoryNotFound(_) => "DIRECTORY_NOT_FOUND",
            UploadError::Read(_) => "READ_ERROR",
            UploadError::ClassificationUnavailable(_) => "CLASSIFICATION_UNAVAILABLE",
            UploadError::NotAnImage { .. } => "NOT_AN_IMAGE",
            UploadError::NoMatchingType { .. } => "NO_MATCHING_TYPE",
            UploadError::Decode(_) => "DECODE_ERROR",
            UploadError::Encode(_) => "ENCODE_ERROR",
            UploadError::InvalidDimensions { .. } => "INVALID_DIMENSIONS",
            UploadError::Write { .. } => "WRITE_ERROR",
            UploadError::Storage(err) => err.error_code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            UploadError::Read(_) | UploadError::Encode(_) => true,
            UploadError::Write { source, .. } => source.is_recoverable(),
            UploadError::Storage(err) => err.is_recoverable(),
            _ => false,
        }
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            UploadError::DirectoryNotFound(_) => Some("Create the destination directory"),
            UploadError::ClassificationUnavailable(_) => Some("Upload a non-empty file"),
            UploadError::NotAnImage { .. } | UploadError::Decode(_) => {
                Some("Upload a JPEG, PNG or GIF image")
            }
            UploadError::NoMatchingType { .. } => Some("Add a wildcard category rule"),
            UploadError::Write { source, .. } => source.suggested_action(),
            UploadError::Storage(err) => err.suggested_action(),
            _ => None,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::NotAnImage { .. }
            | UploadError::NoMatchingType { .. }
            | UploadError::ClassificationUnavailable(_) => LogLevel::Debug,
            UploadError::DirectoryNotFound(_)
            | UploadError::Decode(_)
            | UploadError::InvalidDimensions { .. } => LogLevel::Warn,
            UploadError::Write { source, .. } => source.log_level(),
            UploadError::Storage(err) => err.log_level(),
            UploadError::Read(_) | UploadError::Encode(_) => LogLevel::Error,
        }
    }
}

/// A batch call stopped at its first failure.
///
/// No records are returned with this error, although files processed before
/// the failure may already be on disk.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The batch could not start, e.g. a shared destination is missing.
    #[error("Batch rejected: {0}")]
    Precondition(#[source] UploadError),

    #[error("Upload of '{original_name}' (field '{field}') failed: {source}")]
    File {
        field: String,
        original_name: String,
        #[source]
        source: UploadError,
    },
}

impl BatchError {
    /// The per-file error that stopped the batch.
    pub fn upload_error(&self) -> &UploadError {
        match self {
            BatchError::Precondition(err) => err,
            BatchError::File { source, .. } => source,
        }
    }
}

impl ErrorMetadata for BatchError {
    fn error_code(&self) -> &'static str {
        self.upload_error().error_code()
    }

    fn is_recoverable(&self) -> bool {
        self.upload_error().is_recoverable()
    }

    fn suggested_action(&self) -> Option<&'static str> {
        self.upload_error().suggested_action()
    }

    fn log_level(&self) -> LogLevel {
        self.upload_error().log_level()
    }
}
