//! Stowage Processing Library
//!
//! This crate classifies uploaded content, names and routes it, and produces
//! the JPEG original and thumbnail for image uploads.
//!
//! Data flows leaf-first: raw bytes go through the [`ContentClassifier`], the
//! category [`router`] picks a destination, and the [`Uploader`] writes
//! through a [`Storage`](stowage_storage::Storage) backend, running the
//! [`DerivativePipeline`] for images.

pub mod classifier;
pub mod error;
pub mod identifier;
pub mod image;
pub mod inventory;
pub mod router;
pub mod upload;

// Re-export commonly used types
pub use classifier::{Classification, ContentClassifier};
pub use error::{BatchError, CodecError, UploadError};
pub use identifier::{file_extension, new_identifier, new_identifier_with_extension};
pub use crate::image::{
    thumbnail_width, DerivativePipeline, EncodedImage, ImageCodec, MaterializedImage, RasterCodec,
};
pub use inventory::describe_directory;
pub use router::route;
pub use upload::{IncomingFile, Uploader};
