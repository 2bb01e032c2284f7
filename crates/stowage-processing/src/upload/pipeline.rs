//! Single-file upload operations.

use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use stowage_core::constants::{DERIVATIVE_EXTENSION, DERIVATIVE_MIME_TYPE};
use stowage_core::{CategoryRule, FileRecord, StowageConfig};
use stowage_storage::{ByteStream, Storage};
use tokio::io::AsyncReadExt;

use crate::classifier::{Classification, ContentClassifier};
use crate::error::UploadError;
use crate::identifier::{file_extension, new_identifier, new_identifier_with_extension};
use crate::image::{DerivativePipeline, ImageCodec};
use crate::router::route;

/// Drives uploads from a stream to stored artifacts.
///
/// Holds no mutable state; clones share the storage backend and codec, and
/// concurrent calls are isolated from one another.
#[derive(Clone)]
pub struct Uploader {
    storage: Arc<dyn Storage>,
    classifier: ContentClassifier,
    derivatives: DerivativePipeline,
}

impl Uploader {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            classifier: ContentClassifier::default(),
            derivatives: DerivativePipeline::default(),
        }
    }

    /// Uploader using the configured image allow-list.
    pub fn from_config(storage: Arc<dyn Storage>, config: &StowageConfig) -> Self {
        Self::new(storage).with_classifier(ContentClassifier::new(&config.image_types))
    }

    pub fn with_classifier(mut self, classifier: ContentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn ImageCodec>) -> Self {
        self.derivatives = DerivativePipeline::new(codec);
        self
    }

    pub fn classifier(&self) -> &ContentClassifier {
        &self.classifier
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub(crate) async fn ensure_directory(&self, directory: &Path) -> Result<(), UploadError> {
        if !self.storage.dir_exists(directory).await? {
            return Err(UploadError::DirectoryNotFound(directory.to_path_buf()));
        }
        Ok(())
    }

    /// Store a file unchanged under a fresh identifier in `directory`.
    ///
    /// With `keep_extension` the original name's extension is appended to the
    /// stored name. Images are not decoded, so the record has no dimensions.
    #[tracing::instrument(
        skip(self, stream),
        fields(directory = %directory.display(), operation = "upload")
    )]
    pub async fn upload<R: ByteStream>(
        &self,
        stream: &mut R,
        original_name: &str,
        directory: &Path,
        keep_extension: bool,
    ) -> Result<FileRecord, UploadError> {
        self.ensure_directory(directory).await?;
        let classification = self.classifier.classify(stream).await?;

        self.store_stream(stream, original_name, classification, directory, keep_extension)
            .await
    }

    /// Store a normalized JPEG original in `image_dir` and its thumbnail in
    /// `thumbnail_dir`, both under the same `<token>.jpg` name.
    ///
    /// The returned record describes the original. Nothing is cleaned up if
    /// the thumbnail write fails after the original was stored.
    #[tracing::instrument(
        skip(self, stream),
        fields(
            image_dir = %image_dir.display(),
            thumbnail_dir = %thumbnail_dir.display(),
            operation = "upload_image_with_thumbnail"
        )
    )]
    pub async fn upload_image_with_thumbnail<R: ByteStream>(
        &self,
        stream: &mut R,
        original_name: &str,
        image_dir: &Path,
        thumbnail_dir: &Path,
    ) -> Result<FileRecord, UploadError> {
        let start = Instant::now();

        self.ensure_directory(image_dir).await?;
        self.ensure_directory(thumbnail_dir).await?;

        let classification = self.classifier.classify(stream).await?;
        if !classification.is_image {
            return Err(UploadError::NotAnImage {
                mime_type: classification.mime_type,
            });
        }

        // Decoding needs the whole image in memory.
        let mut buffer = Vec::new();
        stream
            .read_to_end(&mut buffer)
            .await
            .map_err(UploadError::Read)?;
        let raw = Bytes::from(buffer);

        let stored_name = new_identifier_with_extension(DERIVATIVE_EXTENSION);

        let pipeline = self.derivatives.clone();
        let input = raw.clone();
        let original = tokio::task::spawn_blocking(move || pipeline.materialize(&input))
            .await
            .map_err(|e| UploadError::Encode(format!("Image task failed: {}", e)))??;

        let size_bytes = self
            .storage
            .write(image_dir, &stored_name, original.data.clone())
            .await
            .map_err(|e| UploadError::from_write(image_dir, &stored_name, e))?;

        let pipeline = self.derivatives.clone();
        let (width, height) = (original.width, original.height);
        let thumbnail =
            tokio::task::spawn_blocking(move || pipeline.thumbnail(&raw, width, height))
                .await
                .map_err(|e| UploadError::Encode(format!("Thumbnail task failed: {}", e)))??;

        self.storage
            .write(thumbnail_dir, &stored_name, thumbnail)
            .await
            .map_err(|e| UploadError::from_write(thumbnail_dir, &stored_name, e))?;

        tracing::info!(
            stored_name = %stored_name,
            source_mime_type = %classification.mime_type,
            width,
            height,
            size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image and thumbnail stored"
        );

        Ok(FileRecord::new(
            stored_name,
            original_name,
            size_bytes,
            image_dir,
            DERIVATIVE_MIME_TYPE,
            true,
        )
        .with_dimensions(width, height))
    }

    /// Store a file unchanged in the directory its content type routes to.
    #[tracing::instrument(skip(self, stream, rules), fields(operation = "upload_by_category"))]
    pub async fn upload_by_category<R: ByteStream>(
        &self,
        stream: &mut R,
        original_name: &str,
        rules: &[CategoryRule],
        keep_extension: bool,
    ) -> Result<FileRecord, UploadError> {
        let classification = self.classifier.classify(stream).await?;
        let directory = route(&classification.mime_type, rules)?;

        self.ensure_directory(directory).await?;

        self.store_stream(stream, original_name, classification, directory, keep_extension)
            .await
    }

    async fn store_stream<R: ByteStream>(
        &self,
        stream: &mut R,
        original_name: &str,
        classification: Classification,
        directory: &Path,
        keep_extension: bool,
    ) -> Result<FileRecord, UploadError> {
        let stored_name = match file_extension(original_name) {
            Some(extension) if keep_extension => new_identifier_with_extension(&extension),
            _ => new_identifier(),
        };

        let size_bytes = self
            .storage
            .write_stream(directory, &stored_name, stream)
            .await
            .map_err(|e| UploadError::from_write(directory, &stored_name, e))?;

        tracing::info!(
            stored_name = %stored_name,
            mime_type = %classification.mime_type,
            size_bytes,
            "File stored"
        );

        Ok(FileRecord::new(
            stored_name,
            original_name,
            size_bytes,
            directory,
            classification.mime_type,
            classification.is_image,
        ))
    }
}
