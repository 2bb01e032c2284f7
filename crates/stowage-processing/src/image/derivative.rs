//! Derivative pipeline - normalized originals and thumbnails
//!
//! Both operations are pure transforms over in-memory buffers. Every output
//! is a JPEG at [`JPEG_QUALITY`]; thumbnails are always exactly
//! [`THUMBNAIL_HEIGHT`] pixels tall with a proportional width.

use bytes::Bytes;
use std::sync::Arc;

use stowage_core::constants::{JPEG_QUALITY, MAX_JPEG_DIMENSION, THUMBNAIL_HEIGHT};

use super::codec::{ImageCodec, RasterCodec};
use crate::error::UploadError;

/// A re-encoded original with its pixel dimensions.
#[derive(Debug, Clone)]
pub struct MaterializedImage {
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
}

/// Width of a `target_height`-tall thumbnail of a `width`×`height` image.
///
/// `round(target_height * width / height)`, rounding half away from zero,
/// never less than one pixel. A zero dimension is rejected instead of
/// producing a meaningless width.
pub fn thumbnail_width(width: u32, height: u32, target_height: u32) -> Result<u32, UploadError> {
    if width == 0 || height == 0 {
        return Err(UploadError::InvalidDimensions { width, height });
    }

    let aspect_ratio = f64::from(width) / f64::from(height);
    let scaled = (f64::from(target_height) * aspect_ratio).round();

    if !scaled.is_finite() || scaled > f64::from(u32::MAX) {
        return Err(UploadError::InvalidDimensions { width, height });
    }

    Ok((scaled as u32).max(1))
}

/// Produces the stored original and thumbnail for an image upload.
#[derive(Clone)]
pub struct DerivativePipeline {
    codec: Arc<dyn ImageCodec>,
}

impl Default for DerivativePipeline {
    fn default() -> Self {
        Self::new(Arc::new(RasterCodec))
    }
}

impl DerivativePipeline {
    pub fn new(codec: Arc<dyn ImageCodec>) -> Self {
        Self { codec }
    }

    /// Decode `raw`, record its dimensions and re-encode it as JPEG.
    ///
    /// Images a JPEG cannot hold are rejected from their header, before any
    /// pixels are decoded.
    pub fn materialize(&self, raw: &[u8]) -> Result<MaterializedImage, UploadError> {
        let (width, height) = self.codec.dimensions(raw)?;
        if width > MAX_JPEG_DIMENSION || height > MAX_JPEG_DIMENSION {
            return Err(UploadError::Encode(format!(
                "{}x{} exceeds the JPEG limit of {} pixels",
                width, height, MAX_JPEG_DIMENSION
            )));
        }

        let encoded = self.codec.encode_jpeg(raw, None, JPEG_QUALITY)?;

        tracing::debug!(
            width = encoded.source_width,
            height = encoded.source_height,
            input_bytes = raw.len(),
            output_bytes = encoded.data.len(),
            "Materialized original image"
        );

        Ok(MaterializedImage {
            data: Bytes::from(encoded.data),
            width: encoded.source_width,
            height: encoded.source_height,
        })
    }

    /// Scale `raw` to the thumbnail height, keeping the aspect ratio of the
    /// original `width`×`height`.
    pub fn thumbnail(&self, raw: &[u8], width: u32, height: u32) -> Result<Bytes, UploadError> {
        let thumb_width = thumbnail_width(width, height, THUMBNAIL_HEIGHT)?;
        if thumb_width > MAX_JPEG_DIMENSION {
            return Err(UploadError::Encode(format!(
                "Thumbnail width {} of a {}x{} image exceeds the JPEG limit of {} pixels",
                thumb_width, width, height, MAX_JPEG_DIMENSION
            )));
        }

        let encoded =
            self.codec
                .encode_jpeg(raw, Some((thumb_width, THUMBNAIL_HEIGHT)), JPEG_QUALITY)?;

        tracing::debug!(
            width = thumb_width,
            height = THUMBNAIL_HEIGHT,
            output_bytes = encoded.data.len(),
            "Generated thumbnail"
        );

        Ok(Bytes::from(encoded.data))
    }
}
