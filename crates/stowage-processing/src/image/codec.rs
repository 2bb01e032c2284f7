//! Image codec - decode, resize and JPEG re-encode
//!
//! The derivative pipeline only needs "bytes → dimensions" and
//! "bytes × target → bytes"; [`ImageCodec`] is that seam, and
//! [`RasterCodec`] backs it with the `image` crate.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

use crate::error::CodecError;

/// A JPEG produced by a codec, with the dimensions of its source.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub source_width: u32,
    pub source_height: u32,
}

/// Decode/resize/encode capability.
pub trait ImageCodec: Send + Sync {
    /// Pixel dimensions of an encoded image.
    fn dimensions(&self, data: &[u8]) -> Result<(u32, u32), CodecError>;

    /// Decode `data`, optionally resize it to exactly `target` (width,
    /// height), and encode the result as JPEG at `quality`.
    fn encode_jpeg(
        &self,
        data: &[u8],
        target: Option<(u32, u32)>,
        quality: u8,
    ) -> Result<EncodedImage, CodecError>;
}

/// [`ImageCodec`] backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCodec;

impl RasterCodec {
    fn reader(data: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, CodecError> {
        ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn decode(data: &[u8]) -> Result<DynamicImage, CodecError> {
        Self::reader(data)?
            .decode()
            .map_err(|e| CodecError::Decode(e.to_string()))
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width.max(1) as f32;
        let height_ratio = orig_height as f32 / new_height.max(1) as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }
}

impl ImageCodec for RasterCodec {
    fn dimensions(&self, data: &[u8]) -> Result<(u32, u32), CodecError> {
        Self::reader(data)?
            .into_dimensions()
            .map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn encode_jpeg(
        &self,
        data: &[u8],
        target: Option<(u32, u32)>,
        quality: u8,
    ) -> Result<EncodedImage, CodecError> {
        let img = Self::decode(data)?;
        let (source_width, source_height) = img.dimensions();

        let img = match target {
            Some((width, height)) => {
                let filter = Self::select_filter(source_width, source_height, width, height);
                img.resize_exact(width, height, filter)
            }
            None => img,
        };

        // JPEG has no alpha channel.
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut buffer = Vec::with_capacity((width * height) as usize / 4);
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| CodecError::Encode(e.to_string()))?;

        Ok(EncodedImage {
            data: buffer,
            source_width,
            source_height,
        })
    }
}
