//! Image module
//!
//! This module provides the image half of the upload pipeline:
//! - The swappable decode/resize/encode capability (codec)
//! - The derivative pipeline producing stored originals and thumbnails (derivative)

pub mod codec;
pub mod derivative;

pub use codec::{EncodedImage, ImageCodec, RasterCodec};
pub use derivative::{thumbnail_width, DerivativePipeline, MaterializedImage};
