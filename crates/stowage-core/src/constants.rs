//! Fixed processing constants.

/// Number of leading bytes inspected when sniffing content.
pub const SNIFF_LEN: usize = 512;

/// Height in pixels of every generated thumbnail.
pub const THUMBNAIL_HEIGHT: u32 = 75;

/// Largest width or height a baseline JPEG can carry.
pub const MAX_JPEG_DIMENSION: u32 = 65535;

/// JPEG quality used for stored originals and thumbnails.
pub const JPEG_QUALITY: u8 = 90;

/// MIME type reported when no signature matches.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// MIME type of every artifact produced by the image pipeline.
pub const DERIVATIVE_MIME_TYPE: &str = "image/jpeg";

/// Extension used for artifacts produced by the image pipeline.
pub const DERIVATIVE_EXTENSION: &str = "jpg";

/// Marker that turns a category rule into the wildcard rule.
pub const WILDCARD: &str = "*";

/// Types accepted as images unless configured otherwise.
pub const DEFAULT_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];
