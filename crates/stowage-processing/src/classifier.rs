//! Content classifier - MIME detection from leading bytes
//!
//! Types are determined by magic-byte signatures only. The uploaded file name
//! is never consulted, so a renamed file cannot pass as another type.

use std::collections::HashSet;
use std::io::SeekFrom;

use stowage_core::constants::{DEFAULT_IMAGE_TYPES, FALLBACK_MIME_TYPE, SNIFF_LEN};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

use crate::error::UploadError;

/// Result of classifying one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Lower-cased canonical MIME type
    pub mime_type: String,
    pub is_image: bool,
}

/// Sniffs MIME types and checks them against an image allow-list.
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    image_types: HashSet<String>,
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_TYPES)
    }
}

impl ContentClassifier {
    /// Create a classifier treating `image_types` as images.
    pub fn new<I, S>(image_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            image_types: image_types
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn is_image_type(&self, mime_type: &str) -> bool {
        self.image_types.contains(&mime_type.to_lowercase())
    }

    /// Detect the MIME type of a sniff window.
    ///
    /// Falls back to `text/plain` for valid UTF-8 without NUL bytes and to
    /// `application/octet-stream` for everything else.
    pub fn sniff(window: &[u8]) -> String {
        if let Some(kind) = infer::get(window) {
            return kind.mime_type().trim().to_lowercase();
        }

        if looks_like_text(window) {
            return "text/plain".to_string();
        }

        FALLBACK_MIME_TYPE.to_string()
    }

    /// Classify an in-memory buffer using its first `SNIFF_LEN` bytes.
    pub fn classify_bytes(&self, data: &[u8]) -> Classification {
        let window = &data[..data.len().min(SNIFF_LEN)];
        let mime_type = Self::sniff(window);
        let is_image = self.is_image_type(&mime_type);
        Classification {
            mime_type,
            is_image,
        }
    }

    /// Classify a stream from its first `SNIFF_LEN` bytes.
    ///
    /// The stream is rewound to byte 0 before and after sniffing so the
    /// caller can read the full content afterwards. An empty stream cannot be
    /// classified.
    pub async fn classify<R>(&self, stream: &mut R) -> Result<Classification, UploadError>
    where
        R: AsyncRead + AsyncSeek + Unpin + ?Sized,
    {
        stream
            .seek(SeekFrom::Start(0))
            .await
            .map_err(UploadError::Read)?;

        let mut window = Vec::with_capacity(SNIFF_LEN);
        (&mut *stream)
            .take(SNIFF_LEN as u64)
            .read_to_end(&mut window)
            .await
            .map_err(UploadError::Read)?;

        stream
            .seek(SeekFrom::Start(0))
            .await
            .map_err(UploadError::Read)?;

        if window.is_empty() {
            return Err(UploadError::ClassificationUnavailable(
                "stream is empty".to_string(),
            ));
        }

        let classification = self.classify_bytes(&window);

        tracing::debug!(
            mime_type = %classification.mime_type,
            is_image = classification.is_image,
            sniffed_bytes = window.len(),
            "Classified upload content"
        );

        Ok(classification)
    }
}

/// Whether a sniff window reads as text.
///
/// A multi-byte character cut off by the end of the window still counts.
fn looks_like_text(window: &[u8]) -> bool {
    if window.is_empty() || window.contains(&0) {
        return false;
    }
    match std::str::from_utf8(window) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}
