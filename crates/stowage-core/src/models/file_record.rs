use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pixel dimensions of a stored original image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Metadata describing one completed upload.
///
/// A record is only produced after the artifact has been written, so it never
/// describes partial state. `dimensions` is present only for images decoded by
/// the image pipeline and serializes as flat `width`/`height` fields that are
/// omitted entirely otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub stored_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub original_name: String,
    pub size_bytes: u64,
    pub is_image: bool,
    pub directory: PathBuf,
    /// Empty for inventory entries listed without sniffing
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(flatten)]
    pub dimensions: Option<Dimensions>,
}

impl FileRecord {
    pub fn new(
        stored_name: impl Into<String>,
        original_name: impl Into<String>,
        size_bytes: u64,
        directory: impl Into<PathBuf>,
        mime_type: impl Into<String>,
        is_image: bool,
    ) -> Self {
        Self {
            stored_name: stored_name.into(),
            original_name: original_name.into(),
            size_bytes,
            is_image,
            directory: directory.into(),
            mime_type: mime_type.into(),
            dimensions: None,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some(Dimensions { width, height });
        self
    }

    pub fn width(&self) -> Option<u32> {
        self.dimensions.map(|d| d.width)
    }

    pub fn height(&self) -> Option<u32> {
        self.dimensions.map(|d| d.height)
    }

    /// Full path of the stored artifact.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.stored_name)
    }

    /// Path the matching thumbnail has inside `thumbnail_dir`.
    pub fn thumbnail_path(&self, thumbnail_dir: &Path) -> PathBuf {
        thumbnail_dir.join(&self.stored_name)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Serialize a list of records as one JSON array.
pub fn records_to_json(records: &[FileRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}
