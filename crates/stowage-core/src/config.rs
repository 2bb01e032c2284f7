//! Configuration module
//!
//! Directory defaults, the image allow-list and optional category rules, read
//! from the environment (and `.env` when present).

use std::env;
use std::path::PathBuf;

use crate::constants::DEFAULT_IMAGE_TYPES;
use crate::models::CategoryRule;

const UPLOAD_DIR: &str = "./uploads";
const IMAGE_DIR: &str = "./uploads/images";
const THUMBNAIL_DIR: &str = "./uploads/thumbnails";

/// Upload pipeline configuration
#[derive(Clone, Debug)]
pub struct StowageConfig {
    /// Destination for plain uploads
    pub upload_dir: PathBuf,
    /// Destination for re-encoded originals
    pub image_dir: PathBuf,
    /// Destination for thumbnails
    pub thumbnail_dir: PathBuf,
    /// Append the original extension to stored names of plain uploads
    pub keep_extension: bool,
    /// MIME types treated as images (lower-cased)
    pub image_types: Vec<String>,
    /// Ordered category rules for routed uploads
    pub categories: Vec<CategoryRule>,
}

impl Default for StowageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(UPLOAD_DIR),
            image_dir: PathBuf::from(IMAGE_DIR),
            thumbnail_dir: PathBuf::from(THUMBNAIL_DIR),
            keep_extension: true,
            image_types: DEFAULT_IMAGE_TYPES.iter().map(|t| t.to_string()).collect(),
            categories: Vec::new(),
        }
    }
}

impl StowageConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let keep_extension = match lookup("STOWAGE_KEEP_EXTENSION") {
            Some(value) => value.trim().to_lowercase().parse::<bool>().map_err(|_| {
                anyhow::anyhow!("STOWAGE_KEEP_EXTENSION must be 'true' or 'false'")
            })?,
            None => defaults.keep_extension,
        };

        let image_types = lookup("STOWAGE_IMAGE_TYPES")
            .map(|s| {
                s.split(',')
                    .map(|t| t.trim().to_lowercase())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.image_types);

        let categories = match lookup("STOWAGE_CATEGORIES") {
            Some(s) => CategoryRule::parse_list(&s)
                .map_err(|e| anyhow::anyhow!("STOWAGE_CATEGORIES is invalid: {}", e))?,
            None => defaults.categories,
        };

        let config = Self {
            upload_dir: lookup("STOWAGE_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            image_dir: lookup("STOWAGE_IMAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.image_dir),
            thumbnail_dir: lookup("STOWAGE_THUMBNAIL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.thumbnail_dir),
            keep_extension,
            image_types,
            categories,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.image_types.is_empty() {
            return Err(anyhow::anyhow!(
                "STOWAGE_IMAGE_TYPES must list at least one MIME type"
            ));
        }

        if self.categories.iter().filter(|c| c.is_wildcard()).count() > 1 {
            tracing::warn!("More than one wildcard category configured; the first one wins");
        }

        Ok(())
    }
}
