//! Directory inventory - describe what is already stored.

use std::path::Path;

use stowage_core::constants::FALLBACK_MIME_TYPE;
use stowage_core::FileRecord;
use stowage_storage::Storage;

use crate::classifier::ContentClassifier;
use crate::error::UploadError;
use crate::upload::Uploader;

/// One record per regular file in `directory`, in storage listing order.
///
/// Without `include_mime_type` only name, size and directory are filled in.
/// With it every file is opened and sniffed; empty files report
/// `application/octet-stream` since there is nothing to sniff.
pub async fn describe_directory(
    storage: &dyn Storage,
    classifier: &ContentClassifier,
    directory: &Path,
    include_mime_type: bool,
) -> Result<Vec<FileRecord>, UploadError> {
    if !storage.dir_exists(directory).await? {
        return Err(UploadError::DirectoryNotFound(directory.to_path_buf()));
    }

    let entries = storage.list(directory).await?;
    let mut records = Vec::with_capacity(entries.len());

    for entry in entries {
        let mut record = FileRecord::new(
            entry.name.as_str(),
            "",
            entry.size_bytes,
            directory,
            "",
            false,
        );

        if include_mime_type {
            let classification = if entry.size_bytes == 0 {
                None
            } else {
                let mut stream = storage.open(directory, &entry.name).await?;
                Some(classifier.classify(&mut stream).await?)
            };

            match classification {
                Some(c) => {
                    record.mime_type = c.mime_type;
                    record.is_image = c.is_image;
                }
                None => record.mime_type = FALLBACK_MIME_TYPE.to_string(),
            }
        }

        records.push(record);
    }

    tracing::debug!(
        directory = %directory.display(),
        count = records.len(),
        include_mime_type,
        "Described directory"
    );

    Ok(records)
}

impl Uploader {
    /// [`describe_directory`] through this uploader's storage and classifier.
    pub async fn describe_directory(
        &self,
        directory: &Path,
        include_mime_type: bool,
    ) -> Result<Vec<FileRecord>, UploadError> {
        describe_directory(self.storage(), self.classifier(), directory, include_mime_type).await
    }
}
