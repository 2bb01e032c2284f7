//! Batch uploads over grouped files.
//!
//! Input is a sequence of `(field, files)` groups, visited in the order the
//! caller's container yields them. The first failing file stops the batch and
//! no records are returned, even though earlier files are already stored.

use std::path::Path;

use stowage_core::error::log_error;
use stowage_core::{CategoryRule, FileRecord};

use super::pipeline::Uploader;
use super::types::IncomingFile;
use crate::error::{BatchError, UploadError};

/// Per-file operation applied by a batch.
#[derive(Clone, Copy)]
enum BatchMode<'a> {
    Plain {
        directory: &'a Path,
        keep_extension: bool,
    },
    Categorized {
        rules: &'a [CategoryRule],
        keep_extension: bool,
    },
    Images {
        image_dir: &'a Path,
        thumbnail_dir: &'a Path,
    },
}

impl Uploader {
    /// Plain upload of every file into `directory`.
    pub async fn upload_all_files<I>(
        &self,
        files: I,
        directory: &Path,
        keep_extension: bool,
    ) -> Result<Vec<FileRecord>, BatchError>
    where
        I: IntoIterator<Item = (String, Vec<IncomingFile>)>,
    {
        self.run_batch(
            files,
            BatchMode::Plain {
                directory,
                keep_extension,
            },
        )
        .await
    }

    /// Category-routed upload of every file.
    pub async fn upload_all_by_category<I>(
        &self,
        files: I,
        rules: &[CategoryRule],
        keep_extension: bool,
    ) -> Result<Vec<FileRecord>, BatchError>
    where
        I: IntoIterator<Item = (String, Vec<IncomingFile>)>,
    {
        self.run_batch(
            files,
            BatchMode::Categorized {
                rules,
                keep_extension,
            },
        )
        .await
    }

    /// Image-with-thumbnail upload of every file.
    ///
    /// Both directories are checked once before any file is touched.
    pub async fn upload_all_images<I>(
        &self,
        files: I,
        image_dir: &Path,
        thumbnail_dir: &Path,
    ) -> Result<Vec<FileRecord>, BatchError>
    where
        I: IntoIterator<Item = (String, Vec<IncomingFile>)>,
    {
        for directory in [image_dir, thumbnail_dir] {
            self.ensure_directory(directory)
                .await
                .map_err(BatchError::Precondition)?;
        }

        self.run_batch(
            files,
            BatchMode::Images {
                image_dir,
                thumbnail_dir,
            },
        )
        .await
    }

    async fn run_batch<I>(
        &self,
        files: I,
        mode: BatchMode<'_>,
    ) -> Result<Vec<FileRecord>, BatchError>
    where
        I: IntoIterator<Item = (String, Vec<IncomingFile>)>,
    {
        let mut records = Vec::new();

        for (field, group) in files {
            for mut file in group {
                match self.upload_one(&mut file, mode).await {
                    Ok(record) => records.push(record),
                    Err(source) => {
                        let err = BatchError::File {
                            field,
                            original_name: file.original_name,
                            source,
                        };
                        log_error(&err, "Batch upload aborted");
                        return Err(err);
                    }
                }
            }
        }

        tracing::debug!(count = records.len(), "Batch upload complete");
        Ok(records)
    }

    async fn upload_one(
        &self,
        file: &mut IncomingFile,
        mode: BatchMode<'_>,
    ) -> Result<FileRecord, UploadError> {
        let name = file.original_name.as_str();
        let stream = &mut file.stream;

        match mode {
            BatchMode::Plain {
                directory,
                keep_extension,
            } => self.upload(stream, name, directory, keep_extension).await,
            BatchMode::Categorized {
                rules,
                keep_extension,
            } => {
                self.upload_by_category(stream, name, rules, keep_extension)
                    .await
            }
            BatchMode::Images {
                image_dir,
                thumbnail_dir,
            } => {
                self.upload_image_with_thumbnail(stream, name, image_dir, thumbnail_dir)
                    .await
            }
        }
    }
}
