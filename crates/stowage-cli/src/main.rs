//! Stowage CLI: store local files through the upload pipeline.
//!
//! Directories default to STOWAGE_UPLOAD_DIR, STOWAGE_IMAGE_DIR and
//! STOWAGE_THUMBNAIL_DIR (see `.env`). Results are printed as JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use stowage_cli::{init_tracing, open_files, resolve_rules};
use stowage_core::error::log_error;
use stowage_core::StowageConfig;
use stowage_processing::Uploader;
use stowage_storage::LocalStorage;

#[derive(Parser)]
#[command(name = "stowage", about = "Classify, route and store uploaded files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store files unchanged under fresh names
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Destination directory
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Keep the original extension on stored names
        #[arg(long)]
        keep_extension: Option<bool>,
    },
    /// Store images as JPEG originals with thumbnails
    Images {
        /// Image files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Directory for originals
        #[arg(long)]
        image_dir: Option<PathBuf>,
        /// Directory for thumbnails
        #[arg(long)]
        thumbnail_dir: Option<PathBuf>,
    },
    /// Store files in the directory their content type routes to
    Sort {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Category rule as "type,type=>dir" or "*=>dir"; repeatable, first match wins
        #[arg(long = "rule")]
        rules: Vec<String>,
        /// Keep the original extension on stored names
        #[arg(long)]
        keep_extension: Option<bool>,
    },
    /// Describe the files already stored in a directory
    Ls {
        /// Directory to describe
        dir: PathBuf,
        /// Sniff each file's MIME type
        #[arg(long)]
        mime: bool,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize records")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = StowageConfig::from_env().context("Failed to load configuration")?;
    let uploader = Uploader::from_config(Arc::new(LocalStorage::new()), &config);

    match cli.command {
        Commands::Upload {
            files,
            dir,
            keep_extension,
        } => {
            let dir = dir.unwrap_or_else(|| config.upload_dir.clone());
            let keep_extension = keep_extension.unwrap_or(config.keep_extension);
            let files = open_files(&files).await?;

            let records = uploader
                .upload_all_files(files, &dir, keep_extension)
                .await
                .inspect_err(|e| log_error(e, "Upload failed"))?;
            print_json(&records)?;
        }
        Commands::Images {
            files,
            image_dir,
            thumbnail_dir,
        } => {
            let image_dir = image_dir.unwrap_or_else(|| config.image_dir.clone());
            let thumbnail_dir = thumbnail_dir.unwrap_or_else(|| config.thumbnail_dir.clone());
            let files = open_files(&files).await?;

            let records = uploader
                .upload_all_images(files, &image_dir, &thumbnail_dir)
                .await
                .inspect_err(|e| log_error(e, "Image upload failed"))?;
            print_json(&records)?;
        }
        Commands::Sort {
            files,
            rules,
            keep_extension,
        } => {
            let rules = resolve_rules(&rules, &config)?;
            let keep_extension = keep_extension.unwrap_or(config.keep_extension);
            let files = open_files(&files).await?;

            let records = uploader
                .upload_all_by_category(files, &rules, keep_extension)
                .await
                .inspect_err(|e| log_error(e, "Category upload failed"))?;
            print_json(&records)?;
        }
        Commands::Ls { dir, mime } => {
            let records = uploader
                .describe_directory(&dir, mime)
                .await
                .inspect_err(|e| log_error(e, "Listing failed"))?;
            print_json(&records)?;
        }
    }

    Ok(())
}
