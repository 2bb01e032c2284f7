//! Helpers shared by the `stowage` binary.

use anyhow::Context;
use std::path::{Path, PathBuf};

use stowage_core::{CategoryRule, StowageConfig};
use stowage_processing::IncomingFile;

/// Field name batch uploads from the command line are grouped under.
pub const CLI_FIELD: &str = "files";

/// Initialize tracing for CLI binaries.
///
/// Logs go to stderr so stdout carries only JSON results.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Name reported as the original name of a file given on the command line.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Open every path as one batch group.
pub async fn open_files(paths: &[PathBuf]) -> anyhow::Result<Vec<(String, Vec<IncomingFile>)>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;
        files.push(IncomingFile::new(display_name(path), file));
    }
    Ok(vec![(CLI_FIELD.to_string(), files)])
}

/// Category rules from `--rule` flags, falling back to the configured ones.
pub fn resolve_rules(
    flags: &[String],
    config: &StowageConfig,
) -> anyhow::Result<Vec<CategoryRule>> {
    if flags.is_empty() {
        if config.categories.is_empty() {
            anyhow::bail!("No category rules given; pass --rule or set STOWAGE_CATEGORIES");
        }
        return Ok(config.categories.clone());
    }

    flags
        .iter()
        .map(|flag| CategoryRule::parse(flag).map_err(anyhow::Error::msg))
        .collect()
}
