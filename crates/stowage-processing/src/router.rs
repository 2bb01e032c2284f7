//! Category router - picks a destination directory for a MIME type.

use std::path::Path;

use stowage_core::CategoryRule;

use crate::error::UploadError;

/// Select the destination for `mime_type` from an ordered rule list.
///
/// Rules are scanned once, in order. The first concrete rule listing the type
/// wins immediately, wherever it sits relative to a wildcard. The first
/// wildcard seen is remembered and used only when no concrete rule matched.
pub fn route<'a>(mime_type: &str, rules: &'a [CategoryRule]) -> Result<&'a Path, UploadError> {
    let mut fallback: Option<&'a Path> = None;

    for rule in rules {
        if rule.is_wildcard() {
            fallback.get_or_insert(rule.destination());
            continue;
        }

        if rule.matches(mime_type) {
            tracing::debug!(
                mime_type = %mime_type,
                destination = %rule.destination().display(),
                "Matched category rule"
            );
            return Ok(rule.destination());
        }
    }

    match fallback {
        Some(destination) => {
            tracing::debug!(
                mime_type = %mime_type,
                destination = %destination.display(),
                "Using wildcard category"
            );
            Ok(destination)
        }
        None => Err(UploadError::NoMatchingType {
            mime_type: mime_type.to_string(),
        }),
    }
}
