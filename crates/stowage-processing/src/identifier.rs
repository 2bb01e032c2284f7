//! Collision-resistant stored names.

use std::path::Path;
use uuid::Uuid;

/// A new random v4 UUID in canonical hyphenated form.
pub fn new_identifier() -> String {
    Uuid::new_v4().to_string()
}

/// A new identifier with `extension` appended as `<token>.<ext>`.
///
/// The extension is lower-cased; an empty extension yields the bare token.
pub fn new_identifier_with_extension(extension: &str) -> String {
    let token = new_identifier();
    if extension.is_empty() {
        token
    } else {
        format!("{}.{}", token, extension.to_lowercase())
    }
}

/// Extension of an advisory original file name, lower-cased.
///
/// Only the final path component is considered and only an alphanumeric
/// suffix after the last `.` counts, so `car.tar.gz` gives `gz` and
/// `../x.a/b` gives nothing.
pub fn file_extension(original_name: &str) -> Option<String> {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())?;

    let (_, extension) = base.rsplit_once('.')?;
    if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(extension.to_lowercase())
}
