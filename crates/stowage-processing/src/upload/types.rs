//! Types for the upload pipeline.

use std::fmt;
use std::io::Cursor;

use stowage_storage::ByteStream;

/// One uploaded file as handed over by the host application.
///
/// `original_name` is advisory only: it is used for the kept extension and
/// reported back in the record, never for classification or storage paths.
pub struct IncomingFile {
    pub original_name: String,
    pub stream: Box<dyn ByteStream>,
}

impl IncomingFile {
    pub fn new(original_name: impl Into<String>, stream: impl ByteStream + 'static) -> Self {
        Self {
            original_name: original_name.into(),
            stream: Box::new(stream),
        }
    }

    /// Wrap an in-memory buffer.
    pub fn from_bytes(original_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::new(original_name, Cursor::new(data.into()))
    }
}

impl fmt::Debug for IncomingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncomingFile")
            .field("original_name", &self.original_name)
            .finish_non_exhaustive()
    }
}
