//! Upload orchestrator: validate → classify → name → (derive) → store.
//!
//! Single-file operations live in [`pipeline`], the fail-fast batch variants
//! in [`batch`]. Every operation yields a [`FileRecord`](stowage_core::FileRecord)
//! only after its artifacts have been written.

pub mod batch;
pub mod pipeline;
pub mod types;

pub use pipeline::Uploader;
pub use types::IncomingFile;
