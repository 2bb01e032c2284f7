//! Data models for the upload pipeline

mod category;
mod file_record;

pub use category::*;
pub use file_record::*;
