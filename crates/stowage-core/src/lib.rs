//! Stowage Core Library
//!
//! This crate provides the domain models, configuration, constants and error
//! metadata shared by every Stowage component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::StowageConfig;
pub use error::{ErrorMetadata, LogLevel};
pub use models::{records_to_json, CategoryRule, Dimensions, FileRecord, MatchTypes};
