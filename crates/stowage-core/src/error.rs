//! Error metadata shared across crates
//!
//! Each crate defines its own `thiserror` enum; this module provides the
//! common vocabulary those enums use to describe themselves to callers and
//! to the logging layer.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like rejected content
    Debug,
    /// Warning level - for problems caused by the caller's input or environment
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be reported
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "DIRECTORY_NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same call may succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the caller
    fn suggested_action(&self) -> Option<&'static str>;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Emit `message` through `tracing` at the level the error asks for.
pub fn log_error<E>(err: &E, message: &str)
where
    E: ErrorMetadata + std::fmt::Display,
{
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(
            error = %err,
            error_code = err.error_code(),
            recoverable = err.is_recoverable(),
            suggested_action = err.suggested_action(),
            "{}",
            message
        ),
        LogLevel::Warn => tracing::warn!(
            error = %err,
            error_code = err.error_code(),
            recoverable = err.is_recoverable(),
            suggested_action = err.suggested_action(),
            "{}",
            message
        ),
        LogLevel::Error => tracing::error!(
            error = %err,
            error_code = err.error_code(),
            recoverable = err.is_recoverable(),
            suggested_action = err.suggested_action(),
            "{}",
            message
        ),
    }
}
