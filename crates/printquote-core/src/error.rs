//! Error types module
//!
//! This module provides the core error types used throughout PrintQuote.
//! All errors crossing a crate boundary are unified under the `AppError` enum, which
//! covers request validation, the slicing pipeline and generic internal failures.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "ENGINE_NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{0}")]
    EngineNotFound(String),

    #[error("Slicing failed: {0}")]
    SliceExecutionFailed(String),

    #[error("Slicer output missing: {0}")]
    SliceOutputMissing(String),

    #[error("G-code read failed: {0}")]
    GcodeReadFailed(String),

    #[error("Print duration unavailable: {0}")]
    DurationUnavailable(String),

    #[error("Service overloaded: {0}")]
    Overloaded(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
/// client_message stays per-variant for dynamic content.
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce the model file size"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::EngineNotFound(_) => (
            500,
            "ENGINE_NOT_FOUND",
            false,
            Some("Install the slicing engine or set PRUSA_SLICER_PATH"),
            false,
            LogLevel::Error,
        ),
        AppError::SliceExecutionFailed(_) => (
            500,
            "SLICE_EXECUTION_FAILED",
            true,
            Some("Check that the model is a valid, manifold mesh and retry"),
            false,
            LogLevel::Error,
        ),
        AppError::SliceOutputMissing(_) => (
            500,
            "SLICE_OUTPUT_MISSING",
            false,
            Some("Check the slicing engine version and profile"),
            false,
            LogLevel::Error,
        ),
        AppError::GcodeReadFailed(_) => (
            500,
            "GCODE_READ_FAILED",
            true,
            Some("Retry after a short delay"),
            false,
            LogLevel::Error,
        ),
        AppError::DurationUnavailable(_) => (
            422,
            "DURATION_UNAVAILABLE",
            false,
            Some("Contact us for a manual quote"),
            false,
            LogLevel::Warn,
        ),
        AppError::Overloaded(_) => (
            503,
            "OVERLOADED",
            true,
            Some("Wait 30-60 seconds and retry"),
            false,
            LogLevel::Warn,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
            AppError::EngineNotFound(_) => "EngineNotFound",
            AppError::SliceExecutionFailed(_) => "SliceExecutionFailed",
            AppError::SliceOutputMissing(_) => "SliceOutputMissing",
            AppError::GcodeReadFailed(_) => "GcodeReadFailed",
            AppError::DurationUnavailable(_) => "DurationUnavailable",
            AppError::Overloaded(_) => "Overloaded",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
            // Operators need the resolved/default path to fix the install.
            AppError::EngineNotFound(ref msg) => msg.clone(),
            AppError::SliceExecutionFailed(_) => "Failed to slice the model".to_string(),
            AppError::SliceOutputMissing(_) => {
                "Slicing engine produced no G-code output".to_string()
            }
            AppError::GcodeReadFailed(_) => "Failed to read slicer output".to_string(),
            AppError::DurationUnavailable(_) => {
                "Could not determine the estimated print time for this model".to_string()
            }
            AppError::Overloaded(ref msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_engine_not_found() {
        let err = AppError::EngineNotFound(
            "not found at /usr/bin/prusa-slicer; set PRUSA_SLICER_PATH".to_string(),
        );
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "ENGINE_NOT_FOUND");
        assert!(!err.is_recoverable());
        assert!(err.client_message().contains("/usr/bin/prusa-slicer"));
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_slicing_failures_are_server_errors() {
        let errors = [
            AppError::SliceExecutionFailed("exit status 1".to_string()),
            AppError::SliceOutputMissing("/tmp/out.gcode".to_string()),
            AppError::GcodeReadFailed("permission denied".to_string()),
        ];
        for err in errors {
            assert_eq!(err.http_status_code(), 500, "{}", err.error_type());
        }
    }

    #[test]
    fn test_error_metadata_internal_is_sensitive() {
        let err = AppError::Internal("disk exploded".to_string());
        assert_eq!(err.client_message(), "Internal server error");
        assert!(err.is_sensitive());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_error_metadata_duration_unavailable() {
        let err = AppError::DurationUnavailable("no annotation".to_string());
        assert_eq!(err.http_status_code(), 422);
        assert_eq!(err.error_code(), "DURATION_UNAVAILABLE");
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let source = anyhow::anyhow!("root cause").context("outer context");
        let err = AppError::from(source);
        let details = err.detailed_message();
        assert!(details.contains("Caused by"));
    }

    #[test]
    fn test_error_metadata_suggested_actions() {
        let err1 = AppError::EngineNotFound("x".to_string());
        assert_eq!(
            err1.suggested_action(),
            Some("Install the slicing engine or set PRUSA_SLICER_PATH")
        );

        let err2 = AppError::InvalidInput("test".to_string());
        assert_eq!(
            err2.suggested_action(),
            Some("Check request parameters and try again")
        );
    }
}
