//! PrintQuote Infrastructure Library
//!
//! Shared plumbing for the PrintQuote binaries:
//! - Telemetry initialization (tracing-subscriber)
//! - Request ID middleware
//! - Scratch directory cleanup

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "cleanup")]
pub mod cleanup;

#[cfg(feature = "middleware")]
pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry, LogFormat, DEFAULT_LOG_FILTER};

#[cfg(feature = "cleanup")]
pub use cleanup::{CleanupReport, ScratchCleanupService};
