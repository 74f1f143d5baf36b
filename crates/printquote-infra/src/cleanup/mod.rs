mod service;

pub use service::{CleanupReport, ScratchCleanupService};
