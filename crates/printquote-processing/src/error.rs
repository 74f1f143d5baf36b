use std::path::PathBuf;

use crate::slicer::Platform;

/// Failures of the slicing pipeline.
///
/// "No duration annotation found" is not an error; see [`crate::DurationExtractor`].
#[derive(Debug, thiserror::Error)]
pub enum SlicingError {
    #[error(
        "Slicing engine not found at {}. Default {platform} install path is {}; \
         set PRUSA_SLICER_PATH to use an engine installed elsewhere",
        .resolved.display(),
        .default_path.display()
    )]
    EngineNotFound {
        resolved: PathBuf,
        default_path: PathBuf,
        platform: Platform,
    },

    #[error("Slicing engine failed: {0}")]
    SliceExecutionFailed(String),

    #[error("Slicing engine reported success but no output was written to {}", .0.display())]
    SliceOutputMissing(PathBuf),

    #[error("Failed to read G-code file {}: {source}", .path.display())]
    GcodeReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<SlicingError> for printquote_core::AppError {
    fn from(err: SlicingError) -> Self {
        use printquote_core::AppError;

        // AppError adds its own prefix, so only the payload is carried over.
        match err {
            SlicingError::EngineNotFound { .. } => AppError::EngineNotFound(err.to_string()),
            SlicingError::SliceExecutionFailed(detail) => AppError::SliceExecutionFailed(detail),
            SlicingError::SliceOutputMissing(path) => {
                AppError::SliceOutputMissing(path.display().to_string())
            }
            SlicingError::GcodeReadFailed { path, source } => {
                AppError::GcodeReadFailed(format!("{}: {}", path.display(), source))
            }
        }
    }
}
