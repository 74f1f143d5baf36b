use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::time::interval;

const CLEANUP_PERIOD: Duration = Duration::from_secs(3600);

/// Slicer output, plus the temporary name the engine writes before renaming.
const SCRATCH_SUFFIXES: &[&str] = &[".gcode", ".gcode.tmp"];

/// Outcome of one sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub scanned: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// Deletes slicer output older than the retention window.
#[derive(Debug, Clone)]
pub struct ScratchCleanupService {
    scratch_dir: PathBuf,
    retention: Duration,
}

impl ScratchCleanupService {
    pub fn new(scratch_dir: impl Into<PathBuf>, retention: Duration) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            retention,
        }
    }

    pub fn from_hours(scratch_dir: impl Into<PathBuf>, hours: u64) -> Self {
        Self::new(scratch_dir, Duration::from_secs(hours.saturating_mul(3600)))
    }

    /// Start the background sweep that runs every hour
    /// Returns a JoinHandle for graceful shutdown
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut cleanup_interval = interval(CLEANUP_PERIOD);

            loop {
                cleanup_interval.tick().await;

                match self.cleanup_expired_files().await {
                    Ok(report) => tracing::info!(
                        scanned = report.scanned,
                        deleted = report.deleted,
                        failed = report.failed,
                        "Scratch cleanup completed"
                    ),
                    Err(e) => tracing::error!(error = %e, "Scratch cleanup failed"),
                }
            }
        })
    }

    #[tracing::instrument(skip(self), fields(scratch_dir = %self.scratch_dir.display()))]
    pub async fn cleanup_expired_files(&self) -> Result<CleanupReport, anyhow::Error> {
        let mut report = CleanupReport::default();

        let mut entries = match tokio::fs::read_dir(&self.scratch_dir).await {
            Ok(entries) => entries,
            // Nothing has been sliced yet.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(report),
            Err(e) => return Err(e.into()),
        };

        let now = SystemTime::now();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !is_scratch_file(&path) {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Failed to stat scratch file");
                    report.failed += 1;
                    continue;
                }
            };
            report.scanned += 1;

            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();
            if age < self.retention {
                continue;
            }

            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), age_secs = age.as_secs(), "Deleted expired scratch file");
                    report.deleted += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, path = %path.display(), "Failed to delete scratch file");
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

fn is_scratch_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_ascii_lowercase())
        .is_some_and(|n| SCRATCH_SUFFIXES.iter().any(|suffix| n.ends_with(suffix)))
}
