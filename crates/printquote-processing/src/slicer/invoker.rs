//! SlicerInvoker - runs the slicing engine as a child process and produces G-code.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use uuid::Uuid;

use super::engine::EngineResolver;
use super::job::SliceJob;
use crate::error::SlicingError;
use crate::traits::Slicer;

/// Upper bound on engine diagnostics carried inside an error message.
const MAX_DIAGNOSTIC_CHARS: usize = 2000;

#[derive(Debug, Clone)]
pub struct SlicerSettings {
    /// Directory receiving one G-code file per invocation; created if absent.
    pub scratch_dir: PathBuf,
    /// Passed to the engine with `--load` when the file exists at call time.
    pub profile_path: Option<PathBuf>,
    pub timeout: Duration,
}

impl SlicerSettings {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            profile_path: None,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_profile(mut self, profile_path: impl Into<PathBuf>) -> Self {
        self.profile_path = Some(profile_path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct SlicerInvoker {
    resolver: EngineResolver,
    settings: SlicerSettings,
}

impl SlicerInvoker {
    pub fn new(resolver: EngineResolver, settings: SlicerSettings) -> Self {
        Self { resolver, settings }
    }

    pub fn resolver(&self) -> &EngineResolver {
        &self.resolver
    }

    pub fn settings(&self) -> &SlicerSettings {
        &self.settings
    }

    /// Slice a mesh file into a fresh G-code file inside the scratch directory.
    ///
    /// The output file is left in place on success; the caller owns its cleanup.
    /// On any failure, or if this future is dropped mid-slice, the partially
    /// written output (if any) is removed.
    #[tracing::instrument(skip(self), fields(
        process.executable.path = tracing::field::Empty,
        slicer.output_path = tracing::field::Empty
    ))]
    pub async fn slice_mesh(&self, mesh_path: &Path) -> Result<PathBuf, SlicingError> {
        let start = Instant::now();

        let engine_path = self.resolver.resolve();
        tracing::Span::current().record(
            "process.executable.path",
            tracing::field::display(engine_path.display()),
        );
        if !is_file(&engine_path).await {
            tracing::error!(
                engine_path = %engine_path.display(),
                default_path = %self.resolver.default_path().display(),
                platform = %self.resolver.platform(),
                "Slicing engine executable not found"
            );
            return Err(self.resolver.not_found(&engine_path));
        }

        tokio::fs::create_dir_all(&self.settings.scratch_dir)
            .await
            .map_err(|e| {
                SlicingError::SliceExecutionFailed(format!(
                    "Failed to create scratch directory {}: {}",
                    self.settings.scratch_dir.display(),
                    e
                ))
            })?;

        let job = SliceJob {
            input_path: mesh_path.to_path_buf(),
            engine_path,
            output_path: self.settings.scratch_dir.join(unique_output_name()),
            profile_path: self.available_profile().await,
            timeout: self.settings.timeout,
        };
        tracing::Span::current().record(
            "slicer.output_path",
            tracing::field::display(job.output_path.display()),
        );

        let partial_output = PartialOutput::new(job.output_path.clone());
        run_job(&job).await?;

        if !is_file(&job.output_path).await {
            tracing::error!(
                output_path = %job.output_path.display(),
                "Slicing engine exited successfully without writing output"
            );
            return Err(SlicingError::SliceOutputMissing(job.output_path));
        }
        partial_output.keep();

        tracing::info!(
            duration_ms = start.elapsed().as_millis() as u64,
            output_path = %job.output_path.display(),
            with_profile = job.profile_path.is_some(),
            "Slicing completed"
        );

        Ok(job.output_path)
    }

    async fn available_profile(&self) -> Option<PathBuf> {
        let profile = self.settings.profile_path.as_ref()?;
        if is_file(profile).await {
            Some(profile.clone())
        } else {
            tracing::debug!(
                profile_path = %profile.display(),
                "Slicer profile not found, using fallback preset"
            );
            None
        }
    }
}

#[async_trait]
impl Slicer for SlicerInvoker {
    async fn slice(&self, mesh_path: &Path) -> Result<PathBuf, SlicingError> {
        self.slice_mesh(mesh_path).await
    }

    fn engine_path(&self) -> PathBuf {
        self.resolver.resolve()
    }
}

async fn run_job(job: &SliceJob) -> Result<(), SlicingError> {
    let child = Command::new(&job.engine_path)
        .args(job.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            SlicingError::SliceExecutionFailed(format!(
                "Failed to start {}: {}",
                job.engine_path.display(),
                e
            ))
        })?;

    // Dropping the wait future on timeout drops the child, which kills it.
    let output = match tokio::time::timeout(job.timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| {
            SlicingError::SliceExecutionFailed(format!("Failed to wait for slicing engine: {}", e))
        })?,
        Err(_) => {
            tracing::warn!(
                timeout_secs = job.timeout.as_secs_f64(),
                input_path = %job.input_path.display(),
                "Slicing engine timed out and was terminated"
            );
            return Err(SlicingError::SliceExecutionFailed(format!(
                "Slicing timed out after {:.1}s",
                job.timeout.as_secs_f64()
            )));
        }
    };

    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        let diagnostics = if stderr.trim().is_empty() {
            String::from_utf8_lossy(&output.stdout).into_owned()
        } else {
            stderr.into_owned()
        };
        return Err(SlicingError::SliceExecutionFailed(format!(
            "Slicing engine exited with {}: {}",
            output.status,
            truncate_diagnostics(diagnostics.trim(), MAX_DIAGNOSTIC_CHARS)
        )));
    }

    if !stderr.trim().is_empty() {
        tracing::warn!(
            stderr = %truncate_diagnostics(stderr.trim(), MAX_DIAGNOSTIC_CHARS),
            "Slicing engine wrote to stderr"
        );
    }

    Ok(())
}

/// Timestamp plus a random suffix, so concurrent jobs never share a file.
fn unique_output_name() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}.gcode",
        Utc::now().format("%Y%m%dT%H%M%S%3f"),
        &suffix[..12]
    )
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// Output file of an unfinished slice. Removed on drop unless [`PartialOutput::keep`]
/// is called, which also covers the slice future being dropped while the engine runs.
struct PartialOutput {
    path: Option<PathBuf>,
}

impl PartialOutput {
    fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn keep(mut self) {
        self.path = None;
    }
}

impl Drop for PartialOutput {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(output_path = %path.display(), "Removed partial slicer output");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    output_path = %path.display(),
                    "Failed to remove partial slicer output"
                );
            }
        }
    }
}

/// Truncate to `max_chars` characters, appending "..." if truncated.
fn truncate_diagnostics(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slicer::engine::Platform;

    #[test]
    fn test_unique_output_names() {
        let a = unique_output_name();
        let b = unique_output_name();
        assert_ne!(a, b);
        assert!(a.ends_with(".gcode"));
    }

    #[test]
    fn test_truncate_diagnostics() {
        assert_eq!(truncate_diagnostics("short", 10), "short");
        assert_eq!(truncate_diagnostics("hello world", 8), "hello...");
        assert_eq!(truncate_diagnostics("가나다라마", 4), "가...");
    }

    #[tokio::test]
    async fn test_missing_engine_reports_default_path_and_override() {
        let scratch = tempfile::tempdir().unwrap();
        let resolver =
            EngineResolver::with_default_path(Platform::Linux, "/nonexistent/prusa-slicer", None);
        let invoker = SlicerInvoker::new(resolver, SlicerSettings::new(scratch.path()));

        let err = invoker
            .slice_mesh(Path::new("/uploads/model.stl"))
            .await
            .unwrap_err();

        assert!(matches!(err, SlicingError::EngineNotFound { .. }));
        let message = err.to_string();
        assert!(message.contains("/nonexistent/prusa-slicer"));
        assert!(message.contains("PRUSA_SLICER_PATH"));
    }

    #[tokio::test]
    async fn test_missing_override_reports_platform_default() {
        let scratch = tempfile::tempdir().unwrap();
        let resolver = EngineResolver::with_default_path(
            Platform::Linux,
            "/nonexistent/default-slicer",
            Some(PathBuf::from("/nonexistent/override-slicer")),
        );
        let invoker = SlicerInvoker::new(resolver, SlicerSettings::new(scratch.path()));

        let message = invoker
            .slice_mesh(Path::new("/uploads/model.stl"))
            .await
            .unwrap_err()
            .to_string();

        assert!(message.contains("/nonexistent/override-slicer"));
        assert!(message.contains("/nonexistent/default-slicer"));
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        /// Write an executable shell script standing in for the slicing engine.
        /// `$OUT` holds the value passed with `--output`.
        fn fake_engine(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("fake-slicer.sh");
            let script = format!(
                "#!/bin/sh\nOUT=\"\"\nwhile [ $# -gt 0 ]; do\n  case \"$1\" in\n    --output) OUT=\"$2\"; shift 2 ;;\n    *) shift ;;\n  esac\ndone\n{}\n",
                body
            );
            std::fs::write(&path, script).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn invoker_for(engine: PathBuf, scratch: &Path, timeout: Duration) -> SlicerInvoker {
            let resolver = EngineResolver::new(Platform::Linux, Some(engine));
            SlicerInvoker::new(
                resolver,
                SlicerSettings::new(scratch.join("gcode")).with_timeout(timeout),
            )
        }

        fn scratch_entries(scratch: &Path) -> usize {
            std::fs::read_dir(scratch.join("gcode"))
                .map(|entries| entries.count())
                .unwrap_or(0)
        }

        #[tokio::test]
        async fn test_successful_slice_keeps_output() {
            let dir = tempfile::tempdir().unwrap();
            let engine = fake_engine(
                dir.path(),
                "echo '; estimated printing time (normal mode) = 1h 2m 3s' > \"$OUT\"\necho 'warning: thin walls' >&2",
            );
            let invoker = invoker_for(engine, dir.path(), Duration::from_secs(10));

            let output = invoker
                .slice_mesh(&dir.path().join("model.stl"))
                .await
                .unwrap();

            assert!(output.starts_with(dir.path().join("gcode")));
            let content = std::fs::read_to_string(&output).unwrap();
            assert!(content.contains("1h 2m 3s"));
        }

        #[tokio::test]
        async fn test_profile_is_loaded_when_present() {
            let dir = tempfile::tempdir().unwrap();
            let profile = dir.path().join("profile.ini");
            std::fs::write(&profile, "fill_density = 20%\n").unwrap();
            let engine = fake_engine(dir.path(), "echo ok > \"$OUT\"");
            let resolver = EngineResolver::new(Platform::Linux, Some(engine));
            let invoker = SlicerInvoker::new(
                resolver,
                SlicerSettings::new(dir.path().join("gcode")).with_profile(&profile),
            );

            assert_eq!(invoker.available_profile().await, Some(profile));
            assert!(invoker.slice_mesh(&dir.path().join("m.stl")).await.is_ok());
        }

        #[tokio::test]
        async fn test_missing_profile_uses_fallback() {
            let dir = tempfile::tempdir().unwrap();
            let resolver = EngineResolver::new(Platform::Linux, None);
            let invoker = SlicerInvoker::new(
                resolver,
                SlicerSettings::new(dir.path()).with_profile(dir.path().join("missing.ini")),
            );
            assert_eq!(invoker.available_profile().await, None);
        }

        #[tokio::test]
        async fn test_failed_exit_removes_partial_output() {
            let dir = tempfile::tempdir().unwrap();
            let engine = fake_engine(
                dir.path(),
                "echo 'G1 X10 Y10' > \"$OUT\"\necho 'Object has no volume' >&2\nexit 3",
            );
            let invoker = invoker_for(engine, dir.path(), Duration::from_secs(10));

            let err = invoker
                .slice_mesh(&dir.path().join("model.stl"))
                .await
                .unwrap_err();

            match err {
                SlicingError::SliceExecutionFailed(msg) => {
                    assert!(msg.contains("Object has no volume"), "{}", msg)
                }
                other => panic!("Expected SliceExecutionFailed, got {:?}", other),
            }
            assert_eq!(scratch_entries(dir.path()), 0);
        }

        #[tokio::test]
        async fn test_timeout_kills_engine_and_removes_partial_output() {
            let dir = tempfile::tempdir().unwrap();
            let engine = fake_engine(dir.path(), "echo 'G28' > \"$OUT\"\nexec sleep 30");
            let invoker = invoker_for(engine, dir.path(), Duration::from_millis(500));

            let start = Instant::now();
            let err = invoker
                .slice_mesh(&dir.path().join("model.stl"))
                .await
                .unwrap_err();

            assert!(start.elapsed() < Duration::from_secs(10));
            match err {
                SlicingError::SliceExecutionFailed(msg) => assert!(msg.contains("timed out")),
                other => panic!("Expected SliceExecutionFailed, got {:?}", other),
            }
            assert_eq!(scratch_entries(dir.path()), 0);
        }

        #[tokio::test]
        async fn test_abandoned_slice_removes_partial_output() {
            let dir = tempfile::tempdir().unwrap();
            let engine = fake_engine(dir.path(), "echo 'G28' > \"$OUT\"\nexec sleep 30");
            let invoker = invoker_for(engine, dir.path(), Duration::from_secs(60));
            let mesh = dir.path().join("model.stl");

            let mut slice = Box::pin(invoker.slice_mesh(&mesh));
            let deadline = Instant::now() + Duration::from_secs(10);
            while scratch_entries(dir.path()) == 0 {
                assert!(Instant::now() < deadline, "engine never wrote output");
                tokio::select! {
                    _ = slice.as_mut() => panic!("slice should still be running"),
                    _ = tokio::time::sleep(Duration::from_millis(20)) => {}
                }
            }

            // Dropped as an abandoned request would be.
            drop(slice);
            assert_eq!(scratch_entries(dir.path()), 0);
        }

        #[tokio::test]
        async fn test_success_without_output_is_output_missing() {
            let dir = tempfile::tempdir().unwrap();
            let engine = fake_engine(dir.path(), "exit 0");
            let invoker = invoker_for(engine, dir.path(), Duration::from_secs(10));

            let err = invoker
                .slice_mesh(&dir.path().join("model.stl"))
                .await
                .unwrap_err();

            assert!(matches!(err, SlicingError::SliceOutputMissing(_)));
        }
    }
}
