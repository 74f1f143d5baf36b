//! Shared setup for the HTTP tests: a router over a fake slicer and temp directories.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use printquote_core::{Config, QuoteServiceConfig, STANDARD_PRICING};
use printquote_processing::{
    DurationExtractor, QuoteCalculator, QuotePipeline, Slicer, SlicingError,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// What the fake engine does when asked to slice.
#[derive(Clone)]
pub enum FakeOutcome {
    Gcode(&'static str),
    Fail(&'static str),
}

pub struct FakeSlicer {
    scratch_dir: PathBuf,
    engine_path: PathBuf,
    outcome: FakeOutcome,
    /// Mesh paths seen, with whether each existed at slice time.
    pub seen: Mutex<Vec<(PathBuf, bool)>>,
}

#[async_trait]
impl Slicer for FakeSlicer {
    async fn slice(&self, mesh_path: &Path) -> Result<PathBuf, SlicingError> {
        self.seen
            .lock()
            .unwrap()
            .push((mesh_path.to_path_buf(), mesh_path.is_file()));

        match &self.outcome {
            FakeOutcome::Gcode(content) => {
                let out = self.scratch_dir.join("fake.gcode");
                std::fs::write(&out, content)
                    .map_err(|e| SlicingError::SliceExecutionFailed(e.to_string()))?;
                Ok(out)
            }
            FakeOutcome::Fail(stderr) => Err(SlicingError::SliceExecutionFailed(format!(
                "Slicing engine exited with exit status: 1: {}",
                stderr
            ))),
        }
    }

    fn engine_path(&self) -> PathBuf {
        self.engine_path.clone()
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub slicer: Arc<FakeSlicer>,
    pub upload_dir: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub fn uploads_left(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub fn setup_test_app(outcome: FakeOutcome) -> TestApp {
    setup_test_app_with(outcome, &[])
}

pub fn setup_test_app_with(outcome: FakeOutcome, env: &[(&str, &str)]) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let scratch_dir = dir.path().join("gcode");
    let upload_dir = dir.path().join("uploads");
    std::fs::create_dir_all(&scratch_dir).expect("Failed to create scratch dir");

    let scratch = scratch_dir.display().to_string();
    let uploads = upload_dir.display().to_string();
    let mut vars: HashMap<&str, &str> = HashMap::from([
        ("SLICER_SCRATCH_DIR", scratch.as_str()),
        ("UPLOAD_DIR", uploads.as_str()),
        ("MAX_MESH_SIZE_MB", "1"),
    ]);
    vars.extend(env.iter().copied());

    let inner = QuoteServiceConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("Failed to build test config");
    let config = Config(Box::new(inner));

    let slicer = Arc::new(FakeSlicer {
        scratch_dir,
        engine_path: dir.path().join("missing-prusa-slicer"),
        outcome,
        seen: Mutex::new(Vec::new()),
    });

    let pipeline = QuotePipeline::new(
        slicer.clone(),
        DurationExtractor::new().expect("patterns compile"),
        QuoteCalculator::new(STANDARD_PRICING).expect("patterns compile"),
    )
    .with_retain_intermediate_output(config.retain_intermediate_output())
    .with_fallback_print_hours(config.fallback_print_hours());

    let (_state, router) =
        printquote_api::setup::build_app(config, pipeline).expect("Failed to build app");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        slicer,
        upload_dir,
        _dir: dir,
    }
}

pub fn mesh_form(filename: &str, content: &'static [u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(content)
            .file_name(filename)
            .mime_type("application/octet-stream"),
    )
}
