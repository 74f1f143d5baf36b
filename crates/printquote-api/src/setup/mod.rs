//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use printquote_core::Config;
use printquote_infra::{init_telemetry, LogFormat, ScratchCleanupService};
use printquote_processing::QuotePipeline;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    init_telemetry("printquote-api", LogFormat::from_env())
        .context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    prepare_directories(&config).await?;

    let pipeline =
        QuotePipeline::from_config(&config).context("Failed to build quote pipeline")?;

    let engine_path = pipeline.slicer().engine_path();
    if !engine_path.is_file() {
        tracing::warn!(
            engine_path = %engine_path.display(),
            "Slicing engine not found; quotes will fail until it is installed"
        );
    }

    // Also sweeps output orphaned by aborted slices, so it runs even when
    // successful output is deleted right away.
    if config.scratch_retention_hours() > 0 {
        let cleanup = Arc::new(ScratchCleanupService::from_hours(
            config.scratch_dir(),
            config.scratch_retention_hours(),
        ));
        // Detached; runs for the life of the process.
        let _cleanup_task = cleanup.start();
        tracing::info!(
            retention_hours = config.scratch_retention_hours(),
            "Scratch cleanup service started"
        );
    }

    build_app(config, pipeline)
}

/// State and router for an already constructed pipeline.
pub fn build_app(
    config: Config,
    pipeline: QuotePipeline,
) -> Result<(Arc<AppState>, axum::Router)> {
    let state = Arc::new(AppState::new(config.clone(), pipeline));
    let router = routes::setup_routes(&config, state.clone())?;
    Ok((state, router))
}

async fn prepare_directories(config: &Config) -> Result<()> {
    for dir in [config.scratch_dir(), config.upload_dir()] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(())
}
