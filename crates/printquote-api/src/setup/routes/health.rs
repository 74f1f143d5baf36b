//! Health check handlers and response types.

use crate::constants::API_VERSION;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

#[derive(serde::Serialize)]
pub(super) struct SlicerHealth {
    pub path: String,
    pub available: bool,
}

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: &'static str,
    pub api_version: &'static str,
    pub slicer: SlicerHealth,
    pub available_slots: usize,
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness: the slicing engine executable must exist.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let engine_path = state.pipeline.slicer().engine_path();
    let available = tokio::fs::metadata(&engine_path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);

    let (status_code, status) = if available {
        (StatusCode::OK, "healthy")
    } else {
        tracing::warn!(engine_path = %engine_path.display(), "Slicing engine missing");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status_code,
        Json(HealthCheckResponse {
            status,
            api_version: API_VERSION,
            slicer: SlicerHealth {
                path: engine_path.display().to_string(),
                available,
            },
            available_slots: state.slice_permits.available_permits(),
        }),
    )
}
