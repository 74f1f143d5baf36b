use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_quote_upload, stage_upload};
use axum::{
    extract::{Multipart, State},
    Json,
};
use printquote_core::{AppError, QuoteResponse};
use printquote_processing::display_name;
use std::sync::Arc;
use std::time::Instant;
use utoipa::ToSchema;

/// Multipart form accepted by the quote endpoint (documentation only).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct QuoteForm {
    /// Mesh file (STL, OBJ or 3MF)
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    /// Material identifier, default "PLA"
    material: Option<String>,
    /// Color identifier, default "화이트"
    color: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v0/quotes",
    tag = "quotes",
    request_body(content = QuoteForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Model sliced and priced", body = QuoteResponse),
        (status = 400, description = "Invalid upload", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 422, description = "Slicer output carries no print time estimate", body = ErrorResponse),
        (status = 500, description = "Slicing failed", body = ErrorResponse),
        (status = 503, description = "All slicer slots busy", body = ErrorResponse)
    )
)]
pub async fn create_quote(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<QuoteResponse>, HttpAppError> {
    let start = Instant::now();
    let upload = extract_quote_upload(multipart).await?;

    let original_name = display_name(&upload.filename);
    let extension = state
        .validator
        .validate_all(&original_name, upload.data.len())?;

    tracing::info!(
        original_name = %original_name,
        size_bytes = upload.data.len(),
        material = %upload.material,
        color = %upload.color,
        "Quote requested"
    );

    // Removed from disk when dropped, whichever way this handler exits.
    let mesh_path = stage_upload(state.config.upload_dir(), &extension, &upload.data).await?;

    let _permit = tokio::time::timeout(
        state.slot_wait(),
        state.slice_permits.clone().acquire_owned(),
    )
    .await
    .map_err(|_| {
        AppError::Overloaded("All slicing slots are busy, try again shortly".to_string())
    })?
    .map_err(|e| AppError::Internal(format!("Slice permit pool closed: {}", e)))?;

    let quote = state
        .pipeline
        .quote(&mesh_path, &upload.material, &upload.color)
        .await?;

    if let Err(e) = mesh_path.close() {
        tracing::warn!(error = %e, "Failed to delete uploaded mesh");
    }

    let quote = quote.ok_or_else(|| {
        AppError::DurationUnavailable(format!(
            "No recognized print time annotation in slicer output for {}",
            original_name
        ))
    })?;

    tracing::info!(
        original_name = %original_name,
        print_time = %quote.print_time,
        estimated_price = quote.total,
        duration_ms = start.elapsed().as_millis() as u64,
        "Quote completed"
    );

    Ok(Json(QuoteResponse::from_quote(quote, original_name)))
}
