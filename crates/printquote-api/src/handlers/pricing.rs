use crate::state::AppState;
use axum::{extract::State, Json};
use printquote_core::models::PricingSummary;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v0/pricing",
    tag = "quotes",
    responses(
        (status = 200, description = "Material rates, color surcharges and base cost", body = PricingSummary)
    )
)]
pub async fn get_pricing(State(state): State<Arc<AppState>>) -> Json<PricingSummary> {
    Json(state.pipeline.calculator().pricing().summary())
}
