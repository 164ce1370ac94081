//! Statistics endpoint.

use axum::{Json, extract::State};

use crate::dto::StatsResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Get row counts across the catalog tables.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    responses(
        (status = 200, description = "Catalog statistics", body = StatsResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "system"
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let counts = state.dataset_service.stats().await?;
    Ok(Json(StatsResponse::from(counts)))
}
