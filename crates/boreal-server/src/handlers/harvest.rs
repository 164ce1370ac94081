//! Harvest endpoint.

use axum::{Json, extract::State};

use boreal_core::TracingReporter;

use crate::dto::{ImportReportResponse, TriggerHarvestRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// Run an import from the remote catalog.
///
/// The run completes before the response is sent. A failed catalog request
/// is reported in `fetch_error` rather than as an HTTP error; per-record
/// failures are listed in `failures`.
#[utoipa::path(
    post,
    path = "/api/v1/harvest",
    request_body = TriggerHarvestRequest,
    responses(
        (status = 200, description = "Harvest finished", body = ImportReportResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin endpoints disabled"),
    ),
    tag = "harvest"
)]
pub async fn trigger_harvest(
    State(state): State<AppState>,
    request: Option<Json<TriggerHarvestRequest>>,
) -> Result<Json<ImportReportResponse>, ApiError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let query = request
        .query
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| state.harvest_service.config().query.clone());

    let report = state
        .harvest_service
        .import_all_with_progress(&query, &TracingReporter)
        .await;

    Ok(Json(ImportReportResponse::from(report)))
}
