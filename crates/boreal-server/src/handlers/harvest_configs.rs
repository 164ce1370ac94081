use axum::{Json, extract::State};

use crate::dto::HarvestConfigResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// List configured harvest schedules.
#[utoipa::path(
    get,
    path = "/api/v1/harvest-configs",
    responses(
        (status = 200, description = "Harvest configurations", body = Vec<HarvestConfigResponse>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "harvest"
)]
pub async fn list_harvest_configs(
    State(state): State<AppState>,
) -> Result<Json<Vec<HarvestConfigResponse>>, ApiError> {
    let configs = state.dataset_service.harvest_configs().await?;
    Ok(Json(
        configs.into_iter().map(HarvestConfigResponse::from).collect(),
    ))
}
