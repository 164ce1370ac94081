//! Dataset endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use boreal_core::FacetQuery;

use crate::dto::{CreateDatasetRequest, DatasetDetailResponse, DatasetListResponse, DatasetsQuery};
use crate::error::ApiError;
use crate::state::AppState;

/// List datasets matching facet parameters.
///
/// Each dataset appears once, with its contacts, publications and dates.
#[utoipa::path(
    get,
    path = "/api/v1/datasets",
    params(DatasetsQuery),
    responses(
        (status = 200, description = "Matching datasets", body = DatasetListResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "datasets"
)]
pub async fn list_datasets(
    State(state): State<AppState>,
    Query(params): Query<DatasetsQuery>,
) -> Result<Json<DatasetListResponse>, ApiError> {
    let query = FacetQuery::from(params);
    let details = state.dataset_service.filter(&query).await?;
    Ok(Json(DatasetListResponse::from(details)))
}

/// Get a dataset by ID.
#[utoipa::path(
    get,
    path = "/api/v1/datasets/{id}",
    params(
        ("id" = Uuid, Path, description = "Dataset UUID")
    ),
    responses(
        (status = 200, description = "Dataset found", body = DatasetDetailResponse),
        (status = 404, description = "Dataset not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "datasets"
)]
pub async fn get_dataset_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DatasetDetailResponse>, ApiError> {
    let detail = state.dataset_service.get(id).await?;
    Ok(Json(DatasetDetailResponse::from(detail)))
}

/// Create a single dataset.
///
/// Rejects a name that already exists. No contacts, publications or dates
/// are created.
#[utoipa::path(
    post,
    path = "/api/v1/datasets",
    request_body = CreateDatasetRequest,
    responses(
        (status = 201, description = "Dataset created", body = DatasetDetailResponse),
        (status = 400, description = "Duplicate or blank name"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin endpoints disabled"),
    ),
    tag = "datasets"
)]
pub async fn create_dataset(
    State(state): State<AppState>,
    Json(request): Json<CreateDatasetRequest>,
) -> Result<(StatusCode, Json<DatasetDetailResponse>), ApiError> {
    let detail = state.dataset_service.create_unique(request.into()).await?;
    Ok((StatusCode::CREATED, Json(DatasetDetailResponse::from(detail))))
}

/// Delete a dataset and everything attached to it.
#[utoipa::path(
    delete,
    path = "/api/v1/datasets/{id}",
    params(
        ("id" = Uuid, Path, description = "Dataset UUID")
    ),
    responses(
        (status = 204, description = "Dataset deleted"),
        (status = 404, description = "Dataset not found"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin endpoints disabled"),
    ),
    tag = "datasets"
)]
pub async fn delete_dataset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.dataset_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
