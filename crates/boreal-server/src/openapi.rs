//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::dto::{
    ContactDto, CreateDatasetRequest, DatasetDetailResponse, DatasetListResponse, DateInfoDto,
    HarvestConfigResponse, HealthResponse, ImportReportResponse, PublicationDto, RecordFailureDto,
    ServiceStatus, StatsResponse, TriggerHarvestRequest,
};
use crate::error::ErrorResponse;
use crate::handlers::{datasets, harvest, harvest_configs, health, stats};

/// OpenAPI documentation for the Boreal API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Boreal API",
        version = "1.0.0",
        description = "Faceted catalog of research datasets harvested from a Dataverse search endpoint.

## Quick Start

1. Check server health: `GET /api/v1/health`
2. Filter datasets: `GET /api/v1/datasets?catalogue=fleuve-saint-laurent&ordering=name`
3. View statistics: `GET /api/v1/stats`

Admin endpoints (`POST /datasets`, `DELETE /datasets/{id}`, `POST /harvest`)
require `Authorization: Bearer <BOREAL_ADMIN_TOKEN>`.
",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        health::health_check,
        stats::get_stats,
        datasets::list_datasets,
        datasets::get_dataset_by_id,
        datasets::create_dataset,
        datasets::delete_dataset,
        harvest::trigger_harvest,
        harvest_configs::list_harvest_configs,
    ),
    components(
        schemas(
            // Request types
            CreateDatasetRequest,
            TriggerHarvestRequest,
            // Response types
            HealthResponse,
            ServiceStatus,
            StatsResponse,
            DatasetListResponse,
            DatasetDetailResponse,
            ContactDto,
            PublicationDto,
            DateInfoDto,
            ImportReportResponse,
            RecordFailureDto,
            HarvestConfigResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health and statistics"),
        (name = "datasets", description = "Facet queries and dataset management"),
        (name = "harvest", description = "Catalog import"),
    )
)]
pub struct ApiDoc;
