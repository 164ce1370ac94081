//! Response DTOs for API endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use boreal_core::{
    Contact, Dataset, DatasetDetail, DateInfo, HarvestConfig, ImportCounts, ImportReport,
    Publication, RecordFailure,
};

// =============================================================================
// Health & Stats
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("healthy" or "unhealthy")
    pub status: String,
    /// Server version
    pub version: String,
    /// Database connectivity status
    pub database: ServiceStatus,
}

/// Status of an individual service component.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    /// Whether the service is reachable
    pub healthy: bool,
    /// Optional message (e.g., error details)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Row counts across the catalog tables.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub datasets: i64,
    pub contacts: i64,
    pub publications: i64,
    pub date_infos: i64,
}

impl From<ImportCounts> for StatsResponse {
    fn from(c: ImportCounts) -> Self {
        Self {
            datasets: c.datasets,
            contacts: c.contacts,
            publications: c.publications,
            date_infos: c.date_infos,
        }
    }
}

// =============================================================================
// Datasets
// =============================================================================

/// Facet query result.
#[derive(Debug, Serialize, ToSchema)]
pub struct DatasetListResponse {
    /// Number of datasets returned
    pub count: usize,
    pub results: Vec<DatasetDetailResponse>,
}

impl From<Vec<DatasetDetail>> for DatasetListResponse {
    fn from(details: Vec<DatasetDetail>) -> Self {
        let results: Vec<DatasetDetailResponse> =
            details.into_iter().map(DatasetDetailResponse::from).collect();
        Self {
            count: results.len(),
            results,
        }
    }
}

/// A dataset with its contacts, publications and dates.
#[derive(Debug, Serialize, ToSchema)]
pub struct DatasetDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub identifier: String,
    pub url: String,
    pub description: Option<String>,
    /// Comma-separated keyword list
    pub keywords: Option<String>,
    /// Comma-separated subject list
    pub subjects: Option<String>,
    /// Comma-separated author list
    pub authors: Option<String>,
    pub imported_at: DateTime<Utc>,
    pub contacts: Vec<ContactDto>,
    pub publications: Vec<PublicationDto>,
    pub date_info: Option<DateInfoDto>,
}

impl From<DatasetDetail> for DatasetDetailResponse {
    fn from(d: DatasetDetail) -> Self {
        let Dataset {
            id,
            name,
            identifier,
            url,
            description,
            keywords,
            subjects,
            authors,
            imported_at,
        } = d.dataset;

        Self {
            id,
            name,
            identifier,
            url,
            description,
            keywords,
            subjects,
            authors,
            imported_at,
            contacts: d.contacts.into_iter().map(ContactDto::from).collect(),
            publications: d
                .publications
                .into_iter()
                .map(PublicationDto::from)
                .collect(),
            date_info: d.date_info.map(DateInfoDto::from),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactDto {
    pub name: String,
    pub affiliation: Option<String>,
}

impl From<Contact> for ContactDto {
    fn from(c: Contact) -> Self {
        Self {
            name: c.name,
            affiliation: c.affiliation,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicationDto {
    pub citation: String,
    pub url: Option<String>,
}

impl From<Publication> for PublicationDto {
    fn from(p: Publication) -> Self {
        Self {
            citation: p.citation,
            url: p.url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DateInfoDto {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
}

impl From<DateInfo> for DateInfoDto {
    fn from(d: DateInfo) -> Self {
        Self {
            created_at: d.created_at,
            updated_at: d.updated_at,
            published_at: d.published_at,
        }
    }
}

// =============================================================================
// Harvest
// =============================================================================

/// Outcome of a harvest run.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportReportResponse {
    /// Query sent to the catalog
    pub query: String,
    /// Raw records returned by the catalog
    pub fetched: usize,
    /// Number of datasets created
    pub imported: usize,
    /// Ids of created datasets, in arrival order
    pub imported_ids: Vec<Uuid>,
    pub failures: Vec<RecordFailureDto>,
    /// Set when the catalog request failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
    /// Row counts after the run, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<StatsResponse>,
}

impl From<ImportReport> for ImportReportResponse {
    fn from(r: ImportReport) -> Self {
        Self {
            query: r.query,
            fetched: r.fetched,
            imported: r.imported.len(),
            imported_ids: r.imported.iter().map(|d| d.id).collect(),
            failures: r.failures.into_iter().map(RecordFailureDto::from).collect(),
            fetch_error: r.fetch_error,
            totals: r.totals.map(StatsResponse::from),
        }
    }
}

/// A record skipped during a harvest run.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordFailureDto {
    /// Position of the record in the fetched list
    pub index: usize,
    pub name: String,
    pub error: String,
}

impl From<RecordFailure> for RecordFailureDto {
    fn from(f: RecordFailure) -> Self {
        Self {
            index: f.index,
            name: f.name,
            error: f.error,
        }
    }
}

/// Scheduled harvest definition.
#[derive(Debug, Serialize, ToSchema)]
pub struct HarvestConfigResponse {
    pub id: Uuid,
    pub source_url: String,
    pub frequency: String,
    pub filters: Option<String>,
    pub active: bool,
}

impl From<HarvestConfig> for HarvestConfigResponse {
    fn from(c: HarvestConfig) -> Self {
        Self {
            id: c.id,
            source_url: c.source_url,
            frequency: c.frequency,
            filters: c.filters,
            active: c.active,
        }
    }
}
