//! Request DTOs for API endpoints.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use boreal_core::{CreateDataset, FacetQuery};

/// Facet query parameters for dataset listing.
///
/// Every parameter is optional; an absent or empty one places no constraint.
/// Parameters combine with AND.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct DatasetsQuery {
    /// Comma-separated terms, any of which may match keywords, name or description
    #[param(example = "glace,salinite")]
    pub mots_cles: Option<String>,

    /// Alias of `mots_cles`, ignored when `mots_cles` is set
    pub keywords: Option<String>,

    /// Comma-separated terms, any of which may match authors
    pub organisations: Option<String>,

    /// Comma-separated terms, any of which may match subjects
    pub localisations: Option<String>,

    /// Catalogue slug; any of its synonyms may match subjects, keywords or description
    #[param(example = "fleuve-saint-laurent")]
    pub catalogue: Option<String>,

    /// Theme slug; any of its synonyms may match subjects, keywords or description
    #[param(example = "climat")]
    pub thematique: Option<String>,

    /// Producer name, matched whole (not split on commas) against authors
    pub producteur: Option<String>,

    /// Earliest publication date (YYYY-MM-DD, inclusive)
    #[param(example = "2020-01-01")]
    pub date_debut: Option<String>,

    /// Latest publication date (YYYY-MM-DD, inclusive)
    #[param(example = "2020-12-31")]
    pub date_fin: Option<String>,

    /// Terms split on whitespace and commas; every term must match name, authors,
    /// keywords, subjects or description
    pub search: Option<String>,

    /// Sort key: name, -name, identifier, -identifier
    #[param(example = "name")]
    pub ordering: Option<String>,
}

impl From<DatasetsQuery> for FacetQuery {
    fn from(q: DatasetsQuery) -> Self {
        Self {
            mots_cles: q.mots_cles,
            keywords: q.keywords,
            organisations: q.organisations,
            localisations: q.localisations,
            catalogue: q.catalogue,
            thematique: q.thematique,
            producteur: q.producteur,
            date_debut: q.date_debut,
            date_fin: q.date_fin,
            search: q.search,
            ordering: q.ordering,
        }
    }
}

/// Request body for creating a single dataset.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDatasetRequest {
    /// Dataset name (must be unique and non-blank)
    #[schema(example = "Ice cover, Gulf of St. Lawrence")]
    pub name: String,
    /// Upstream identifier (default: "UNKNOWN")
    pub identifier: Option<String>,
    /// Landing page URL
    #[serde(default)]
    pub url: String,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub subjects: Option<String>,
    pub authors: Option<String>,
}

impl From<CreateDatasetRequest> for CreateDataset {
    fn from(r: CreateDatasetRequest) -> Self {
        Self {
            name: r.name,
            identifier: r.identifier,
            url: r.url,
            description: r.description,
            keywords: r.keywords,
            subjects: r.subjects,
            authors: r.authors,
        }
    }
}

/// Request body for triggering a harvest run.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TriggerHarvestRequest {
    /// Search query sent to the catalog (default: the configured import query)
    #[schema(example = "fleuve-saint-laurent")]
    pub query: Option<String>,
}
