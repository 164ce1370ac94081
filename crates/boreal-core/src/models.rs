//! Domain models for harvested catalog entries.
//!
//! Read-side types (`Dataset`, `Contact`, ...) mirror database rows and derive
//! `sqlx::FromRow`. Write-side types (`NewDataset`, `NewDatasetGraph`, ...)
//! carry no identifiers; the store assigns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier stored when a dataset is created without one.
pub const UNKNOWN_IDENTIFIER: &str = "UNKNOWN";

/// Name given to harvested records that carry no `name_of_dataverse`.
pub const UNTITLED_NAME: &str = "Untitled";

/// A harvested catalog entry as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Dataset {
    pub id: Uuid,
    pub name: String,
    pub identifier: String,
    pub url: String,
    pub description: Option<String>,
    /// Comma-space-joined keyword list.
    pub keywords: Option<String>,
    /// Comma-space-joined subject list.
    pub subjects: Option<String>,
    /// Comma-space-joined author list.
    pub authors: Option<String>,
    /// When the row was written locally.
    pub imported_at: DateTime<Utc>,
}

/// A person or affiliation attached to a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub dataset_id: Uuid,
    /// Position of the contact in the source record.
    pub position: i32,
    pub name: String,
    pub affiliation: Option<String>,
}

/// A citation attached to a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Publication {
    pub id: Uuid,
    pub dataset_id: Uuid,
    pub position: i32,
    pub citation: String,
    pub url: Option<String>,
}

/// Creation, update and publication timestamps for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DateInfo {
    pub id: Uuid,
    pub dataset_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
}

/// A configured recurring harvest job.
///
/// Exposed read-only; the importer does not consume it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HarvestConfig {
    pub id: Uuid,
    pub source_url: String,
    /// Free-form label such as "quotidienne" or "hebdomadaire".
    pub frequency: String,
    pub filters: Option<String>,
    pub active: bool,
}

/// A dataset together with everything that hangs off it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDetail {
    pub dataset: Dataset,
    pub contacts: Vec<Contact>,
    pub publications: Vec<Publication>,
    pub date_info: Option<DateInfo>,
}

impl DatasetDetail {
    /// Wraps a dataset that has no children.
    pub fn bare(dataset: Dataset) -> Self {
        Self {
            dataset,
            contacts: Vec::new(),
            publications: Vec::new(),
            date_info: None,
        }
    }

    /// Publication timestamp, if the dataset has date information.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.date_info.as_ref().map(|d| d.published_at)
    }
}

/// Scalar dataset fields ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDataset {
    pub name: String,
    pub identifier: String,
    pub url: String,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub subjects: Option<String>,
    pub authors: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub name: String,
    pub affiliation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPublication {
    pub citation: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewDateInfo {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
}

/// Everything written for one dataset in a single store call.
///
/// Stores persist the whole graph atomically: either every row is written or
/// none is.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDatasetGraph {
    pub dataset: NewDataset,
    pub contacts: Vec<NewContact>,
    pub publications: Vec<NewPublication>,
    pub date_info: Option<NewDateInfo>,
}

impl NewDatasetGraph {
    /// A graph with only the dataset row.
    pub fn without_children(dataset: NewDataset) -> Self {
        Self {
            dataset,
            contacts: Vec::new(),
            publications: Vec::new(),
            date_info: None,
        }
    }
}

/// Input for the single-record creation path.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateDataset {
    pub name: String,
    pub identifier: Option<String>,
    #[serde(default)]
    pub url: String,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub subjects: Option<String>,
    pub authors: Option<String>,
}

impl CreateDataset {
    /// Converts into an insertable dataset, applying the `UNKNOWN` identifier default.
    pub fn into_new_dataset(self) -> NewDataset {
        NewDataset {
            name: self.name.trim().to_string(),
            identifier: self
                .identifier
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_IDENTIFIER.to_string()),
            url: self.url,
            description: self.description,
            keywords: self.keywords,
            subjects: self.subjects,
            authors: self.authors,
        }
    }
}

/// Aggregate row counts across the catalog tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCounts {
    pub datasets: i64,
    pub contacts: i64,
    pub publications: i64,
    pub date_infos: i64,
}
