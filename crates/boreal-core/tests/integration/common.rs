//! Test utilities and mock implementations for integration tests.
//!
//! Provides mock implementations of the core traits for testing
//! `HarvestService` and `DatasetService` in isolation.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use boreal_core::traits::{CatalogClient, DatasetStore};
use boreal_core::{
    AppError, Contact, Dataset, DatasetDetail, DatasetFilter, DateInfo, FixedClock,
    HarvestConfig, ImportCounts, NewDatasetGraph, Publication, RawRecord,
};
use chrono::{TimeZone, Utc};
use uuid::Uuid;

/// Instant returned by the test clock.
pub fn test_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2031, 7, 1, 9, 30, 0).unwrap())
}

// =============================================================================
// MockCatalogClient
// =============================================================================

/// Mock catalog client returning a fixed list of records or a fixed error.
#[derive(Clone)]
pub struct MockCatalogClient {
    records: Vec<RawRecord>,
    fail_with: Option<String>,
    /// Every `(query, per_page)` the client was called with.
    pub calls: Arc<Mutex<Vec<(String, usize)>>>,
}

impl MockCatalogClient {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            records,
            fail_with: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A client whose every search fails with a client error.
    #[allow(dead_code)]
    pub fn failing(message: &str) -> Self {
        Self {
            records: Vec::new(),
            fail_with: Some(message.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl CatalogClient for MockCatalogClient {
    async fn search(&self, query: &str, per_page: usize) -> Result<Vec<RawRecord>, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), per_page));

        match &self.fail_with {
            Some(message) => Err(AppError::ClientError(message.clone())),
            None => Ok(self.records.clone()),
        }
    }

    fn endpoint(&self) -> &str {
        "https://mock-catalog.example.com/api/search"
    }
}

// =============================================================================
// MockDatasetStore
// =============================================================================

/// In-memory dataset store for testing.
///
/// Keeps datasets in insertion order and evaluates filters with
/// `DatasetFilter::matches`.
#[derive(Clone, Default)]
pub struct MockDatasetStore {
    details: Arc<Mutex<Vec<DatasetDetail>>>,
    /// Dataset names whose writes fail, simulating a database error.
    failing_names: Arc<Mutex<HashSet<String>>>,
    harvest_configs: Arc<Mutex<Vec<HarvestConfig>>>,
}

impl MockDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write of a dataset with this name fail.
    #[allow(dead_code)]
    pub fn fail_on_name(&self, name: &str) {
        self.failing_names.lock().unwrap().insert(name.to_string());
    }

    #[allow(dead_code)]
    pub fn add_harvest_config(&self, config: HarvestConfig) {
        self.harvest_configs.lock().unwrap().push(config);
    }

    /// Returns the number of stored datasets.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.details.lock().unwrap().len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a snapshot of everything stored.
    #[allow(dead_code)]
    pub fn all(&self) -> Vec<DatasetDetail> {
        self.details.lock().unwrap().clone()
    }
}

impl DatasetStore for MockDatasetStore {
    async fn create_dataset(&self, graph: &NewDatasetGraph) -> Result<Dataset, AppError> {
        if self
            .failing_names
            .lock()
            .unwrap()
            .contains(&graph.dataset.name)
        {
            return Err(AppError::DatabaseError(sqlx::Error::Protocol(format!(
                "simulated write failure for {}",
                graph.dataset.name
            ))));
        }

        let new = &graph.dataset;
        let dataset = Dataset {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            identifier: new.identifier.clone(),
            url: new.url.clone(),
            description: new.description.clone(),
            keywords: new.keywords.clone(),
            subjects: new.subjects.clone(),
            authors: new.authors.clone(),
            imported_at: Utc::now(),
        };

        let contacts = graph
            .contacts
            .iter()
            .enumerate()
            .map(|(i, c)| Contact {
                id: Uuid::new_v4(),
                dataset_id: dataset.id,
                position: i as i32,
                name: c.name.clone(),
                affiliation: c.affiliation.clone(),
            })
            .collect();

        let publications = graph
            .publications
            .iter()
            .enumerate()
            .map(|(i, p)| Publication {
                id: Uuid::new_v4(),
                dataset_id: dataset.id,
                position: i as i32,
                citation: p.citation.clone(),
                url: p.url.clone(),
            })
            .collect();

        let date_info = graph.date_info.map(|d| DateInfo {
            id: Uuid::new_v4(),
            dataset_id: dataset.id,
            created_at: d.created_at,
            updated_at: d.updated_at,
            published_at: d.published_at,
        });

        self.details.lock().unwrap().push(DatasetDetail {
            dataset: dataset.clone(),
            contacts,
            publications,
            date_info,
        });

        Ok(dataset)
    }

    async fn find_by_filter(&self, filter: &DatasetFilter) -> Result<Vec<DatasetDetail>, AppError> {
        let mut matched: Vec<DatasetDetail> = self
            .details
            .lock()
            .unwrap()
            .iter()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();

        if let Some(ordering) = filter.ordering {
            ordering.sort(&mut matched);
        }
        Ok(matched)
    }

    async fn get_detail(&self, id: Uuid) -> Result<Option<DatasetDetail>, AppError> {
        Ok(self
            .details
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.dataset.id == id)
            .cloned())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, AppError> {
        Ok(self
            .details
            .lock()
            .unwrap()
            .iter()
            .any(|d| d.dataset.name == name))
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<bool, AppError> {
        let mut details = self.details.lock().unwrap();
        let before = details.len();
        details.retain(|d| d.dataset.id != id);
        Ok(details.len() < before)
    }

    async fn counts(&self) -> Result<ImportCounts, AppError> {
        let details = self.details.lock().unwrap();
        Ok(ImportCounts {
            datasets: details.len() as i64,
            contacts: details.iter().map(|d| d.contacts.len() as i64).sum(),
            publications: details.iter().map(|d| d.publications.len() as i64).sum(),
            date_infos: details.iter().filter(|d| d.date_info.is_some()).count() as i64,
        })
    }

    async fn list_harvest_configs(&self) -> Result<Vec<HarvestConfig>, AppError> {
        Ok(self.harvest_configs.lock().unwrap().clone())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
