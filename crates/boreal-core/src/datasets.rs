//! Dataset service: facet queries and single-record management.
//!
//! Shared by the REST server and the CLI. Filtering goes through the facet
//! engine; creation here is the single-record path, which unlike the bulk
//! importer refuses a name that already exists.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::AppError;
use crate::facets::{FacetCatalog, FacetFilter, FacetQuery};
use crate::models::{CreateDataset, DatasetDetail, HarvestConfig, ImportCounts, NewDatasetGraph};
use crate::traits::DatasetStore;

/// Service for querying and managing stored datasets.
///
/// # Type Parameters
///
/// * `S` - Dataset store implementation (e.g., `DatasetRepository`)
#[derive(Clone)]
pub struct DatasetService<S: DatasetStore> {
    store: S,
    catalog: FacetCatalog,
}

impl<S: DatasetStore> DatasetService<S> {
    pub fn new(store: S, catalog: FacetCatalog) -> Self {
        Self { store, catalog }
    }

    pub fn catalog(&self) -> &FacetCatalog {
        &self.catalog
    }

    /// Returns the datasets satisfying every supplied facet.
    ///
    /// Each dataset appears at most once, in store order.
    pub async fn filter(&self, query: &FacetQuery) -> Result<Vec<DatasetDetail>, AppError> {
        let filter = FacetFilter::new(&self.catalog).build(query);
        tracing::debug!(clauses = filter.clauses.len(), "Running facet query");

        let rows = self.store.find_by_filter(&filter).await?;

        let mut seen = HashSet::with_capacity(rows.len());
        Ok(rows
            .into_iter()
            .filter(|detail| seen.insert(detail.dataset.id))
            .collect())
    }

    /// Fetches one dataset with its children.
    ///
    /// # Errors
    ///
    /// `AppError::DatasetNotFound` if no dataset has this id.
    pub async fn get(&self, id: Uuid) -> Result<DatasetDetail, AppError> {
        self.store
            .get_detail(id)
            .await?
            .ok_or_else(|| AppError::DatasetNotFound(id.to_string()))
    }

    /// Creates one dataset, refusing duplicate names.
    ///
    /// The identifier defaults to `"UNKNOWN"`. No contacts, publications or
    /// dates are created.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` if the name is blank.
    /// * `AppError::DuplicateDataset` if a dataset with this name exists.
    pub async fn create_unique(&self, input: CreateDataset) -> Result<DatasetDetail, AppError> {
        let new = input.into_new_dataset();
        if new.name.is_empty() {
            return Err(AppError::ValidationError(
                "name must not be empty".to_string(),
            ));
        }

        if self.store.exists_by_name(&new.name).await? {
            return Err(AppError::DuplicateDataset(new.name));
        }

        let dataset = self
            .store
            .create_dataset(&NewDatasetGraph::without_children(new))
            .await?;
        tracing::info!(id = %dataset.id, name = %dataset.name, "Dataset created");

        Ok(DatasetDetail::bare(dataset))
    }

    /// Deletes a dataset and everything attached to it.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if self.store.delete_cascade(id).await? {
            tracing::info!(%id, "Dataset deleted");
            Ok(())
        } else {
            Err(AppError::DatasetNotFound(id.to_string()))
        }
    }

    pub async fn stats(&self) -> Result<ImportCounts, AppError> {
        self.store.counts().await
    }

    pub async fn harvest_configs(&self) -> Result<Vec<HarvestConfig>, AppError> {
        self.store.list_harvest_configs().await
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.store.health_check().await
    }
}
