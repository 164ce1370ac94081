//! Trait definitions for external dependencies.
//!
//! This module defines traits that abstract over external dependencies
//! (the remote catalog, the relational store, the wall clock), enabling:
//!
//! - **Testability**: Mock implementations for unit testing
//! - **Flexibility**: Different backend implementations
//! - **Decoupling**: Core business logic doesn't depend on specific implementations
//!
//! # Example
//!
//! ```
//! use boreal_core::facets::DatasetFilter;
//! use boreal_core::traits::DatasetStore;
//!
//! async fn count_matches<S: DatasetStore>(
//!     store: &S,
//!     filter: &DatasetFilter,
//! ) -> Result<usize, boreal_core::AppError> {
//!     Ok(store.find_by_filter(filter).await?.len())
//! }
//! ```

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::facets::DatasetFilter;
use crate::models::{Dataset, DatasetDetail, HarvestConfig, ImportCounts, NewDatasetGraph};
use crate::normalize::RawRecord;
use crate::AppError;

/// Client for a remote research-data catalog search API.
pub trait CatalogClient: Send + Sync + Clone {
    /// Runs one search request and returns the raw records unmodified.
    ///
    /// # Arguments
    ///
    /// * `query` - Free-text search query
    /// * `per_page` - Number of records requested in the single page
    fn search(
        &self,
        query: &str,
        per_page: usize,
    ) -> impl Future<Output = Result<Vec<RawRecord>, AppError>> + Send;

    /// Base URL of the search endpoint, for logging.
    fn endpoint(&self) -> &str;
}

/// Store for dataset persistence and retrieval.
///
/// Implementations must keep contacts, publications and date information tied
/// to their parent dataset: deleting a dataset removes them, and a dataset has
/// at most one date information row.
pub trait DatasetStore: Send + Sync + Clone {
    /// Persists a dataset and all of its children atomically.
    ///
    /// # Returns
    ///
    /// The created dataset row.
    fn create_dataset(
        &self,
        graph: &NewDatasetGraph,
    ) -> impl Future<Output = Result<Dataset, AppError>> + Send;

    /// Returns every dataset satisfying the filter, in the filter's ordering.
    fn find_by_filter(
        &self,
        filter: &DatasetFilter,
    ) -> impl Future<Output = Result<Vec<DatasetDetail>, AppError>> + Send;

    /// Retrieves one dataset with its children.
    fn get_detail(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<DatasetDetail>, AppError>> + Send;

    /// Returns true if a dataset with exactly this name exists.
    fn exists_by_name(&self, name: &str) -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Deletes a dataset and its children.
    ///
    /// # Returns
    ///
    /// `true` if a dataset was deleted, `false` if none had this id.
    fn delete_cascade(&self, id: Uuid) -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Aggregate row counts for reporting.
    fn counts(&self) -> impl Future<Output = Result<ImportCounts, AppError>> + Send;

    /// Lists the configured harvest jobs.
    fn list_harvest_configs(
        &self,
    ) -> impl Future<Output = Result<Vec<HarvestConfig>, AppError>> + Send;

    /// Checks connectivity to the underlying store.
    fn health_check(&self) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Source of the current time.
///
/// Normalization substitutes "now" for unparsable timestamps; injecting the
/// clock makes that substitution observable in tests.
pub trait Clock: Send + Sync + Clone {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
