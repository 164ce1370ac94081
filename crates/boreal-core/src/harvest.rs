//! Harvest importer.
//!
//! One import run issues a single search request to the remote catalog,
//! normalizes every returned record and persists it together with its
//! contacts, publications and dates.
//!
//! # Failure model
//!
//! Nothing in a run propagates an error to the caller:
//!
//! - A failed fetch ends the run with an empty [`ImportReport`] whose
//!   `fetch_error` is set.
//! - A record that cannot be prepared or written is recorded as a
//!   [`RecordFailure`] and skipped; the remaining records are still imported.
//!   Each record's rows are written in one store call, which stores perform
//!   atomically, so a skipped record leaves nothing behind.
//!
//! Runs are sequential and records are processed in arrival order. The bulk
//! path never checks for existing datasets: importing the same records twice
//! yields two copies of each.

use serde::Serialize;

use crate::config::ImportConfig;
use crate::models::{Dataset, ImportCounts, UNTITLED_NAME};
use crate::normalize::{RawRecord, prepare_record};
use crate::progress::{ImportEvent, ProgressReporter, SilentReporter};
use crate::traits::{CatalogClient, Clock, DatasetStore};

/// A record that was skipped during an import run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFailure {
    /// Position of the record in the fetched list.
    pub index: usize,
    /// Record name, or `"Untitled"` when the record has none.
    pub name: String,
    pub error: String,
}

/// Outcome of one import run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub query: String,
    /// Number of raw records returned by the catalog.
    pub fetched: usize,
    /// Datasets created, in arrival order.
    pub imported: Vec<Dataset>,
    pub failures: Vec<RecordFailure>,
    /// Set when the catalog request itself failed.
    pub fetch_error: Option<String>,
    /// Row counts across the store after the run, when available.
    pub totals: Option<ImportCounts>,
}

impl ImportReport {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    /// True if the fetch succeeded and no record was skipped.
    pub fn is_clean(&self) -> bool {
        self.fetch_error.is_none() && self.failures.is_empty()
    }
}

/// Service for importing catalog records into the store.
///
/// # Type Parameters
///
/// * `S` - Dataset store implementation (e.g., `DatasetRepository`)
/// * `C` - Catalog client implementation (e.g., `DataverseClient`)
/// * `K` - Clock used when a record's timestamps are unusable
///
/// # Example
///
/// ```ignore
/// use boreal_core::{HarvestService, ImportConfig, SystemClock};
///
/// let harvest = HarvestService::new(repo, dataverse, SystemClock);
/// let report = harvest.import_all("fleuve-saint-laurent").await;
/// println!("{} imported, {} skipped", report.imported_count(), report.failed_count());
/// ```
#[derive(Clone)]
pub struct HarvestService<S, C, K>
where
    S: DatasetStore,
    C: CatalogClient,
    K: Clock,
{
    store: S,
    client: C,
    clock: K,
    config: ImportConfig,
}

impl<S, C, K> HarvestService<S, C, K>
where
    S: DatasetStore,
    C: CatalogClient,
    K: Clock,
{
    /// Creates a new harvest service with default configuration.
    pub fn new(store: S, client: C, clock: K) -> Self {
        Self::with_config(store, client, clock, ImportConfig::default())
    }

    /// Creates a harvest service with custom configuration.
    pub fn with_config(store: S, client: C, clock: K, config: ImportConfig) -> Self {
        Self {
            store,
            client,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Imports every record the catalog returns for `query`.
    pub async fn import_all(&self, query: &str) -> ImportReport {
        self.import_all_with_progress(query, &SilentReporter).await
    }

    /// Same as [`import_all`](Self::import_all), but emits progress events
    /// through the provided reporter.
    pub async fn import_all_with_progress<R: ProgressReporter>(
        &self,
        query: &str,
        reporter: &R,
    ) -> ImportReport {
        let mut report = ImportReport {
            query: query.to_string(),
            ..Default::default()
        };

        reporter.report(ImportEvent::FetchStarted {
            endpoint: self.client.endpoint(),
            query,
            per_page: self.config.page_size,
        });

        let records = match self.client.search(query, self.config.page_size).await {
            Ok(records) => records,
            Err(e) => {
                let error = e.to_string();
                reporter.report(ImportEvent::FetchFailed {
                    query,
                    error: &error,
                });
                report.fetch_error = Some(error);
                reporter.report(ImportEvent::Completed {
                    imported: 0,
                    failed: 0,
                    totals: None,
                });
                return report;
            }
        };

        report.fetched = records.len();
        reporter.report(ImportEvent::RecordsFetched {
            count: records.len(),
        });

        for (index, record) in records.iter().enumerate() {
            let name = record_name(record);
            match self.import_one(record).await {
                Ok(dataset) => {
                    reporter.report(ImportEvent::RecordImported {
                        index,
                        name: &dataset.name,
                    });
                    report.imported.push(dataset);
                }
                Err(error) => {
                    reporter.report(ImportEvent::RecordFailed {
                        index,
                        name: &name,
                        error: &error,
                    });
                    report.failures.push(RecordFailure { index, name, error });
                }
            }
        }

        report.totals = match self.store.counts().await {
            Ok(counts) => Some(counts),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read totals after import");
                None
            }
        };

        reporter.report(ImportEvent::Completed {
            imported: report.imported_count(),
            failed: report.failed_count(),
            totals: report.totals.as_ref(),
        });

        report
    }

    async fn import_one(&self, record: &RawRecord) -> Result<Dataset, String> {
        let graph = prepare_record(record, &self.clock).map_err(|e| e.to_string())?;
        self.store
            .create_dataset(&graph)
            .await
            .map_err(|e| e.to_string())
    }
}

fn record_name(record: &RawRecord) -> String {
    record
        .get("name_of_dataverse")
        .and_then(|v| v.as_str())
        .unwrap_or(UNTITLED_NAME)
        .to_string()
}
