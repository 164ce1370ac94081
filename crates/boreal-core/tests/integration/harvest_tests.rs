//! Integration tests for HarvestService.
//!
//! These tests verify the import pipeline using mock implementations.

use std::sync::Mutex;

use boreal_core::models::UNTITLED_NAME;
use boreal_core::progress::{ImportEvent, ProgressReporter};
use boreal_core::{HarvestService, ImportConfig};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use crate::integration::common::{MockCatalogClient, MockDatasetStore, test_clock};

fn record(name: &str) -> Value {
    json!({
        "identifier_of_dataverse": "ogsl",
        "name_of_dataverse": name,
        "url": format!("https://borealisdata.ca/dataset/{}", name),
        "description": format!("{} description", name),
        "keywords": ["estuary", "monitoring"],
        "subjects": ["Earth and Environmental Sciences"],
        "authors": ["Institut Maurice-Lamontagne"],
        "contacts": [{"name": "Data Desk", "affiliation": "OGSL"}],
        "publications": [{"citation": "Desk (2021)", "url": "https://doi.org/10.0/x"}],
        "createdAt": "2021-02-03T04:05:06.789Z",
        "updatedAt": "2021-02-04T04:05:06Z",
        "published_at": "2021-02-05T04:05:06.1Z"
    })
}

#[derive(Default)]
struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, event: ImportEvent<'_>) {
        let label = match event {
            ImportEvent::FetchStarted { .. } => "fetch_started",
            ImportEvent::FetchFailed { .. } => "fetch_failed",
            ImportEvent::RecordsFetched { .. } => "records_fetched",
            ImportEvent::RecordImported { .. } => "record_imported",
            ImportEvent::RecordFailed { .. } => "record_failed",
            ImportEvent::Completed { .. } => "completed",
        };
        self.events.lock().unwrap().push(label.to_string());
    }
}

/// Test 1: Verify that every record becomes a dataset with its children.
#[tokio::test]
async fn test_import_creates_full_graph() {
    // Arrange
    let store = MockDatasetStore::new();
    let client = MockCatalogClient::new(vec![record("Salinity"), record("Turbidity")]);
    let service = HarvestService::new(store.clone(), client, test_clock());

    // Act
    let report = service.import_all("fleuve-saint-laurent").await;

    // Assert
    assert_eq!(report.fetched, 2);
    assert_eq!(report.imported_count(), 2);
    assert!(report.is_clean());

    let stored = store.all();
    assert_eq!(stored[0].dataset.name, "Salinity");
    assert_eq!(stored[1].dataset.name, "Turbidity");
    assert_eq!(stored[0].dataset.keywords.as_deref(), Some("estuary, monitoring"));
    assert_eq!(stored[0].contacts.len(), 1);
    assert_eq!(stored[0].contacts[0].affiliation.as_deref(), Some("OGSL"));
    assert_eq!(stored[0].publications[0].citation, "Desk (2021)");

    let dates = stored[0].date_info.as_ref().unwrap();
    assert_eq!(
        dates.created_at,
        Utc.with_ymd_and_hms(2021, 2, 3, 4, 5, 6).unwrap()
    );
    assert_eq!(
        dates.published_at,
        Utc.with_ymd_and_hms(2021, 2, 5, 4, 5, 6).unwrap()
    );

    let totals = report.totals.unwrap();
    assert_eq!(totals.datasets, 2);
    assert_eq!(totals.contacts, 2);
    assert_eq!(totals.publications, 2);
    assert_eq!(totals.date_infos, 2);
}

/// Test 2: Verify that one malformed record is skipped and the rest imported.
///
/// A `contacts` entry that is not an object makes the record invalid; the
/// records after it must still be processed.
#[tokio::test]
async fn test_import_skips_malformed_record() {
    // Arrange
    let mut bad = record("Broken");
    bad["contacts"] = json!(["not an object"]);
    let records = vec![record("First"), bad, record("Third"), record("Fourth")];

    let store = MockDatasetStore::new();
    let service = HarvestService::new(store.clone(), MockCatalogClient::new(records), test_clock());

    // Act
    let report = service.import_all("q").await;

    // Assert
    assert_eq!(report.fetched, 4);
    assert_eq!(report.imported_count(), 3);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.failures[0].index, 1);
    assert_eq!(report.failures[0].name, "Broken");
    assert!(report.failures[0].error.contains("contacts[0]"));

    let names: Vec<_> = store.all().into_iter().map(|d| d.dataset.name).collect();
    assert_eq!(names, vec!["First", "Third", "Fourth"]);
}

/// Test 3: Verify that a store failure skips only that record.
#[tokio::test]
async fn test_import_continues_after_write_failure() {
    // Arrange
    let store = MockDatasetStore::new();
    store.fail_on_name("Second");
    let records = vec![record("First"), record("Second"), record("Third")];
    let service = HarvestService::new(store.clone(), MockCatalogClient::new(records), test_clock());

    // Act
    let report = service.import_all("q").await;

    // Assert
    assert_eq!(report.imported_count(), 2);
    assert_eq!(report.failures[0].index, 1);
    assert!(report.failures[0].error.starts_with("Database error"));
    assert_eq!(store.len(), 2);
}

/// Test 4: Verify that a failed fetch yields an empty report, not an error.
#[tokio::test]
async fn test_import_fetch_failure_yields_empty_report() {
    // Arrange
    let store = MockDatasetStore::new();
    let client = MockCatalogClient::failing("HTTP 503 from https://mock-catalog.example.com");
    let service = HarvestService::new(store.clone(), client, test_clock());

    // Act
    let report = service.import_all("q").await;

    // Assert
    assert_eq!(report.fetched, 0);
    assert!(report.imported.is_empty());
    assert!(report.failures.is_empty());
    assert!(report.fetch_error.as_deref().unwrap().contains("HTTP 503"));
    assert!(report.totals.is_none());
    assert!(store.is_empty());
}

/// Test 5: Verify that importing the same data twice duplicates it.
#[tokio::test]
async fn test_import_twice_duplicates_rows() {
    // Arrange
    let store = MockDatasetStore::new();
    let client = MockCatalogClient::new(vec![record("Ice cover")]);
    let service = HarvestService::new(store.clone(), client, test_clock());

    // Act
    service.import_all("q").await;
    let second = service.import_all("q").await;

    // Assert
    assert_eq!(second.imported_count(), 1);
    let stored = store.all();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].dataset.name, stored[1].dataset.name);
    assert_ne!(stored[0].dataset.id, stored[1].dataset.id);
}

/// Test 6: Verify defaults for sparse records.
///
/// Missing name becomes "Untitled", unusable dates become the clock's now.
#[tokio::test]
async fn test_import_sparse_record_uses_defaults() {
    // Arrange
    let sparse = json!({"createdAt": "not-a-date", "keywords": "single keyword"});
    let store = MockDatasetStore::new();
    let service = HarvestService::new(store.clone(), MockCatalogClient::new(vec![sparse]), test_clock());

    // Act
    let report = service.import_all("q").await;

    // Assert
    assert_eq!(report.imported[0].name, UNTITLED_NAME);
    assert_eq!(report.imported[0].identifier, "");
    let all = store.all();
    let stored = &all[0];
    assert_eq!(stored.dataset.keywords.as_deref(), Some("single keyword"));
    let dates = stored.date_info.as_ref().unwrap();
    assert_eq!(dates.created_at, test_clock().0);
    assert_eq!(dates.published_at, test_clock().0);
}

/// Test 7: Verify the client is called once with the configured page size.
#[tokio::test]
async fn test_import_uses_single_request_with_page_size() {
    // Arrange
    let client = MockCatalogClient::new(vec![record("A")]);
    let calls = client.calls.clone();
    let config = ImportConfig::default().with_page_size(25);
    let service =
        HarvestService::with_config(MockDatasetStore::new(), client, test_clock(), config);

    // Act
    service.import_all("arctique").await;

    // Assert
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], ("arctique".to_string(), 25));
}

/// Test 8: Verify progress events are emitted in order.
#[tokio::test]
async fn test_import_reports_progress() {
    // Arrange
    let mut bad = record("Bad");
    bad["publications"] = json!("not a list");
    let client = MockCatalogClient::new(vec![record("Good"), bad]);
    let service = HarvestService::new(MockDatasetStore::new(), client, test_clock());
    let reporter = RecordingReporter::default();

    // Act
    service.import_all_with_progress("q", &reporter).await;

    // Assert
    let events = reporter.events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            "fetch_started",
            "records_fetched",
            "record_imported",
            "record_failed",
            "completed"
        ]
    );
}
