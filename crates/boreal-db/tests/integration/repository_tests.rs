//! Integration tests for DatasetRepository.
//!
//! These tests verify the repository layer against a real PostgreSQL
//! database. Each test runs in an isolated container.

use boreal_core::facets::{FacetCatalog, FacetFilter, FacetQuery};
use boreal_core::models::{NewDataset, NewDatasetGraph};
use boreal_db::DatasetRepository;
use uuid::Uuid;

use crate::integration::common::{sample_graph, setup_test_db};

fn build(query: FacetQuery) -> boreal_core::DatasetFilter {
    FacetFilter::new(&FacetCatalog::default()).build(&query)
}

/// Test 1: Verify a graph is written with all of its children.
#[tokio::test]
async fn test_create_writes_full_graph() {
    let (pool, _container) = setup_test_db().await;
    let repo = DatasetRepository::new(pool);

    let graph = sample_graph("Salinity", "Estuary", (2020, 6, 1));
    let dataset = repo.create(&graph).await.expect("create should succeed");

    assert!(!dataset.id.is_nil());
    assert_eq!(dataset.name, "Salinity");

    let detail = repo
        .get_detail(dataset.id)
        .await
        .expect("get should succeed")
        .expect("dataset should exist");

    assert_eq!(detail.contacts.len(), 2);
    assert_eq!(detail.contacts[0].name, "Data Desk");
    assert_eq!(detail.contacts[0].position, 0);
    assert_eq!(detail.contacts[1].affiliation, None);
    assert_eq!(detail.publications.len(), 1);
    assert_eq!(
        detail.published_at(),
        graph.date_info.map(|d| d.published_at)
    );
}

/// Test 2: Verify a failing child insert rolls back the whole graph.
#[tokio::test]
async fn test_create_is_atomic() {
    let (pool, _container) = setup_test_db().await;
    let repo = DatasetRepository::new(pool);

    let mut graph = sample_graph("Rollback", "Estuary", (2020, 6, 1));
    // contacts.name is VARCHAR(255)
    graph.contacts[1].name = "x".repeat(300);

    let result = repo.create(&graph).await;
    assert!(result.is_err());

    let counts = repo.counts().await.unwrap();
    assert_eq!(counts.datasets, 0);
    assert_eq!(counts.contacts, 0);
}

/// Test 3: Verify catalogue synonyms match case-insensitively.
#[tokio::test]
async fn test_find_by_filter_catalogue() {
    let (pool, _container) = setup_test_db().await;
    let repo = DatasetRepository::new(pool);

    repo.create(&sample_graph("Estuary", "Hydrology, St Laurent", (2020, 1, 1)))
        .await
        .unwrap();
    repo.create(&sample_graph("Pacific", "Pacific", (2020, 1, 1)))
        .await
        .unwrap();

    let filter = build(FacetQuery {
        catalogue: Some("fleuve-saint-laurent".to_string()),
        ..Default::default()
    });
    let results = repo.find_by_filter(&filter).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].dataset.name, "Estuary");
    assert_eq!(results[0].contacts.len(), 2);
}

/// Test 4: Verify the published-date range is inclusive on both ends.
#[tokio::test]
async fn test_find_by_filter_date_range() {
    let (pool, _container) = setup_test_db().await;
    let repo = DatasetRepository::new(pool);

    for (name, date) in [
        ("Before", (2019, 12, 31)),
        ("First", (2020, 1, 1)),
        ("Last", (2020, 12, 31)),
        ("After", (2021, 1, 1)),
    ] {
        repo.create(&sample_graph(name, "", date)).await.unwrap();
    }
    repo.create(&NewDatasetGraph::without_children(NewDataset {
        name: "Undated".to_string(),
        identifier: "UNKNOWN".to_string(),
        url: String::new(),
        description: None,
        keywords: None,
        subjects: None,
        authors: None,
    }))
    .await
    .unwrap();

    let filter = build(FacetQuery {
        date_debut: Some("2020-01-01".to_string()),
        date_fin: Some("2020-12-31".to_string()),
        ..Default::default()
    });
    let names: Vec<_> = repo
        .find_by_filter(&filter)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.dataset.name)
        .collect();
    assert_eq!(names, vec!["First", "Last"]);

    let ignored = build(FacetQuery {
        date_debut: Some("foo".to_string()),
        ..Default::default()
    });
    assert_eq!(repo.find_by_filter(&ignored).await.unwrap().len(), 5);
}

/// Test 5: Verify facets combine with AND and ordering is applied.
#[tokio::test]
async fn test_find_by_filter_conjunction_and_ordering() {
    let (pool, _container) = setup_test_db().await;
    let repo = DatasetRepository::new(pool);

    repo.create(&sample_graph("Beta", "Arctic", (2020, 1, 1)))
        .await
        .unwrap();
    repo.create(&sample_graph("Alpha", "Arctic", (2020, 1, 1)))
        .await
        .unwrap();
    repo.create(&sample_graph("Gamma", "Atlantic", (2020, 1, 1)))
        .await
        .unwrap();

    let filter = build(FacetQuery {
        localisations: Some("arctic".to_string()),
        organisations: Some("fisheries".to_string()),
        ordering: Some("name".to_string()),
        ..Default::default()
    });
    let names: Vec<_> = repo
        .find_by_filter(&filter)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.dataset.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);

    let unordered: Vec<_> = repo
        .find_by_filter(&build(FacetQuery::default()))
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.dataset.name)
        .collect();
    assert_eq!(unordered, vec!["Beta", "Alpha", "Gamma"]);
}

/// Test 6: Verify delete cascades to children.
#[tokio::test]
async fn test_delete_cascade() {
    let (pool, _container) = setup_test_db().await;
    let repo = DatasetRepository::new(pool);

    let keep = repo
        .create(&sample_graph("Keep", "", (2020, 1, 1)))
        .await
        .unwrap();
    let drop = repo
        .create(&sample_graph("Drop", "", (2020, 1, 1)))
        .await
        .unwrap();

    assert!(repo.delete_cascade(drop.id).await.unwrap());
    assert!(!repo.delete_cascade(Uuid::new_v4()).await.unwrap());

    let counts = repo.counts().await.unwrap();
    assert_eq!(counts.datasets, 1);
    assert_eq!(counts.contacts, 2);
    assert_eq!(counts.publications, 1);
    assert_eq!(counts.date_infos, 1);
    assert!(repo.get_detail(keep.id).await.unwrap().is_some());
    assert!(repo.get_detail(drop.id).await.unwrap().is_none());
}

/// Test 7: Verify bulk writes allow duplicate names and exists_by_name sees them.
#[tokio::test]
async fn test_duplicate_names_allowed_in_store() {
    let (pool, _container) = setup_test_db().await;
    let repo = DatasetRepository::new(pool);

    assert!(!repo.exists_by_name("Ice cover").await.unwrap());
    repo.create(&sample_graph("Ice cover", "", (2020, 1, 1)))
        .await
        .unwrap();
    repo.create(&sample_graph("Ice cover", "", (2020, 1, 1)))
        .await
        .unwrap();

    assert!(repo.exists_by_name("Ice cover").await.unwrap());
    assert_eq!(repo.counts().await.unwrap().datasets, 2);
}

/// Test 8: Verify harvest configs are listed and health check passes.
#[tokio::test]
async fn test_harvest_configs_and_health() {
    let (pool, _container) = setup_test_db().await;
    sqlx::query(
        "INSERT INTO harvest_configs (source_url, frequency, filters) VALUES ($1, $2, $3)",
    )
    .bind("https://borealisdata.ca/api/search")
    .bind("quotidienne")
    .bind("arctique")
    .execute(&pool)
    .await
    .unwrap();
    let repo = DatasetRepository::new(pool);

    let configs = repo.list_harvest_configs().await.unwrap();
    assert_eq!(configs.len(), 1);
    assert!(configs[0].active);
    assert_eq!(configs[0].filters.as_deref(), Some("arctique"));

    repo.health_check().await.unwrap();
}

/// Test 9: Verify applying the schema twice is harmless.
#[tokio::test]
async fn test_apply_schema_is_idempotent() {
    let (pool, _container) = setup_test_db().await;
    boreal_db::apply_schema(&pool).await.unwrap();
}

/// Test 10: Verify free-text search reaches the authors and subjects columns.
#[tokio::test]
async fn test_find_by_filter_search_authors_and_subjects() {
    let (pool, _container) = setup_test_db().await;
    let repo = DatasetRepository::new(pool);

    // Authors default to "Fisheries and Oceans Canada"
    repo.create(&sample_graph("Estuary", "Hydrology", (2020, 1, 1)))
        .await
        .unwrap();
    repo.create(&sample_graph("Plain", "Geology", (2020, 1, 1)))
        .await
        .unwrap();
    let mut other_author = sample_graph("Lake", "Hydrology", (2020, 1, 1));
    other_author.dataset.authors = Some("NOAA".to_string());
    repo.create(&other_author).await.unwrap();

    let filter = build(FacetQuery {
        search: Some("fisheries hydrology".to_string()),
        ..Default::default()
    });
    let names: Vec<_> = repo
        .find_by_filter(&filter)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.dataset.name)
        .collect();
    assert_eq!(names, vec!["Estuary"]);
}
