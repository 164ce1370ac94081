//! Test utilities for integration tests.
//!
//! Provides helper functions to set up isolated PostgreSQL containers
//! with the Boreal schema for each test.

use boreal_core::models::{
    NewContact, NewDataset, NewDatasetGraph, NewDateInfo, NewPublication,
};
use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use testcontainers::core::{ContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

/// Sets up a PostgreSQL container and returns a connection pool with the
/// schema applied.
///
/// Each call creates a fresh, isolated database container. The container is
/// automatically cleaned up when the returned `ContainerAsync` is dropped.
///
/// # Returns
///
/// A tuple of (PgPool, ContainerAsync) - keep the container alive for the test duration.
pub async fn setup_test_db() -> (PgPool, ContainerAsync<GenericImage>) {
    let container = GenericImage::new("postgres", "16")
        .with_exposed_port(ContainerPort::Tcp(5432))
        .with_wait_for(WaitFor::message_on_stderr(
            "database system is ready to accept connections",
        ))
        .with_env_var("POSTGRES_PASSWORD", "postgres")
        .with_env_var("POSTGRES_DB", "postgres")
        .start()
        .await
        .expect("Failed to start PostgreSQL container");

    // Get connection details from the container
    let host = container.get_host().await.expect("Failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get port");

    let connection_string = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

    // Create connection pool with retry logic for container startup
    const MAX_RETRIES: u32 = 30;
    let mut retries = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .connect(&connection_string)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retries += 1;
                if retries >= MAX_RETRIES {
                    panic!(
                        "Failed to connect to database after {} retries: {}",
                        MAX_RETRIES, e
                    );
                }
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            }
        }
    };

    boreal_db::apply_schema(&pool)
        .await
        .expect("Failed to apply schema");

    (pool, container)
}

/// Creates a dataset graph with one contact, one publication and dates
/// published on the given day.
pub fn sample_graph(name: &str, subjects: &str, published: (i32, u32, u32)) -> NewDatasetGraph {
    let (year, month, day) = published;
    let published_at = Utc
        .with_ymd_and_hms(year, month, day, 12, 0, 0)
        .unwrap();

    NewDatasetGraph {
        dataset: NewDataset {
            name: name.to_string(),
            identifier: "borealis".to_string(),
            url: format!("https://borealisdata.ca/dataset/{}", name),
            description: Some(format!("Description for {}", name)),
            keywords: Some("ocean, monitoring".to_string()),
            subjects: Some(subjects.to_string()),
            authors: Some("Fisheries and Oceans Canada".to_string()),
        },
        contacts: vec![
            NewContact {
                name: "Data Desk".to_string(),
                affiliation: Some("DFO".to_string()),
            },
            NewContact {
                name: "Field Lead".to_string(),
                affiliation: None,
            },
        ],
        publications: vec![NewPublication {
            citation: format!("{} et al. (2020)", name),
            url: Some("https://doi.org/10.0/example".to_string()),
        }],
        date_info: Some(NewDateInfo {
            created_at: published_at,
            updated_at: published_at,
            published_at,
        }),
    }
}
