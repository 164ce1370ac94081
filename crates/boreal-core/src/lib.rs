//! Boreal Core - Domain types, business logic, and services.
//!
//! This crate provides the core functionality for Boreal, including:
//!
//! - **Domain models**: [`Dataset`], [`Contact`], [`Publication`], [`DateInfo`], etc.
//! - **Normalization**: [`normalize`](normalize::normalize) turns raw catalog records into the internal shape
//! - **Facet filtering**: [`FacetFilter`] builds a [`DatasetFilter`] from a [`FacetQuery`]
//! - **Services**: [`HarvestService`] for importing catalog records, [`DatasetService`] for queries and single-record management
//! - **Traits**: [`CatalogClient`], [`DatasetStore`], [`Clock`] for dependency injection
//! - **Progress reporting**: [`ProgressReporter`] trait for decoupled logging/UI
//!
//! # Architecture
//!
//! This crate is designed to be reusable by different frontends (CLI, server).
//! Business logic is decoupled from I/O concerns through traits:
//!
//! - [`CatalogClient`] - abstracts the remote catalog (e.g., Borealis Dataverse)
//! - [`DatasetStore`] - abstracts database operations (e.g., PostgreSQL)
//! - [`Clock`] - abstracts the current time
//!
//! # Example
//!
//! ```ignore
//! use boreal_core::{DatasetService, FacetQuery, HarvestService, SystemClock};
//! use boreal_core::progress::TracingReporter;
//!
//! let harvest = HarvestService::new(store.clone(), client, SystemClock);
//! let report = harvest
//!     .import_all_with_progress("fleuve-saint-laurent", &TracingReporter)
//!     .await;
//!
//! let datasets = DatasetService::new(store, catalog);
//! let query = FacetQuery { thematique: Some("climat".into()), ..Default::default() };
//! let results = datasets.filter(&query).await?;
//! ```

pub mod config;
pub mod datasets;
pub mod error;
pub mod facets;
pub mod harvest;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod traits;

// Configuration
pub use config::{
    DEFAULT_CATALOG_URL, DEFAULT_QUERY, DbConfig, HttpConfig, ImportConfig, default_facets_path,
    load_facet_catalog,
};

// Error handling
pub use error::AppError;

// Domain models
pub use models::{
    Contact, CreateDataset, Dataset, DatasetDetail, DateInfo, HarvestConfig, ImportCounts,
    NewContact, NewDataset, NewDatasetGraph, NewDateInfo, NewPublication, Publication,
};

// Normalization
pub use normalize::{NormalizedDataset, RawRecord};

// Facet filtering
pub use facets::{
    DatasetFilter, DatasetOrdering, FacetCatalog, FacetFilter, FacetQuery, FilterClause,
    TextColumn, TextMatch,
};

// Progress reporting
pub use progress::{ImportEvent, ProgressReporter, SilentReporter, TracingReporter};

// Traits for dependency injection
pub use traits::{CatalogClient, Clock, DatasetStore, FixedClock, SystemClock};

// Services (generic over trait implementations)
pub use datasets::DatasetService;
pub use harvest::{HarvestService, ImportReport, RecordFailure};
