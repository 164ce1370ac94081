//! Progress reporting for harvest runs.
//!
//! The importer emits [`ImportEvent`]s through a [`ProgressReporter`] so that
//! frontends decide how to surface them: the CLI and server log through
//! [`TracingReporter`], tests usually pass [`SilentReporter`].

use tracing::{debug, info, warn};

use crate::models::ImportCounts;

/// Events emitted during one import run.
#[derive(Debug, Clone)]
pub enum ImportEvent<'a> {
    /// The search request is about to be sent.
    FetchStarted {
        endpoint: &'a str,
        query: &'a str,
        per_page: usize,
    },
    /// The search request failed; the run ends with no imports.
    FetchFailed { query: &'a str, error: &'a str },
    /// The search returned this many raw records.
    RecordsFetched { count: usize },
    /// One record was persisted.
    RecordImported { index: usize, name: &'a str },
    /// One record was skipped.
    RecordFailed {
        index: usize,
        name: &'a str,
        error: &'a str,
    },
    /// The run finished.
    Completed {
        imported: usize,
        failed: usize,
        totals: Option<&'a ImportCounts>,
    },
}

/// Trait for reporting import progress.
pub trait ProgressReporter: Send + Sync {
    /// Called when an import event occurs.
    ///
    /// The default implementation does nothing (silent mode).
    fn report(&self, event: ImportEvent<'_>) {
        let _ = event;
    }
}

/// Silent reporter that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

/// Tracing-based reporter for CLI/server logging.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: ImportEvent<'_>) {
        match event {
            ImportEvent::FetchStarted {
                endpoint,
                query,
                per_page,
            } => {
                info!(endpoint, query, per_page, "Fetching records from catalog");
            }
            ImportEvent::FetchFailed { query, error } => {
                warn!(query, error, "Catalog fetch failed, nothing imported");
            }
            ImportEvent::RecordsFetched { count } => {
                info!(count, "Records fetched");
            }
            ImportEvent::RecordImported { index, name } => {
                debug!(index, name, "Record imported");
            }
            ImportEvent::RecordFailed { index, name, error } => {
                warn!(index, name, error, "Record skipped");
            }
            ImportEvent::Completed {
                imported,
                failed,
                totals,
            } => match totals {
                Some(t) => info!(
                    imported,
                    failed,
                    datasets = t.datasets,
                    contacts = t.contacts,
                    publications = t.publications,
                    date_infos = t.date_infos,
                    "Import completed"
                ),
                None => info!(imported, failed, "Import completed"),
            },
        }
    }
}
