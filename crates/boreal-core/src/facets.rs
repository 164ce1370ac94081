//! Facet filter engine.
//!
//! A [`FacetQuery`] is the flat, string-keyed request a caller sends (query
//! string, CLI flags). [`FacetFilter`] turns it into a [`DatasetFilter`]: a
//! conjunction of clauses, each clause a disjunction of case-insensitive
//! substring matches or a published-date bound. Stores translate the filter
//! to their query language; [`DatasetFilter::matches`] evaluates it in memory
//! with the same semantics.
//!
//! # Example
//!
//! ```
//! use boreal_core::facets::{FacetCatalog, FacetFilter, FacetQuery};
//!
//! let query = FacetQuery {
//!     catalogue: Some("fleuve-saint-laurent".to_string()),
//!     organisations: Some("NOAA, DFO".to_string()),
//!     ..Default::default()
//! };
//! let catalog = FacetCatalog::default();
//! let filter = FacetFilter::new(&catalog).build(&query);
//! assert_eq!(filter.clauses.len(), 2);
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Dataset, DatasetDetail};

/// Calendar date layout accepted by `date_debut` / `date_fin`.
pub const FACET_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Query
// =============================================================================

/// Facet parameters as received from a caller.
///
/// Every field is optional; absent and blank values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetQuery {
    /// Comma-separated terms matched against keywords, name and description.
    pub mots_cles: Option<String>,
    /// Alias of `mots_cles`, used only when `mots_cles` is absent.
    pub keywords: Option<String>,
    /// Comma-separated terms matched against authors.
    pub organisations: Option<String>,
    /// Comma-separated terms matched against subjects.
    pub localisations: Option<String>,
    /// Catalogue slug, expanded through the facet catalog.
    pub catalogue: Option<String>,
    /// Theme slug, expanded through the facet catalog.
    pub thematique: Option<String>,
    /// Producer name matched as-is against authors.
    pub producteur: Option<String>,
    /// Earliest publication date, `YYYY-MM-DD`, inclusive.
    pub date_debut: Option<String>,
    /// Latest publication date, `YYYY-MM-DD`, inclusive.
    pub date_fin: Option<String>,
    /// Free-text terms, each matched across all text columns.
    pub search: Option<String>,
    /// One of `name`, `-name`, `identifier`, `-identifier`.
    pub ordering: Option<String>,
}

impl FacetQuery {
    /// Builds a query from a flat string mapping, ignoring unknown keys.
    pub fn from_pairs(pairs: &HashMap<String, String>) -> Self {
        let get = |key: &str| pairs.get(key).cloned();
        Self {
            mots_cles: get("mots_cles"),
            keywords: get("keywords"),
            organisations: get("organisations"),
            localisations: get("localisations"),
            catalogue: get("catalogue"),
            thematique: get("thematique"),
            producteur: get("producteur"),
            date_debut: get("date_debut"),
            date_fin: get("date_fin"),
            search: get("search"),
            ordering: get("ordering"),
        }
    }
}

// =============================================================================
// Facet catalog
// =============================================================================

/// Slug to synonym lookup for the closed-vocabulary facets.
///
/// Immutable once built. Loaded from `facets.toml` by
/// [`crate::config::load_facet_catalog`] or taken from the built-in tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetCatalog {
    #[serde(default = "builtin_catalogue")]
    pub catalogue: BTreeMap<String, Vec<String>>,
    #[serde(default = "builtin_thematique")]
    pub thematique: BTreeMap<String, Vec<String>>,
}

impl Default for FacetCatalog {
    fn default() -> Self {
        Self {
            catalogue: builtin_catalogue(),
            thematique: builtin_thematique(),
        }
    }
}

impl FacetCatalog {
    /// Synonyms for a catalogue slug; an unknown slug stands for itself.
    pub fn catalogue_terms(&self, slug: &str) -> Vec<String> {
        expand(&self.catalogue, slug)
    }

    /// Synonyms for a theme slug; an unknown slug stands for itself.
    pub fn thematique_terms(&self, slug: &str) -> Vec<String> {
        expand(&self.thematique, slug)
    }
}

fn expand(table: &BTreeMap<String, Vec<String>>, slug: &str) -> Vec<String> {
    match table.get(slug) {
        Some(terms) if !terms.is_empty() => terms.clone(),
        _ => vec![slug.to_string()],
    }
}

type SynonymTable = &'static [(&'static str, &'static [&'static str])];

const BUILTIN_CATALOGUE: SynonymTable = &[
    (
        "fleuve-saint-laurent",
        &["saint-laurent", "saint laurent", "st-laurent", "st laurent", "fleuve"],
    ),
    ("ocean-atlantique", &["atlantique", "atlantic"]),
    ("grands-lacs", &["grands lacs", "great lakes", "lacs"]),
    ("arctique", &["arctique", "arctic", "nord"]),
];

const BUILTIN_THEMATIQUE: SynonymTable = &[
    (
        "environnement",
        &["environnement", "environment", "écologie", "ecology"],
    ),
    (
        "biologie",
        &["biologie", "biology", "biodiversité", "biodiversity"],
    ),
    ("climat", &["climat", "climate", "météo", "weather"]),
    (
        "oceanographie",
        &["océanographie", "oceanography", "océan", "ocean"],
    ),
    ("chimie", &["chimie", "chemistry", "chimique", "chemical"]),
];

fn to_map(entries: SynonymTable) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(slug, terms)| {
            (
                slug.to_string(),
                terms.iter().map(|t| t.to_string()).collect(),
            )
        })
        .collect()
}

fn builtin_catalogue() -> BTreeMap<String, Vec<String>> {
    to_map(BUILTIN_CATALOGUE)
}

fn builtin_thematique() -> BTreeMap<String, Vec<String>> {
    to_map(BUILTIN_THEMATIQUE)
}

// =============================================================================
// Filter
// =============================================================================

/// Text column a term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColumn {
    Name,
    Description,
    Keywords,
    Subjects,
    Authors,
}

impl TextColumn {
    /// Column name in the `datasets` table.
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Keywords => "keywords",
            Self::Subjects => "subjects",
            Self::Authors => "authors",
        }
    }

    /// Value of this column on a dataset; a null column reads as empty.
    pub fn value(self, dataset: &Dataset) -> &str {
        match self {
            Self::Name => &dataset.name,
            Self::Description => dataset.description.as_deref().unwrap_or(""),
            Self::Keywords => dataset.keywords.as_deref().unwrap_or(""),
            Self::Subjects => dataset.subjects.as_deref().unwrap_or(""),
            Self::Authors => dataset.authors.as_deref().unwrap_or(""),
        }
    }
}

/// Case-insensitive substring match of one term in one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    pub column: TextColumn,
    pub term: String,
}

impl TextMatch {
    pub fn matches(&self, dataset: &Dataset) -> bool {
        self.column
            .value(dataset)
            .to_lowercase()
            .contains(&self.term.to_lowercase())
    }
}

/// One conjunct of a [`DatasetFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterClause {
    /// At least one of the matches must hold.
    AnyOf(Vec<TextMatch>),
    /// The UTC calendar date of `published_at` is on or after this date.
    PublishedFrom(NaiveDate),
    /// The UTC calendar date of `published_at` is on or before this date.
    PublishedUntil(NaiveDate),
}

impl FilterClause {
    pub fn matches(&self, detail: &DatasetDetail) -> bool {
        match self {
            Self::AnyOf(options) => options.iter().any(|m| m.matches(&detail.dataset)),
            Self::PublishedFrom(date) => {
                published_date(detail.published_at()).is_some_and(|d| d >= *date)
            }
            Self::PublishedUntil(date) => {
                published_date(detail.published_at()).is_some_and(|d| d <= *date)
            }
        }
    }
}

fn published_date(at: Option<DateTime<Utc>>) -> Option<NaiveDate> {
    at.map(|ts| ts.date_naive())
}

/// Requested result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetOrdering {
    NameAsc,
    NameDesc,
    IdentifierAsc,
    IdentifierDesc,
}

impl DatasetOrdering {
    /// Parses `name`, `-name`, `identifier` or `-identifier`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "name" => Some(Self::NameAsc),
            "-name" => Some(Self::NameDesc),
            "identifier" => Some(Self::IdentifierAsc),
            "-identifier" => Some(Self::IdentifierDesc),
            _ => None,
        }
    }

    /// `ORDER BY` body for a query aliasing `datasets` as `d`.
    pub fn sql(self) -> &'static str {
        match self {
            Self::NameAsc => "d.name ASC, d.seq",
            Self::NameDesc => "d.name DESC, d.seq",
            Self::IdentifierAsc => "d.identifier ASC, d.seq",
            Self::IdentifierDesc => "d.identifier DESC, d.seq",
        }
    }

    /// Stable in-memory sort with the same keys.
    pub fn sort(self, details: &mut [DatasetDetail]) {
        match self {
            Self::NameAsc => details.sort_by(|a, b| a.dataset.name.cmp(&b.dataset.name)),
            Self::NameDesc => details.sort_by(|a, b| b.dataset.name.cmp(&a.dataset.name)),
            Self::IdentifierAsc => {
                details.sort_by(|a, b| a.dataset.identifier.cmp(&b.dataset.identifier))
            }
            Self::IdentifierDesc => {
                details.sort_by(|a, b| b.dataset.identifier.cmp(&a.dataset.identifier))
            }
        }
    }
}

/// Conjunction of facet clauses plus an optional ordering.
///
/// An empty filter matches every dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetFilter {
    pub clauses: Vec<FilterClause>,
    pub ordering: Option<DatasetOrdering>,
}

impl DatasetFilter {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// True if every clause holds for this dataset.
    pub fn matches(&self, detail: &DatasetDetail) -> bool {
        self.clauses.iter().all(|clause| clause.matches(detail))
    }
}

/// Builds [`DatasetFilter`]s from facet queries.
pub struct FacetFilter<'a> {
    catalog: &'a FacetCatalog,
}

impl<'a> FacetFilter<'a> {
    pub fn new(catalog: &'a FacetCatalog) -> Self {
        Self { catalog }
    }

    /// Translates a facet query into a filter.
    ///
    /// Facets are independent and combined with AND. Blank facets, facets
    /// whose term list ends up empty, and unparsable dates are skipped.
    pub fn build(&self, query: &FacetQuery) -> DatasetFilter {
        use TextColumn::*;

        let mut clauses = Vec::new();

        let keyword_terms = non_blank(&query.mots_cles).or_else(|| non_blank(&query.keywords));
        if let Some(raw) = keyword_terms {
            push_any_of(
                &mut clauses,
                &split_terms(raw),
                &[Keywords, Name, Description],
            );
        }

        if let Some(raw) = non_blank(&query.organisations) {
            push_any_of(&mut clauses, &split_terms(raw), &[Authors]);
        }

        if let Some(raw) = non_blank(&query.localisations) {
            push_any_of(&mut clauses, &split_terms(raw), &[Subjects]);
        }

        if let Some(slug) = non_blank(&query.catalogue) {
            push_any_of(
                &mut clauses,
                &self.catalog.catalogue_terms(slug.trim()),
                &[Subjects, Keywords, Description],
            );
        }

        if let Some(slug) = non_blank(&query.thematique) {
            push_any_of(
                &mut clauses,
                &self.catalog.thematique_terms(slug.trim()),
                &[Subjects, Keywords, Description],
            );
        }

        if let Some(raw) = non_blank(&query.producteur) {
            push_any_of(&mut clauses, &[raw.to_string()], &[Authors]);
        }

        if let Some(date) = parse_facet_date("date_debut", &query.date_debut) {
            clauses.push(FilterClause::PublishedFrom(date));
        }

        if let Some(date) = parse_facet_date("date_fin", &query.date_fin) {
            clauses.push(FilterClause::PublishedUntil(date));
        }

        if let Some(raw) = non_blank(&query.search) {
            for term in split_search(raw) {
                push_any_of(
                    &mut clauses,
                    &[term],
                    &[Name, Authors, Keywords, Subjects, Description],
                );
            }
        }

        let ordering = non_blank(&query.ordering).and_then(|raw| {
            let parsed = DatasetOrdering::parse(raw);
            if parsed.is_none() {
                tracing::debug!(ordering = raw, "Ignoring unknown ordering");
            }
            parsed
        });

        DatasetFilter { clauses, ordering }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn push_any_of(clauses: &mut Vec<FilterClause>, terms: &[String], columns: &[TextColumn]) {
    let options: Vec<TextMatch> = terms
        .iter()
        .flat_map(|term| {
            columns.iter().map(move |&column| TextMatch {
                column,
                term: term.clone(),
            })
        })
        .collect();

    if !options.is_empty() {
        clauses.push(FilterClause::AnyOf(options));
    }
}

/// Splits a comma-separated facet value, trimming and dropping blank terms.
pub fn split_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits a free-text search on whitespace and commas.
pub fn split_search(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_facet_date(facet: &str, value: &Option<String>) -> Option<NaiveDate> {
    let raw = non_blank(value)?.trim();
    match NaiveDate::parse_from_str(raw, FACET_DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::debug!(facet, value = raw, error = %e, "Ignoring unparsable facet date");
            None
        }
    }
}
