//! Normalization of raw catalog records.
//!
//! Dataverse search results are loosely structured: list fields may be
//! missing, timestamps come with or without fractional seconds, nested
//! contacts may be absent. [`normalize`] turns one record into the internal
//! shape and never fails. [`prepare_record`] additionally reads the nested
//! contacts and publications and rejects records whose structure cannot be
//! persisted.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::{
    NewContact, NewDataset, NewDateInfo, NewDatasetGraph, NewPublication, UNTITLED_NAME,
};
use crate::traits::Clock;

/// One item of the catalog's `data.items` list, unmodified.
pub type RawRecord = Value;

/// Timestamp layout used by the catalog.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Separator used when flattening list fields to text.
pub const LIST_SEPARATOR: &str = ", ";

/// Internal shape of a catalog record, before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDataset {
    pub identifier: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub keywords: String,
    pub subjects: String,
    pub authors: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
}

impl NormalizedDataset {
    /// Scalar fields as an insertable dataset.
    pub fn to_new_dataset(&self) -> NewDataset {
        NewDataset {
            name: self.name.clone(),
            identifier: self.identifier.clone(),
            url: self.url.clone(),
            description: Some(self.description.clone()),
            keywords: Some(self.keywords.clone()),
            subjects: Some(self.subjects.clone()),
            authors: Some(self.authors.clone()),
        }
    }

    pub fn date_info(&self) -> NewDateInfo {
        NewDateInfo {
            created_at: self.created_at,
            updated_at: self.updated_at,
            published_at: self.published_at,
        }
    }
}

/// Converts one raw record into the internal dataset shape.
///
/// Missing text fields become empty strings (the name becomes `"Untitled"`),
/// list fields are joined with `", "`, and timestamps that are missing or
/// unparsable are replaced by `clock.now()`. A record that is not a JSON
/// object normalizes to all defaults.
///
/// # Examples
///
/// ```
/// use boreal_core::normalize::normalize;
/// use boreal_core::traits::SystemClock;
///
/// let record = serde_json::json!({
///     "name_of_dataverse": "Ice cover",
///     "keywords": ["ice", "river"],
///     "published_at": "2021-03-04T05:06:07.890Z"
/// });
/// let normalized = normalize(&record, &SystemClock);
/// assert_eq!(normalized.name, "Ice cover");
/// assert_eq!(normalized.keywords, "ice, river");
/// assert_eq!(normalized.published_at.to_rfc3339(), "2021-03-04T05:06:07+00:00");
/// ```
pub fn normalize<C: Clock>(record: &RawRecord, clock: &C) -> NormalizedDataset {
    let empty = Map::new();
    let fields = record.as_object().unwrap_or(&empty);

    NormalizedDataset {
        identifier: text_field(fields, "identifier_of_dataverse").unwrap_or_default(),
        name: text_field(fields, "name_of_dataverse")
            .unwrap_or_else(|| UNTITLED_NAME.to_string()),
        url: text_field(fields, "url").unwrap_or_default(),
        description: text_field(fields, "description").unwrap_or_default(),
        keywords: list_to_text(fields.get("keywords")),
        subjects: list_to_text(fields.get("subjects")),
        authors: list_to_text(fields.get("authors")),
        created_at: parse_timestamp_or_now(fields.get("createdAt"), clock),
        updated_at: parse_timestamp_or_now(fields.get("updatedAt"), clock),
        published_at: parse_timestamp_or_now(fields.get("published_at"), clock),
    }
}

/// Builds the full write graph for one record.
///
/// # Errors
///
/// Returns `AppError::InvalidRecord` if the record is not an object, or if
/// `contacts` / `publications` are present but not lists of objects.
pub fn prepare_record<C: Clock>(
    record: &RawRecord,
    clock: &C,
) -> Result<NewDatasetGraph, AppError> {
    let fields = record.as_object().ok_or_else(|| {
        AppError::InvalidRecord(format!("expected a JSON object, got {}", kind_of(record)))
    })?;

    let normalized = normalize(record, clock);

    let contacts = nested_objects(fields, "contacts")?
        .into_iter()
        .map(|contact| NewContact {
            name: text_field(contact, "name").unwrap_or_default(),
            affiliation: Some(text_field(contact, "affiliation").unwrap_or_default()),
        })
        .collect();

    let publications = nested_objects(fields, "publications")?
        .into_iter()
        .map(|publication| NewPublication {
            citation: text_field(publication, "citation").unwrap_or_default(),
            url: Some(text_field(publication, "url").unwrap_or_default()),
        })
        .collect();

    Ok(NewDatasetGraph {
        dataset: normalized.to_new_dataset(),
        contacts,
        publications,
        date_info: Some(normalized.date_info()),
    })
}

/// Flattens a list field to comma-space-joined text.
///
/// A bare string counts as a one-element list. Absent, null and empty lists
/// produce an empty string.
pub fn list_to_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(scalar_text)
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR),
        Some(other) => scalar_text(other),
    }
}

/// Parses a catalog timestamp, discarding any fractional seconds.
///
/// Returns `None` for anything that does not match `YYYY-MM-DDTHH:MM:SSZ`
/// once the fraction is stripped.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let candidate = match raw.split_once('.') {
        Some((whole_seconds, _fraction)) => format!("{}Z", whole_seconds),
        None => raw.to_string(),
    };

    NaiveDateTime::parse_from_str(&candidate, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn parse_timestamp_or_now<C: Clock>(value: Option<&Value>, clock: &C) -> DateTime<Utc> {
    value
        .and_then(Value::as_str)
        .filter(|raw| !raw.is_empty())
        .and_then(parse_timestamp)
        .unwrap_or_else(|| clock.now())
}

/// Reads a scalar field as text; null and absent both yield `None`.
fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some(scalar_text(value)),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn nested_objects<'a>(
    fields: &'a Map<String, Value>,
    key: &str,
) -> Result<Vec<&'a Map<String, Value>>, AppError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_object().ok_or_else(|| {
                    AppError::InvalidRecord(format!(
                        "{}[{}] must be an object, got {}",
                        key,
                        i,
                        kind_of(item)
                    ))
                })
            })
            .collect(),
        Some(other) => Err(AppError::InvalidRecord(format!(
            "{} must be a list, got {}",
            key,
            kind_of(other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
