//! Dataverse client for harvesting dataset records from Borealis and other
//! Dataverse installations.
//!
//! Only the Search API is used: one `GET {base}?q=...&type=dataset&per_page=N`
//! per import run, with no pagination and no retry.

use boreal_core::HttpConfig;
use boreal_core::error::AppError;
use boreal_core::normalize::RawRecord;
use boreal_core::traits::CatalogClient;
use reqwest::{Client, Url};
use serde::Deserialize;

/// Envelope of a Dataverse Search API response.
///
/// Dataverse API reference: <https://guides.dataverse.org/en/latest/api/search.html>
///
/// ```json
/// {
///     "status": "OK",
///     "data": { "total_count": 42, "items": [ ... ] }
/// }
/// ```
#[derive(Deserialize, Debug)]
struct SearchResponse {
    status: Option<String>,
    message: Option<String>,
    data: Option<SearchData>,
}

#[derive(Deserialize, Debug)]
struct SearchData {
    total_count: Option<u64>,
    items: Option<Vec<RawRecord>>,
}

/// HTTP client for a Dataverse Search API endpoint.
///
/// # Examples
///
/// ```no_run
/// use boreal_client::DataverseClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DataverseClient::new("https://borealisdata.ca/api/search")?;
/// let records = client.search_records("fleuve-saint-laurent", 300).await?;
/// println!("Fetched {} records", records.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DataverseClient {
    client: Client,
    search_url: Url,
    timeout_secs: u64,
}

impl DataverseClient {
    /// Creates a new client for the given search endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` if the URL is invalid or malformed.
    /// Returns `AppError::ClientError` if the HTTP client cannot be built.
    pub fn new(search_url: &str) -> Result<Self, AppError> {
        let parsed =
            Url::parse(search_url).map_err(|_| AppError::InvalidUrl(search_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::InvalidUrl(search_url.to_string()));
        }

        let http_config = HttpConfig::default();
        let client = Client::builder()
            .user_agent(concat!("Boreal/", env!("CARGO_PKG_VERSION"), " (catalog-harvester)"))
            .timeout(http_config.timeout)
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            search_url: parsed,
            timeout_secs: http_config.timeout.as_secs(),
        })
    }

    /// Builds the request URL for one search.
    pub fn search_url(&self, query: &str, per_page: usize) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("type", "dataset")
            .append_pair("per_page", &per_page.to_string());
        url
    }

    /// Runs one search and returns the raw `data.items` records.
    ///
    /// # Errors
    ///
    /// * `AppError::ClientError` for a non-success status or an error envelope.
    /// * `AppError::Timeout` / `AppError::NetworkError` for transport failures.
    /// * `AppError::SerializationError` if the body is not JSON.
    /// * `AppError::EmptyResponse` if the body has no `data.items`.
    pub async fn search_records(
        &self,
        query: &str,
        per_page: usize,
    ) -> Result<Vec<RawRecord>, AppError> {
        let url = self.search_url(query, per_page);
        tracing::debug!(%url, "Requesting catalog search");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::ClientError(format!(
                "HTTP {} from {}",
                status.as_u16(),
                url
            )));
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        let records = parse_search_body(&body)?;

        tracing::debug!(count = records.len(), "Catalog search returned records");
        Ok(records)
    }

    fn transport_error(&self, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            AppError::NetworkError(format!("Connection failed: {}", e))
        } else {
            AppError::ClientError(e.to_string())
        }
    }
}

/// Extracts `data.items` from a search response body.
fn parse_search_body(body: &str) -> Result<Vec<RawRecord>, AppError> {
    let response: SearchResponse = serde_json::from_str(body)?;

    match response.status.as_deref() {
        Some(status) if !status.eq_ignore_ascii_case("OK") => {
            return Err(AppError::ClientError(format!(
                "Catalog returned status {}: {}",
                status,
                response.message.unwrap_or_default()
            )));
        }
        _ => {}
    }

    let data = response.data.ok_or(AppError::EmptyResponse)?;
    if let Some(total) = data.total_count {
        tracing::debug!(total, "Catalog reports total matches");
    }
    data.items.ok_or(AppError::EmptyResponse)
}

// =============================================================================
// Trait Implementation: CatalogClient
// =============================================================================

impl CatalogClient for DataverseClient {
    async fn search(&self, query: &str, per_page: usize) -> Result<Vec<RawRecord>, AppError> {
        self.search_records(query, per_page).await
    }

    fn endpoint(&self) -> &str {
        self.search_url.as_str()
    }
}
