use thiserror::Error;

/// Application-wide error types.
///
/// This enum represents all possible errors that can occur in Boreal.
/// It uses the `thiserror` crate for ergonomic error handling and automatic conversion
/// from underlying library errors.
///
/// # Error Conversion
///
/// Most errors automatically convert from their source types using the `#[from]` attribute:
/// - `sqlx::Error` → `AppError::DatabaseError`
/// - `serde_json::Error` → `AppError::SerializationError`
///
/// # Examples
///
/// ```no_run
/// use boreal_core::error::AppError;
///
/// fn example() -> Result<(), AppError> {
///     Err(AppError::DatasetNotFound("8c1f".to_string()))
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database operation failed.
    ///
    /// This error wraps all errors from SQLx database operations, including
    /// connection failures, query errors, and constraint violations.
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// HTTP client request failed.
    ///
    /// Covers non-success status codes and malformed responses from the
    /// remote catalog.
    #[error("API Client error: {0}")]
    ClientError(String),

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// API response contained no data.
    ///
    /// The catalog answered with a success status but the body lacks the
    /// `data.items` list.
    #[error("Empty response from API")]
    EmptyResponse,

    /// A raw catalog record could not be turned into a dataset graph.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Dataset not found in the database.
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    /// A dataset with the same name already exists.
    ///
    /// Only raised by the single-record creation path; bulk imports never
    /// check for duplicates.
    #[error("Dataset already exists: {0}")]
    DuplicateDataset(String),

    /// Caller-supplied input failed validation.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Network or connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Configuration file error.
    ///
    /// Raised when reading or parsing a configuration file fails, such as
    /// a malformed facets.toml.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::DatabaseError(e) => {
                if e.to_string().contains("connection") {
                    "Cannot connect to database. Is PostgreSQL running?\n   Try: docker-compose up -d".to_string()
                } else {
                    format!("Database error: {}", e)
                }
            }
            AppError::ClientError(msg) => format!("Catalog API error: {}", msg),
            AppError::NetworkError(msg) => {
                format!("Network error: {}\n   Check your internet connection.", msg)
            }
            AppError::Timeout(secs) => {
                format!(
                    "Request timed out after {} seconds.\n   The catalog may be slow or unreachable.",
                    secs
                )
            }
            AppError::EmptyResponse => {
                "The catalog returned no data. It may be temporarily unavailable.".to_string()
            }
            AppError::DuplicateDataset(name) => {
                format!("A dataset named '{}' already exists.", name)
            }
            AppError::ConfigError(msg) => {
                format!(
                    "Configuration error: {}\n   Check your configuration file.",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }

    /// Returns true if the error came from talking to the remote catalog.
    ///
    /// # Examples
    ///
    /// ```
    /// use boreal_core::error::AppError;
    ///
    /// assert!(AppError::Timeout(30).is_fetch_failure());
    /// assert!(!AppError::DatasetNotFound("x".to_string()).is_fetch_failure());
    /// ```
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            AppError::ClientError(_)
                | AppError::NetworkError(_)
                | AppError::Timeout(_)
                | AppError::EmptyResponse
                | AppError::InvalidUrl(_)
        )
    }
}
