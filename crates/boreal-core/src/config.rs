//! Configuration types for Boreal components.
//!
//! Runtime knobs (`HttpConfig`, `DbConfig`, `ImportConfig`) carry hardcoded
//! defaults; binaries override individual values from flags and environment.
//! The facet synonym tables are loaded from `facets.toml`.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;
use crate::facets::FacetCatalog;

/// Default Borealis search endpoint.
pub const DEFAULT_CATALOG_URL: &str = "https://borealisdata.ca/api/search";

/// Query used when an import is started without one.
pub const DEFAULT_QUERY: &str = "fleuve-saint-laurent";

/// Database connection pool configuration.
pub struct DbConfig {
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self { max_connections: 5 }
    }
}

/// HTTP client configuration for external API calls.
pub struct HttpConfig {
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Harvest import configuration.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Search endpoint of the remote catalog.
    pub catalog_url: String,
    /// Query used when the caller does not supply one.
    pub query: String,
    /// Records requested in the single search call.
    pub page_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            query: DEFAULT_QUERY.to_string(),
            page_size: 300,
        }
    }
}

impl ImportConfig {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = url.into();
        self
    }
}

// =============================================================================
// Facet catalog (facets.toml)
// =============================================================================

/// Default facet catalog file name.
pub const FACETS_FILE_NAME: &str = "facets.toml";

/// Returns the default configuration directory path.
///
/// Uses XDG Base Directory specification: `~/.config/boreal/`
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("boreal"))
}

/// Returns the default facet catalog path.
///
/// Path: `~/.config/boreal/facets.toml`
pub fn default_facets_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join(FACETS_FILE_NAME))
}

/// Load the facet catalog from a TOML file.
///
/// The file holds `[catalogue]` and `[thematique]` tables mapping a slug to
/// its synonym list. A table missing from the file keeps its built-in
/// contents.
///
/// ```toml
/// [catalogue]
/// fleuve-saint-laurent = ["saint-laurent", "st laurent", "fleuve"]
///
/// [thematique]
/// climat = ["climat", "climate"]
/// ```
///
/// # Arguments
/// * `path` - Optional custom path. If `None`, uses the default XDG path.
///
/// # Returns
/// * The catalog from the file, or the built-in catalog when no path is given
///   and the default file does not exist.
/// * `Err(AppError::ConfigError)` if an explicit path does not exist, or a
///   file exists but cannot be read or parsed.
pub fn load_facet_catalog(path: Option<PathBuf>) -> Result<FacetCatalog, AppError> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AppError::ConfigError(format!(
                    "Facets file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => match default_facets_path() {
            Some(p) if p.exists() => p,
            _ => {
                tracing::debug!("No facets file found, using built-in facet catalog");
                return Ok(FacetCatalog::default());
            }
        },
    };

    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        AppError::ConfigError(format!(
            "Failed to read facets file '{}': {}",
            config_path.display(),
            e
        ))
    })?;

    let catalog: FacetCatalog = toml::from_str(&content).map_err(|e| {
        AppError::ConfigError(format!(
            "Invalid TOML in '{}': {}",
            config_path.display(),
            e
        ))
    })?;

    tracing::info!(
        path = %config_path.display(),
        catalogue = catalog.catalogue.len(),
        thematique = catalog.thematique.len(),
        "Loaded facet catalog"
    );

    Ok(catalog)
}
