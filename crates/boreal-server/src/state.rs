use boreal_client::DataverseClient;
use boreal_core::{
    AppError, DatasetService, FacetCatalog, HarvestService, ImportConfig, SystemClock,
};
use boreal_db::DatasetRepository;

/// Shared application state for all handlers.
///
/// This is wrapped in Arc internally by Axum when using `with_state()`,
/// so all fields must implement Clone (which they do via internal `Arc<Pool>`).
#[derive(Clone)]
pub struct AppState {
    /// Facet queries and single-record management
    pub dataset_service: DatasetService<DatasetRepository>,

    /// Catalog import, run synchronously by `POST /harvest`
    pub harvest_service: HarvestService<DatasetRepository, DataverseClient, SystemClock>,

    /// Bearer token for admin endpoints; `None` disables them
    pub admin_token: Option<String>,
}

impl AppState {
    /// Creates a new application state with all services initialized.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` if the catalog URL in `import_config` is invalid.
    pub fn new(
        pool: sqlx::PgPool,
        catalog: FacetCatalog,
        import_config: ImportConfig,
        admin_token: Option<String>,
    ) -> Result<Self, AppError> {
        let repo = DatasetRepository::new(pool);
        let client = DataverseClient::new(&import_config.catalog_url)?;

        Ok(Self {
            dataset_service: DatasetService::new(repo.clone(), catalog),
            harvest_service: HarvestService::with_config(repo, client, SystemClock, import_config),
            admin_token: admin_token.filter(|t| !t.is_empty()),
        })
    }
}
