//! Boreal REST API Server
//!
//! Serves facet queries over the harvested catalog plus token-protected
//! admin endpoints.

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use boreal_core::{DbConfig, ImportConfig, load_facet_catalog};
use boreal_db::apply_schema;

use boreal_server::{AppState, ServerConfig, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ServerConfig::parse();

    info!("Connecting to database...");
    let db_config = DbConfig::default();
    let pool = PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    apply_schema(&pool)
        .await
        .context("Failed to apply database schema")?;
    info!("Database connection established");

    let catalog = load_facet_catalog(config.facets_config.clone())
        .context("Failed to load facet catalog")?;
    info!(
        catalogue = catalog.catalogue.len(),
        thematique = catalog.thematique.len(),
        "Facet catalog loaded"
    );

    let import_config = ImportConfig::default().with_catalog_url(config.catalog_url.clone());

    if config.admin_token.as_deref().is_none_or(str::is_empty) {
        warn!("BOREAL_ADMIN_TOKEN not set, admin endpoints are disabled");
    }

    let app_state = AppState::new(pool, catalog, import_config, config.admin_token.clone())
        .context("Failed to initialize application state")?;

    let app = create_router(app_state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid address")?;

    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Starting Boreal API server on http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
