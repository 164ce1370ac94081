//! Router configuration and route composition.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::require_admin_token;
use crate::config::ServerConfig;
use crate::handlers::{datasets, harvest, harvest_configs, health, stats};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// Rate limiting keys on the peer address, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()` when
/// `rate_limit_rps > 0`.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/stats", get(stats::get_stats))
        .route("/datasets", get(datasets::list_datasets))
        .route("/datasets/:id", get(datasets::get_dataset_by_id))
        .route("/harvest-configs", get(harvest_configs::list_harvest_configs));

    // Admin routes (require Bearer token)
    let admin_routes = Router::new()
        .route("/datasets", post(datasets::create_dataset))
        .route("/datasets/:id", delete(datasets::delete_dataset))
        .route("/harvest", post(harvest::trigger_harvest))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_token,
        ));

    let api_routes = public_routes.merge(admin_routes);

    let cors_layer = build_cors_layer(&config.cors_origins);

    let router = Router::new()
        .nest("/api/v1", api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware layers (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer);

    // Per-IP rate limiting (Arc required for cloning in layers)
    let router = if config.rate_limit_rps > 0 {
        let governor_config = GovernorConfigBuilder::default()
            .per_second(config.rate_limit_rps.into())
            .burst_size(config.rate_limit_burst.max(1))
            .finish();
        match governor_config {
            Some(cfg) => router.layer(GovernorLayer {
                config: Arc::new(cfg),
            }),
            None => {
                tracing::warn!(
                    rps = config.rate_limit_rps,
                    burst = config.rate_limit_burst,
                    "Invalid rate limit configuration, rate limiting disabled"
                );
                router
            }
        }
    } else {
        router
    };

    router.with_state(state)
}

/// Build CORS layer from configuration.
///
/// If `origins` is "*", allows any origin (for development).
/// Otherwise, parses comma-separated origins.
fn build_cors_layer(origins: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600));

    if origins == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let allowed: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(allowed)
    }
}
