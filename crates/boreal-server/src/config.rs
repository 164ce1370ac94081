use clap::Parser;
use std::path::PathBuf;

use boreal_core::DEFAULT_CATALOG_URL;

/// Server configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug, Clone)]
#[command(name = "boreal-server")]
#[command(author, version, about = "REST API server for the Boreal dataset catalog")]
pub struct ServerConfig {
    /// PostgreSQL database connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Server port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Server host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Bearer token required by admin endpoints; admin endpoints are disabled when unset
    #[arg(long, env = "BOREAL_ADMIN_TOKEN", hide_env_values = true)]
    pub admin_token: Option<String>,

    /// Allowed CORS origins, comma-separated, or "*" for any
    #[arg(long, env = "CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Requests per second allowed per client IP (0 disables rate limiting)
    #[arg(long, env = "RATE_LIMIT_RPS", default_value = "10")]
    pub rate_limit_rps: u32,

    /// Burst size for the rate limiter
    #[arg(long, env = "RATE_LIMIT_BURST", default_value = "30")]
    pub rate_limit_burst: u32,

    /// Path to facets.toml (defaults to ~/.config/boreal/facets.toml, then built-in tables)
    #[arg(long, env = "BOREAL_FACETS_CONFIG")]
    pub facets_config: Option<PathBuf>,

    /// Dataverse search endpoint used by the harvest endpoint
    #[arg(long, env = "BOREAL_CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,
}

impl ServerConfig {
    /// Configuration used by router tests: no rate limiting, permissive CORS.
    pub fn for_tests(admin_token: Option<&str>) -> Self {
        Self {
            database_url: "postgresql://localhost/boreal_test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            admin_token: admin_token.map(str::to_string),
            cors_origins: "*".to_string(),
            rate_limit_rps: 0,
            rate_limit_burst: 1,
            facets_config: None,
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
        }
    }
}
