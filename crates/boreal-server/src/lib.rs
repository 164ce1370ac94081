//! Boreal Server - REST API for the Boreal dataset catalog
//!
//! - **Datasets**: facet queries, lookup, single-record create and delete
//! - **Harvest**: run an import from the remote catalog
//! - **System**: health and row counts
//!
//! # API Documentation
//!
//! When running the server, interactive API documentation is available
//! at `/swagger-ui`.

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;
