//! HTTP request handlers for API endpoints.

pub mod datasets;
pub mod harvest;
pub mod harvest_configs;
pub mod health;
pub mod stats;
