//! Boreal Client - HTTP clients for external APIs
//!
//! This crate provides HTTP clients for interacting with:
//!
//! - [`dataverse`] - Dataverse Search API (Borealis and other installations)
//!
//! # Overview
//!
//! The clients handle request building, response parsing, and error mapping
//! for their respective APIs, and implement the `CatalogClient` trait from
//! `boreal-core`.

pub mod dataverse;

// Re-export main client types
pub use dataverse::DataverseClient;
