//! Boreal DB - Database repository layer for PostgreSQL
//!
//! This crate provides the repository pattern for persisting harvested
//! datasets together with their contacts, publications and dates.
//!
//! # Overview
//!
//! The main components are:
//! - [`DatasetRepository`] - Dataset persistence and facet queries
//! - [`apply_schema`] - Idempotent schema creation

mod repository;
pub mod schema;

pub use repository::DatasetRepository;
pub use schema::{SCHEMA, apply_schema};
