//! Command line definitions for the `boreal` binary.

pub mod config;

pub use config::{Command, Config, FacetArgs, OutputFormat, version_info};
