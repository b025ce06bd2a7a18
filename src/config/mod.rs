//! Configuration module for the reddit-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Download option structures passed explicitly to each component
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{load_id_file, Config, OptionsConfig};
pub use modes::DuplicatePolicy;
pub use validation::validate_config;
