//! Configuration management for mavic
//!
//! Settings are layered, lowest to highest priority:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//! 4. Command-line flags (applied by the binary)
//!
//! # Environment Variables
//!
//! Any key can be overridden with `MAVIC__<section>__<key>`, for example
//! `MAVIC__SCRAPE__MAX_CONCURRENT_DOWNLOADS=8` or
//! `MAVIC__HTTP__BASE_URL=http://127.0.0.1:8080`.
//!
//! # Configuration File
//!
//! Loaded from `config/mavic.toml` unless `MAVIC_CONFIG` points elsewhere.
//! A missing file is not an error.

mod models;
mod options;
mod sources;
mod validation;

pub use models::{
    Config, DEFAULT_LIMIT, HttpConfig, MAX_LIMIT, ScrapeConfig, normalize_limit,
};
pub use options::ScrapeOptions;
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from the default file location and environment
    ///
    /// Validation is deferred to [`Config::resolve`] so command-line
    /// overrides can be applied first.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(sources::load()?)
    }

    /// Load configuration from a specific path and environment
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        Ok(sources::load_from_sources(path)?)
    }

    /// Validate and normalize into the options a run executes with
    pub fn resolve(&self) -> Result<ScrapeOptions, ConfigError> {
        Ok(ScrapeOptions::from_config(self)?)
    }
}
