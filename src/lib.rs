//! Gleaner: a periodic listing harvester
//!
//! This crate implements a long-lived background process that polls a fixed
//! set of named listing sources on a wall-clock interval, normalizes the raw
//! records it finds, and stores new entries without inserting duplicates.

pub mod config;
pub mod fetch;
pub mod harvest;
pub mod normalize;
pub mod storage;

use thiserror::Error;

/// Main error type for harvester operations
#[derive(Debug, Error)]
pub enum GleanerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Retrieval error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("Normalization error: {0}")]
    Normalize(#[from] normalize::NormalizeError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for harvester operations
pub type Result<T> = std::result::Result<T, GleanerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{SearchConfig, SourceId};
pub use fetch::{RawListing, SourceFetcher};
pub use harvest::{FetchOrchestrator, Pacing, TickScheduler};
pub use normalize::{ListingEntry, Normalizer};
pub use storage::{ListingStore, SqliteStore};
