//! Configuration module for the harvester
//!
//! Handles loading, parsing, and validating the TOML search configuration.
//! The configuration is loaded once at process startup and treated as an
//! immutable snapshot for the lifetime of the run.
//!
//! # Example
//!
//! ```no_run
//! use gleaner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Polling {} sources", config.groups.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{SearchConfig, SourceId};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
