use crate::fetch::FetcherOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Identifier of one listing source (a group or feed name)
///
/// Opaque to the orchestration layer; the fetcher decides how it maps onto
/// listing URLs. Unique within a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Immutable search configuration, loaded once at startup
///
/// The scheduler and orchestrator only ever see this snapshot; configuration
/// is never reloaded mid-run.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Ordered list of sources to poll each tick
    #[serde(default)]
    pub groups: Vec<SourceId>,

    /// Number of listing pages to request per source
    #[serde(default = "default_pages")]
    pub pages: u32,

    /// Polling interval in minutes
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Fetch all sources concurrently instead of one after another
    #[serde(default)]
    pub multithreaded: bool,

    /// Options handed through to the fetcher, unmodified
    #[serde(default, rename = "crawler", alias = "crawler_options")]
    pub crawler: FetcherOptions,

    /// Path to the SQLite database file
    #[serde(default = "default_database_path", rename = "database-path")]
    pub database_path: String,
}

fn default_pages() -> u32 {
    4
}

fn default_interval() -> u64 {
    20
}

fn default_database_path() -> String {
    "./gleaner.db".to_string()
}

impl SearchConfig {
    /// The wall-clock interval between scheduled ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.interval * 60)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            pages: default_pages(),
            interval: default_interval(),
            multithreaded: false,
            crawler: FetcherOptions::default(),
            database_path: default_database_path(),
        }
    }
}
