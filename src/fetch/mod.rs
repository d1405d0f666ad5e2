//! Source fetching
//!
//! This module defines the fetcher seam the orchestrator drives: given a
//! source identifier and a page count, produce the raw listing records found
//! on those pages. The HTTP implementation used in production lives here too.

mod http;
mod parse;

pub use http::{build_http_client, HttpFetcher};
pub use parse::{extract_listings, ExtractedListing};

use crate::config::SourceId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while retrieving listings for one source
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid fetcher options: {0}")]
    Options(String),

    #[error("Invalid listing URL for group '{group}': {message}")]
    InvalidUrl { group: String, message: String },

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Rate limited by {url}")]
    RateLimited { url: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// One raw listing record as found on a source page
///
/// Opaque to the orchestrator; only the normalizer inspects it.
#[derive(Debug, Clone)]
pub struct RawListing {
    /// The source this record was found on
    pub source: SourceId,

    /// Listing text as extracted from the page, untrimmed
    pub text: String,

    /// Link to the individual listing, if the page carried one
    pub permalink: Option<String>,

    /// Listing author, if the page carried one
    pub author: Option<String>,

    /// Publication timestamp, if the page carried one
    pub posted_at: Option<DateTime<Utc>>,
}

/// Options bag handed to the fetcher at construction
///
/// Every field has a default, so an absent `[crawler]` config table means
/// "use the fetcher's own defaults".
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherOptions {
    /// Base URL under which source pages live (`<base-url>/<source>?page=N`)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// CSS selector matching one listing item on a source page
    #[serde(rename = "listing-selector")]
    pub listing_selector: String,

    /// Query parameter carrying the page number
    #[serde(rename = "page-param")]
    pub page_param: String,
}

impl Default for FetcherOptions {
    fn default() -> Self {
        Self {
            base_url: "https://listings.example.com/groups".to_string(),
            timeout_secs: 30,
            user_agent: format!("gleaner/{}", env!("CARGO_PKG_VERSION")),
            listing_selector: "article".to_string(),
            page_param: "page".to_string(),
        }
    }
}

/// Trait for listing retrieval backends (allows mocking in tests)
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Retrieves the raw listings found on the first `pages` pages of `source`
    ///
    /// The returned sequence may be empty; its length is unbounded. A
    /// retrieval failure for any page fails the whole source.
    async fn fetch(&self, source: &SourceId, pages: u32) -> Result<Vec<RawListing>, FetchError>;
}
