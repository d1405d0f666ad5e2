//! Listing normalization
//!
//! Turns raw listing records into normalized entries ready for storage.
//! Normalization is deterministic and stateless: whitespace is collapsed,
//! records without usable text are dropped, and each surviving entry gets a
//! content fingerprint that serves as its identity for de-duplication.

use crate::config::SourceId;
use crate::fetch::RawListing;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors raised while normalizing a batch of raw records
///
/// The built-in normalizer drops malformed records instead of failing the
/// batch, so it never returns these; the variant exists for implementations
/// that must reject a batch wholesale.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Malformed listing batch: {0}")]
    MalformedBatch(String),
}

/// A normalized entry, ready for idempotent insertion
#[derive(Debug, Clone, PartialEq)]
pub struct ListingEntry {
    /// Hex-encoded SHA-256 of source id + normalized text; the entry identity
    pub fingerprint: String,

    /// The source the entry came from
    pub source: SourceId,

    /// Listing text with collapsed whitespace
    pub text: String,

    /// Absolute link to the listing, if known
    pub permalink: Option<String>,

    /// Listing author, if known
    pub author: Option<String>,

    /// Publication timestamp, if known
    pub posted_at: Option<DateTime<Utc>>,
}

/// Trait for normalization backends (allows mocking in tests)
pub trait Normalizer: Send + Sync {
    /// Normalizes a batch of raw records
    ///
    /// Output order is significant: entries are stored in exactly this order.
    /// The output may be shorter than the input when malformed records are
    /// dropped.
    fn normalize(&self, records: Vec<RawListing>) -> Result<Vec<ListingEntry>, NormalizeError>;
}

/// The default normalizer
#[derive(Debug, Default)]
pub struct ListingNormalizer;

impl ListingNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Normalizer for ListingNormalizer {
    fn normalize(&self, records: Vec<RawListing>) -> Result<Vec<ListingEntry>, NormalizeError> {
        let entries = records
            .into_iter()
            .filter_map(|record| {
                let text = collapse_whitespace(&record.text);
                if text.is_empty() {
                    tracing::debug!(source = %record.source, "dropping listing without text");
                    return None;
                }

                Some(ListingEntry {
                    fingerprint: entry_fingerprint(&record.source, &text),
                    source: record.source,
                    text,
                    permalink: record.permalink,
                    author: record.author,
                    posted_at: record.posted_at,
                })
            })
            .collect();

        Ok(entries)
    }
}

/// Collapses runs of whitespace to single spaces and trims the ends
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Content fingerprint identifying an entry
///
/// Keyed on source + text, not the permalink, so an identical listing
/// reposted under a new URL still de-duplicates.
pub fn entry_fingerprint(source: &SourceId, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_str().as_bytes());
    hasher.update(b"\n");
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
