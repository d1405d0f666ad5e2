//! Storage traits and error types

use crate::config::SourceId;
use crate::normalize::ListingEntry;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database connection lock poisoned")]
    Poisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A stored entry, as read back for reporting
#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub fingerprint: String,
    pub source: String,
    pub text: String,
    pub permalink: Option<String>,
    pub first_seen_at: String,
}

/// Trait for listing storage backends
///
/// Implementations must be safe to call from concurrent harvest workers;
/// internal locking is the implementation's own concern.
pub trait ListingStore: Send + Sync {
    /// Records the entry if no entry with the same fingerprint exists
    ///
    /// Idempotent: calling twice with an equal entry stores one record.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The entry was new and has been stored
    /// * `Ok(false)` - An equal entry was already present
    fn insert_if_absent(&self, entry: &ListingEntry) -> StorageResult<bool>;

    /// Total number of stored entries
    fn count_entries(&self) -> StorageResult<u64>;

    /// Number of stored entries for one source
    fn count_entries_for_source(&self, source: &SourceId) -> StorageResult<u64>;

    /// Per-source entry counts, ordered by source id
    fn count_by_source(&self) -> StorageResult<Vec<(String, u64)>>;

    /// Most recently stored entries, newest first
    fn recent_entries(&self, limit: usize) -> StorageResult<Vec<StoredEntry>>;
}
