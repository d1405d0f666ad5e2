//! Storage module for persisting harvested listings
//!
//! The store's one writing operation is an idempotent insert keyed on the
//! entry fingerprint; everything else is read-only reporting. Implementations
//! must tolerate concurrent callers.

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteStore;
pub use traits::{ListingStore, StorageError, StorageResult, StoredEntry};
