//! SQLite storage implementation

use crate::config::SourceId;
use crate::normalize::ListingEntry;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ListingStore, StorageError, StorageResult, StoredEntry};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite listing store
///
/// The connection sits behind a mutex so `&self` methods stay safe when
/// concurrent harvest workers insert at the same time.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at the given path
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl ListingStore for SqliteStore {
    fn insert_if_absent(&self, entry: &ListingEntry) -> StorageResult<bool> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();

        let changed = conn.execute(
            "INSERT OR IGNORE INTO listings
             (fingerprint, source, text, permalink, author, posted_at, first_seen_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.fingerprint,
                entry.source.as_str(),
                entry.text,
                entry.permalink,
                entry.author,
                entry.posted_at.map(|t| t.to_rfc3339()),
                now,
            ],
        )?;

        Ok(changed > 0)
    }

    fn count_entries(&self) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM listings", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_entries_for_source(&self, source: &SourceId) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM listings WHERE source = ?1",
            params![source.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_by_source(&self) -> StorageResult<Vec<(String, u64)>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT source, COUNT(*) FROM listings GROUP BY source ORDER BY source",
        )?;

        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get::<_, i64>(1)? as u64)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(counts)
    }

    fn recent_entries(&self, limit: usize) -> StorageResult<Vec<StoredEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT fingerprint, source, text, permalink, first_seen_at
             FROM listings ORDER BY first_seen_at DESC LIMIT ?1",
        )?;

        let entries = stmt
            .query_map(params![limit as i64], |row| {
                Ok(StoredEntry {
                    fingerprint: row.get(0)?,
                    source: row.get(1)?,
                    text: row.get(2)?,
                    permalink: row.get(3)?,
                    first_seen_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}
