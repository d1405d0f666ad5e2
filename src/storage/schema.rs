//! Database schema definitions

/// SQL schema for the harvester database
pub const SCHEMA_SQL: &str = r#"
-- Normalized listing entries, keyed by content fingerprint
CREATE TABLE IF NOT EXISTS listings (
    fingerprint TEXT PRIMARY KEY,
    source TEXT NOT NULL,
    text TEXT NOT NULL,
    permalink TEXT,
    author TEXT,
    posted_at TEXT,
    first_seen_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_listings_source ON listings(source);
CREATE INDEX IF NOT EXISTS idx_listings_first_seen ON listings(first_seen_at);
"#;

/// Initializes the database schema
///
/// Safe to call on every open; all statements are `IF NOT EXISTS`.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
