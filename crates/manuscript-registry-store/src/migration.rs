//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL string
//! that transforms the schema from version N to N+1.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            current, CURRENT_VERSION
        )));
    }

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
        }

        tx.commit()?;
        tracing::debug!(from = current, to = CURRENT_VERSION, "schema migrated");
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- One row per registered manuscript
        CREATE TABLE manuscripts (
            hash TEXT PRIMARY KEY,            -- content-hash key
            owner TEXT NOT NULL,              -- current owner identity
            title TEXT NOT NULL,
            metadata TEXT NOT NULL,
            created_at INTEGER NOT NULL,      -- Unix ms
            updated_at INTEGER NOT NULL       -- Unix ms
        );

        -- Version history, ordered by position
        CREATE TABLE manuscript_versions (
            hash TEXT NOT NULL,
            position INTEGER NOT NULL,
            version_hash TEXT NOT NULL,
            number INTEGER NOT NULL,
            notes TEXT NOT NULL,
            recorded_at INTEGER NOT NULL,
            PRIMARY KEY (hash, position)
        );

        CREATE TABLE manuscript_categories (
            hash TEXT NOT NULL,
            position INTEGER NOT NULL,
            category TEXT NOT NULL,
            PRIMARY KEY (hash, position)
        );

        CREATE TABLE manuscript_tags (
            hash TEXT NOT NULL,
            position INTEGER NOT NULL,
            tag TEXT NOT NULL,
            PRIMARY KEY (hash, position)
        );

        CREATE TABLE manuscript_collaborators (
            hash TEXT NOT NULL,
            collaborator TEXT NOT NULL,
            permissions BLOB NOT NULL,        -- CBOR array of permission labels
            PRIMARY KEY (hash, collaborator)
        );

        CREATE TABLE manuscript_revenue_shares (
            hash TEXT NOT NULL,
            account TEXT NOT NULL,
            percentage INTEGER NOT NULL CHECK (percentage BETWEEN 0 AND 100),
            PRIMARY KEY (hash, account)
        );

        CREATE INDEX idx_manuscripts_owner ON manuscripts(owner);
        "#,
    )?;

    Ok(())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
