//! SQLite implementation of the Store trait.
//!
//! This is the durable storage backend for the manuscript registry. It uses
//! rusqlite with bundled SQLite, wrapped in async via tokio::spawn_blocking.
//!
//! A manuscript is spread over one parent row and five child tables. Every
//! write touches them inside a single transaction, so a failure partway
//! through leaves the previous record intact.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use manuscript_registry_core::{Identity, Manuscript, ManuscriptHash, Permission, VersionEntry};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{InsertResult, Store};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation against the connection on the blocking pool.
    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

// Helper to encode a permission list to CBOR
fn encode_permissions(permissions: &[Permission]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(permissions, &mut buf)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(buf)
}

// Helper to decode a permission list from CBOR
fn decode_permissions(bytes: &[u8]) -> Result<Vec<Permission>> {
    ciborium::from_reader(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn load_manuscript(conn: &Connection, hash: &ManuscriptHash) -> Result<Option<Manuscript>> {
    let key = hash.as_str();

    let row: Option<(String, String, String, i64, i64)> = conn
        .query_row(
            "SELECT owner, title, metadata, created_at, updated_at
             FROM manuscripts WHERE hash = ?1",
            params![key],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            },
        )
        .optional()?;

    let Some((owner, title, metadata, created_at, updated_at)) = row else {
        return Ok(None);
    };

    let mut manuscript = Manuscript::new(
        hash.clone(),
        Identity::from(owner),
        title,
        metadata,
        created_at,
    );
    manuscript.updated_at = updated_at;

    let mut stmt = conn.prepare_cached(
        "SELECT version_hash, number, notes, recorded_at FROM manuscript_versions
         WHERE hash = ?1 ORDER BY position",
    )?;
    manuscript.versions = stmt
        .query_map(params![key], |row| {
            Ok(VersionEntry {
                hash: ManuscriptHash::from(row.get::<_, String>(0)?),
                number: row.get::<_, i64>(1)? as u64,
                notes: row.get(2)?,
                recorded_at: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut stmt = conn.prepare_cached(
        "SELECT category FROM manuscript_categories WHERE hash = ?1 ORDER BY position",
    )?;
    manuscript.categories = stmt
        .query_map(params![key], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    let mut stmt =
        conn.prepare_cached("SELECT tag FROM manuscript_tags WHERE hash = ?1 ORDER BY position")?;
    manuscript.tags = stmt
        .query_map(params![key], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    let mut stmt = conn.prepare_cached(
        "SELECT collaborator, permissions FROM manuscript_collaborators WHERE hash = ?1",
    )?;
    let collaborators = stmt
        .query_map(params![key], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    for (collaborator, permissions) in collaborators {
        manuscript
            .collaborators
            .insert(Identity::from(collaborator), decode_permissions(&permissions)?);
    }

    let mut stmt = conn.prepare_cached(
        "SELECT account, percentage FROM manuscript_revenue_shares WHERE hash = ?1",
    )?;
    let shares = stmt
        .query_map(params![key], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    for (account, percentage) in shares {
        let percentage = u8::try_from(percentage).map_err(|_| {
            StoreError::InvalidData(format!(
                "revenue share {} for {} on {} is out of range",
                percentage, account, hash
            ))
        })?;
        manuscript
            .revenue_shares
            .insert_unchecked(Identity::from(account), percentage);
    }

    Ok(Some(manuscript))
}

fn delete_children(conn: &Connection, hash: &ManuscriptHash) -> Result<()> {
    for table in [
        "manuscript_versions",
        "manuscript_categories",
        "manuscript_tags",
        "manuscript_collaborators",
        "manuscript_revenue_shares",
    ] {
        conn.execute(
            &format!("DELETE FROM {} WHERE hash = ?1", table),
            params![hash.as_str()],
        )?;
    }
    Ok(())
}

fn write_children(conn: &Connection, manuscript: &Manuscript) -> Result<()> {
    let key = manuscript.hash.as_str();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO manuscript_versions (hash, position, version_hash, number, notes, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for (position, version) in manuscript.versions.iter().enumerate() {
        stmt.execute(params![
            key,
            position as i64,
            version.hash.as_str(),
            version.number as i64,
            &version.notes,
            version.recorded_at,
        ])?;
    }

    let mut stmt = conn.prepare_cached(
        "INSERT INTO manuscript_categories (hash, position, category) VALUES (?1, ?2, ?3)",
    )?;
    for (position, category) in manuscript.categories.iter().enumerate() {
        stmt.execute(params![key, position as i64, category])?;
    }

    let mut stmt = conn
        .prepare_cached("INSERT INTO manuscript_tags (hash, position, tag) VALUES (?1, ?2, ?3)")?;
    for (position, tag) in manuscript.tags.iter().enumerate() {
        stmt.execute(params![key, position as i64, tag])?;
    }

    let mut stmt = conn.prepare_cached(
        "INSERT INTO manuscript_collaborators (hash, collaborator, permissions)
         VALUES (?1, ?2, ?3)",
    )?;
    for (collaborator, permissions) in &manuscript.collaborators {
        stmt.execute(params![
            key,
            collaborator.as_str(),
            encode_permissions(permissions)?,
        ])?;
    }

    let mut stmt = conn.prepare_cached(
        "INSERT INTO manuscript_revenue_shares (hash, account, percentage) VALUES (?1, ?2, ?3)",
    )?;
    for (account, percentage) in manuscript.revenue_shares.iter() {
        stmt.execute(params![key, account.as_str(), i64::from(percentage)])?;
    }

    Ok(())
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_manuscript(&self, manuscript: &Manuscript) -> Result<InsertResult> {
        let manuscript = manuscript.clone();

        self.run(move |conn| {
            let tx = conn.transaction()?;

            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM manuscripts WHERE hash = ?1)",
                params![manuscript.hash.as_str()],
                |row| row.get(0),
            )?;

            if exists {
                return Ok(InsertResult::AlreadyExists);
            }

            tx.execute(
                "INSERT INTO manuscripts (hash, owner, title, metadata, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    manuscript.hash.as_str(),
                    manuscript.owner.as_str(),
                    &manuscript.title,
                    &manuscript.metadata,
                    manuscript.created_at,
                    manuscript.updated_at,
                ],
            )?;
            write_children(&tx, &manuscript)?;

            tx.commit()?;
            Ok(InsertResult::Inserted)
        })
        .await
    }

    async fn get_manuscript(&self, hash: &ManuscriptHash) -> Result<Option<Manuscript>> {
        let hash = hash.clone();
        self.run(move |conn| load_manuscript(conn, &hash)).await
    }

    async fn put_manuscript(&self, manuscript: &Manuscript) -> Result<()> {
        let manuscript = manuscript.clone();

        self.run(move |conn| {
            let tx = conn.transaction()?;

            let updated = tx.execute(
                "UPDATE manuscripts
                 SET owner = ?2, title = ?3, metadata = ?4, created_at = ?5, updated_at = ?6
                 WHERE hash = ?1",
                params![
                    manuscript.hash.as_str(),
                    manuscript.owner.as_str(),
                    &manuscript.title,
                    &manuscript.metadata,
                    manuscript.created_at,
                    manuscript.updated_at,
                ],
            )?;

            if updated == 0 {
                return Err(StoreError::NotFound(manuscript.hash.to_string()));
            }

            // Replace child rows: delete all, then insert current
            delete_children(&tx, &manuscript.hash)?;
            write_children(&tx, &manuscript)?;

            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn has_manuscript(&self, hash: &ManuscriptHash) -> Result<bool> {
        let hash = hash.clone();

        self.run(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM manuscripts WHERE hash = ?1)",
                params![hash.as_str()],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
    }

    async fn list_manuscripts(&self, owner: Option<&Identity>) -> Result<Vec<ManuscriptHash>> {
        let owner = owner.cloned();

        self.run(move |conn| {
            let hashes: Vec<ManuscriptHash> = if let Some(owner) = owner {
                let mut stmt =
                    conn.prepare("SELECT hash FROM manuscripts WHERE owner = ?1 ORDER BY hash")?;
                let owned = stmt
                    .query_map(params![owner.as_str()], |row| {
                        row.get::<_, String>(0).map(ManuscriptHash::from)
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                owned
            } else {
                let mut stmt = conn.prepare("SELECT hash FROM manuscripts ORDER BY hash")?;
                let all = stmt
                    .query_map([], |row| row.get::<_, String>(0).map(ManuscriptHash::from))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                all
            };

            Ok(hashes)
        })
        .await
    }

    async fn count(&self) -> Result<usize> {
        self.run(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM manuscripts", [], |row| {
                row.get(0)
            })?;
            Ok(count as usize)
        })
        .await
    }
}
