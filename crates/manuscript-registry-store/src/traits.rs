//! Store trait: the abstract interface for manuscript persistence.
//!
//! This trait allows the registry to be storage-agnostic. Implementations
//! include SQLite (durable) and in-memory (for tests and ephemeral use).

use std::sync::Arc;

use async_trait::async_trait;
use manuscript_registry_core::{Identity, Manuscript, ManuscriptHash};

use crate::error::Result;

/// Result of inserting a manuscript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertResult {
    /// Manuscript was inserted.
    Inserted,
    /// A manuscript with the same hash already exists; nothing was written.
    AlreadyExists,
}

/// The Store trait: async interface for manuscript persistence.
///
/// All methods are async to support both blocking (SQLite) and async
/// backends. For SQLite, `spawn_blocking` is used internally to avoid blocking
/// the runtime.
///
/// # Design Notes
///
/// - **Whole-record granularity**: a manuscript is always loaded and stored
///   as one unit. `put_manuscript` replaces every field atomically.
/// - **Snapshot reads**: `get_manuscript` never observes a record halfway
///   through a `put_manuscript`.
/// - **No locking across calls**: serializing load/modify/store cycles on a
///   key is the caller's job.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a new manuscript.
    ///
    /// # Returns
    /// - `Inserted` if the hash was unknown.
    /// - `AlreadyExists` if a record with this hash is present (unchanged).
    async fn insert_manuscript(&self, manuscript: &Manuscript) -> Result<InsertResult>;

    /// Get a manuscript by hash.
    async fn get_manuscript(&self, hash: &ManuscriptHash) -> Result<Option<Manuscript>>;

    /// Replace an existing manuscript record.
    ///
    /// Fails with `StoreError::NotFound` if no record has this hash.
    async fn put_manuscript(&self, manuscript: &Manuscript) -> Result<()>;

    /// Check if a manuscript exists.
    async fn has_manuscript(&self, hash: &ManuscriptHash) -> Result<bool>;

    /// List manuscript hashes, optionally filtered by owner, in ascending order.
    async fn list_manuscripts(&self, owner: Option<&Identity>) -> Result<Vec<ManuscriptHash>>;

    /// Number of stored manuscripts.
    async fn count(&self) -> Result<usize>;
}

/// Shared stores: several registries may sit on one backend.
#[async_trait]
impl<S: Store + ?Sized> Store for Arc<S> {
    async fn insert_manuscript(&self, manuscript: &Manuscript) -> Result<InsertResult> {
        (**self).insert_manuscript(manuscript).await
    }

    async fn get_manuscript(&self, hash: &ManuscriptHash) -> Result<Option<Manuscript>> {
        (**self).get_manuscript(hash).await
    }

    async fn put_manuscript(&self, manuscript: &Manuscript) -> Result<()> {
        (**self).put_manuscript(manuscript).await
    }

    async fn has_manuscript(&self, hash: &ManuscriptHash) -> Result<bool> {
        (**self).has_manuscript(hash).await
    }

    async fn list_manuscripts(&self, owner: Option<&Identity>) -> Result<Vec<ManuscriptHash>> {
        (**self).list_manuscripts(owner).await
    }

    async fn count(&self) -> Result<usize> {
        (**self).count().await
    }
}
