//! In-memory implementation of the Store trait.
//!
//! Same semantics as SQLite but keeps everything in memory with no
//! persistence.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use manuscript_registry_core::{Identity, Manuscript, ManuscriptHash};

use crate::error::{Result, StoreError};
use crate::traits::{InsertResult, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock; reads
/// clone whole records under the read lock, so they never see a torn write.
pub struct MemoryStore {
    manuscripts: RwLock<HashMap<ManuscriptHash, Manuscript>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            manuscripts: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<ManuscriptHash, Manuscript>>> {
        self.manuscripts
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<ManuscriptHash, Manuscript>>> {
        self.manuscripts
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_manuscript(&self, manuscript: &Manuscript) -> Result<InsertResult> {
        let mut manuscripts = self.write()?;

        if manuscripts.contains_key(&manuscript.hash) {
            return Ok(InsertResult::AlreadyExists);
        }

        manuscripts.insert(manuscript.hash.clone(), manuscript.clone());
        Ok(InsertResult::Inserted)
    }

    async fn get_manuscript(&self, hash: &ManuscriptHash) -> Result<Option<Manuscript>> {
        Ok(self.read()?.get(hash).cloned())
    }

    async fn put_manuscript(&self, manuscript: &Manuscript) -> Result<()> {
        let mut manuscripts = self.write()?;

        match manuscripts.get_mut(&manuscript.hash) {
            Some(slot) => {
                *slot = manuscript.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(manuscript.hash.to_string())),
        }
    }

    async fn has_manuscript(&self, hash: &ManuscriptHash) -> Result<bool> {
        Ok(self.read()?.contains_key(hash))
    }

    async fn list_manuscripts(&self, owner: Option<&Identity>) -> Result<Vec<ManuscriptHash>> {
        let manuscripts = self.read()?;

        let mut hashes: Vec<ManuscriptHash> = manuscripts
            .values()
            .filter(|m| owner.map_or(true, |o| &m.owner == o))
            .map(|m| m.hash.clone())
            .collect();

        hashes.sort();
        Ok(hashes)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}
