//! Per-key mutual exclusion.
//!
//! Every manuscript key gets its own async mutex, created on first use and
//! dropped again once nobody holds or waits on it. Mutations on different
//! keys never contend.

use std::sync::Arc;

use dashmap::DashMap;
use manuscript_registry_core::ManuscriptHash;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Table of per-key locks.
#[derive(Default)]
pub struct KeyLocks {
    locks: DashMap<ManuscriptHash, Arc<Mutex<()>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn lock(&self, key: &ManuscriptHash) -> KeyGuard<'_> {
        // The shard guard from `entry` is released before awaiting.
        let lock = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let guard = lock.lock_owned().await;

        KeyGuard {
            locks: &self.locks,
            key: key.clone(),
            guard: Some(guard),
        }
    }

    /// Number of keys with a live lock entry.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}

/// Exclusive access to one key. Released on drop.
pub struct KeyGuard<'a> {
    locks: &'a DashMap<ManuscriptHash, Arc<Mutex<()>>>,
    key: ManuscriptHash,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the table itself still references an idle lock.
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
