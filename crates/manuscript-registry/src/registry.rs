//! The Registry: sole authority over manuscript records.
//!
//! Every mutation follows the same cycle under the manuscript's key lock:
//! load the full record, run all checks, apply the change to the loaded copy,
//! store the copy back. A failed check returns before anything is written,
//! so an operation either applies completely or not at all.

use std::sync::Arc;

use manuscript_registry_core::{
    validate_hash, Identity, Manuscript, ManuscriptHash, Permission, ShareAccounting,
    MAX_TAGS_PER_CALL, SHARE_CAP,
};
use manuscript_registry_store::{InsertResult, Store};

use crate::error::{RegistryError, Result};
use crate::locks::KeyLocks;

/// Configuration for the Registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Maximum tags accepted by a single category addition.
    pub max_tags_per_call: usize,
    /// Optional cap on the total number of tags stored per manuscript.
    pub max_total_tags: Option<usize>,
    /// How share updates for an account that already holds one are checked.
    pub share_accounting: ShareAccounting,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_tags_per_call: MAX_TAGS_PER_CALL,
            max_total_tags: None,
            share_accounting: ShareAccounting::Replace,
        }
    }
}

impl RegistryConfig {
    pub fn with_max_tags_per_call(mut self, max: usize) -> Self {
        self.max_tags_per_call = max;
        self
    }

    pub fn with_max_total_tags(mut self, max: usize) -> Self {
        self.max_total_tags = Some(max);
        self
    }

    pub fn with_share_accounting(mut self, accounting: ShareAccounting) -> Self {
        self.share_accounting = accounting;
        self
    }
}

/// Which error a failed ownership check produces.
#[derive(Debug, Clone, Copy)]
enum Denial {
    NotOwner,
    PermissionDenied,
}

/// The main Registry struct.
///
/// Provides:
/// - Registration and public lookup of manuscripts
/// - Owner-gated mutations (transfer, versions, categories, collaborators, shares)
/// - Permission and ownership predicates for external collaborators
pub struct Registry<S: Store> {
    /// The storage backend.
    store: Arc<S>,
    /// Configuration.
    config: RegistryConfig,
    /// Per-manuscript mutation locks.
    locks: KeyLocks,
}

impl<S: Store> Registry<S> {
    /// Create a new registry over `store`.
    pub fn new(store: S, config: RegistryConfig) -> Self {
        Self::with_shared_store(Arc::new(store), config)
    }

    /// Create a registry over a store that other components also hold.
    ///
    /// Key locks are per registry: mutations through two registries on the
    /// same store are not serialized against each other.
    pub fn with_shared_store(store: Arc<S>, config: RegistryConfig) -> Self {
        Self {
            store,
            config,
            locks: KeyLocks::new(),
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a new manuscript owned by `caller`.
    pub async fn register(
        &self,
        caller: &Identity,
        hash: &ManuscriptHash,
        title: &str,
        metadata: &str,
    ) -> Result<()> {
        let result = self.register_inner(caller, hash, title, metadata).await;
        trace_outcome("register", caller, hash, &result);
        result
    }

    async fn register_inner(
        &self,
        caller: &Identity,
        hash: &ManuscriptHash,
        title: &str,
        metadata: &str,
    ) -> Result<()> {
        validate_hash(hash)?;

        let _guard = self.locks.lock(hash).await;
        if self.store.has_manuscript(hash).await? {
            return Err(RegistryError::AlreadyExists(hash.clone()));
        }

        let manuscript = Manuscript::new(
            hash.clone(),
            caller.clone(),
            title,
            metadata,
            now_millis(),
        );

        match self.store.insert_manuscript(&manuscript).await? {
            InsertResult::Inserted => Ok(()),
            InsertResult::AlreadyExists => Err(RegistryError::AlreadyExists(hash.clone())),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Owner-gated mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Hand a manuscript to `new_owner`.
    ///
    /// Collaborators and revenue shares are carried over unchanged.
    pub async fn transfer_ownership(
        &self,
        caller: &Identity,
        hash: &ManuscriptHash,
        new_owner: &Identity,
    ) -> Result<()> {
        self.mutate("transfer_ownership", caller, hash, Denial::NotOwner, |m, now| {
            m.transfer_to(new_owner.clone(), now);
            Ok(())
        })
        .await
    }

    /// Append a revision to the version history.
    ///
    /// `version_number` and `notes` are kept with the entry but not checked.
    pub async fn add_version(
        &self,
        caller: &Identity,
        hash: &ManuscriptHash,
        new_version_hash: &ManuscriptHash,
        version_number: u64,
        notes: &str,
    ) -> Result<()> {
        self.mutate("add_version", caller, hash, Denial::PermissionDenied, |m, now| {
            m.push_version(new_version_hash.clone(), version_number, notes, now);
            Ok(())
        })
        .await
    }

    /// Append a category and a batch of tags.
    pub async fn add_category(
        &self,
        caller: &Identity,
        hash: &ManuscriptHash,
        category: &str,
        tags: Vec<String>,
    ) -> Result<()> {
        let max_per_call = self.config.max_tags_per_call;
        let max_total = self.config.max_total_tags;

        self.mutate("add_category", caller, hash, Denial::PermissionDenied, |m, now| {
            m.add_category(category, tags, max_per_call, max_total, now)?;
            Ok(())
        })
        .await
    }

    /// Grant `collaborator` exactly `permissions`, replacing any earlier grant.
    pub async fn add_collaborator(
        &self,
        caller: &Identity,
        hash: &ManuscriptHash,
        collaborator: &Identity,
        permissions: Vec<Permission>,
    ) -> Result<()> {
        self.mutate("add_collaborator", caller, hash, Denial::PermissionDenied, |m, now| {
            m.set_collaborator(collaborator.clone(), permissions, now);
            Ok(())
        })
        .await
    }

    /// Set `account`'s revenue share in percent.
    pub async fn set_revenue_share(
        &self,
        caller: &Identity,
        hash: &ManuscriptHash,
        account: &Identity,
        percentage: u8,
    ) -> Result<()> {
        let accounting = self.config.share_accounting;

        self.mutate("set_revenue_share", caller, hash, Denial::PermissionDenied, |m, now| {
            m.set_revenue_share(account.clone(), percentage, accounting, SHARE_CAP, now)?;
            Ok(())
        })
        .await
    }

    async fn mutate<F>(
        &self,
        op: &'static str,
        caller: &Identity,
        hash: &ManuscriptHash,
        denial: Denial,
        apply: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut Manuscript, i64) -> Result<()>,
    {
        let result = self.mutate_inner(caller, hash, denial, apply).await;
        trace_outcome(op, caller, hash, &result);
        result
    }

    async fn mutate_inner<F>(
        &self,
        caller: &Identity,
        hash: &ManuscriptHash,
        denial: Denial,
        apply: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut Manuscript, i64) -> Result<()>,
    {
        let _guard = self.locks.lock(hash).await;
        let mut manuscript = self.load(hash).await?;

        if !manuscript.is_owner(caller) {
            return Err(match denial {
                Denial::NotOwner => RegistryError::NotOwner {
                    hash: hash.clone(),
                    caller: caller.clone(),
                },
                Denial::PermissionDenied => RegistryError::PermissionDenied {
                    hash: hash.clone(),
                    caller: caller.clone(),
                },
            });
        }

        apply(&mut manuscript, now_millis())?;
        self.store.put_manuscript(&manuscript).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the full record of a manuscript. Reads are public.
    pub async fn get_details(&self, hash: &ManuscriptHash) -> Result<Option<Manuscript>> {
        Ok(self.store.get_manuscript(hash).await?)
    }

    /// Check whether `collaborator` holds `permission` on a manuscript.
    ///
    /// A collaborator that was never added simply holds nothing.
    pub async fn has_permission(
        &self,
        hash: &ManuscriptHash,
        collaborator: &Identity,
        permission: &Permission,
    ) -> Result<bool> {
        let manuscript = self.load(hash).await?;
        Ok(manuscript.has_permission(collaborator, permission))
    }

    /// Succeed only if `account` currently owns the manuscript.
    pub async fn verify_ownership(&self, hash: &ManuscriptHash, account: &Identity) -> Result<()> {
        let manuscript = self.load(hash).await?;

        if !manuscript.is_owner(account) {
            return Err(RegistryError::NotOwner {
                hash: hash.clone(),
                caller: account.clone(),
            });
        }
        Ok(())
    }

    /// Current sum of a manuscript's revenue shares.
    pub async fn revenue_share_total(&self, hash: &ManuscriptHash) -> Result<u32> {
        Ok(self.load(hash).await?.revenue_shares.total())
    }

    /// List registered manuscripts, optionally only those owned by `owner`.
    pub async fn list_manuscripts(&self, owner: Option<&Identity>) -> Result<Vec<ManuscriptHash>> {
        Ok(self.store.list_manuscripts(owner).await?)
    }

    /// Number of registered manuscripts.
    pub async fn count(&self) -> Result<usize> {
        Ok(self.store.count().await?)
    }

    async fn load(&self, hash: &ManuscriptHash) -> Result<Manuscript> {
        self.store
            .get_manuscript(hash)
            .await?
            .ok_or_else(|| RegistryError::NotFound(hash.clone()))
    }
}

fn trace_outcome(op: &'static str, caller: &Identity, hash: &ManuscriptHash, result: &Result<()>) {
    match result {
        Ok(()) => tracing::debug!(op, %caller, %hash, "applied"),
        Err(RegistryError::Store(e)) => {
            tracing::warn!(op, %caller, %hash, error = %e, "store failure")
        }
        Err(e) => tracing::debug!(op, %caller, %hash, kind = e.kind().as_str(), "rejected"),
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use manuscript_registry_store::MemoryStore;

    fn registry() -> Registry<MemoryStore> {
        Registry::new(MemoryStore::new(), RegistryConfig::default())
    }

    fn id(s: &str) -> Identity {
        Identity::from(s)
    }

    fn hash(s: &str) -> ManuscriptHash {
        ManuscriptHash::from(s)
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let registry = registry();
        registry
            .register(&id("owner1"), &hash("h1"), "T", "m")
            .await
            .unwrap();

        let details = registry.get_details(&hash("h1")).await.unwrap().unwrap();
        assert_eq!(details.owner, id("owner1"));
        assert_eq!(details.title, "T");
        assert_eq!(details.metadata, "m");
        assert!(details.versions.is_empty());
    }

    #[tokio::test]
    async fn test_get_details_unknown_is_none() {
        let registry = registry();
        assert!(registry.get_details(&hash("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mutation_on_unknown_is_not_found() {
        let registry = registry();
        let err = registry
            .add_version(&id("owner1"), &hash("nope"), &hash("v2"), 1, "")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_owner_check_precedes_tag_check() {
        let registry = registry();
        registry
            .register(&id("owner1"), &hash("h1"), "T", "m")
            .await
            .unwrap();

        let tags: Vec<String> = (0..11).map(|i| i.to_string()).collect();
        let err = registry
            .add_category(&id("intruder"), &hash("h1"), "c", tags)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::PermissionDenied { .. }));
    }

    #[tokio::test]
    async fn test_cumulative_tag_cap_reports_too_many_tags() {
        let registry = Registry::new(
            MemoryStore::new(),
            RegistryConfig::default().with_max_total_tags(12),
        );
        registry
            .register(&id("owner1"), &hash("h1"), "T", "m")
            .await
            .unwrap();

        let ten: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        registry
            .add_category(&id("owner1"), &hash("h1"), "a", ten.clone())
            .await
            .unwrap();

        let err = registry
            .add_category(&id("owner1"), &hash("h1"), "b", ten)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::TooManyTags { count: 20, max: 12 }
        ));
    }

    #[tokio::test]
    async fn test_updated_at_moves_on_mutation() {
        let registry = registry();
        registry
            .register(&id("owner1"), &hash("h1"), "T", "m")
            .await
            .unwrap();
        let before = registry.get_details(&hash("h1")).await.unwrap().unwrap();

        registry
            .add_version(&id("owner1"), &hash("h1"), &hash("v2"), 1, "scan")
            .await
            .unwrap();
        let after = registry.get_details(&hash("h1")).await.unwrap().unwrap();

        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.versions[0].recorded_at, after.updated_at);
    }
}
