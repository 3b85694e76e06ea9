//! Manuscript: the registered record for one content-addressed document.
//!
//! A manuscript is owned by a single identity. Its version history,
//! categories and tags only ever grow; collaborators and revenue shares are
//! keyed maps whose entries are replaced on update.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::shares::{RevenueShares, ShareAccounting};
use crate::types::{Identity, ManuscriptHash, Permission};
use crate::validation::validate_tag_batch;

/// One entry in a manuscript's version history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Content hash of the revision.
    pub hash: ManuscriptHash,

    /// Caller-supplied version number. Advisory; not checked for ordering.
    pub number: u64,

    /// Free-form revision notes.
    pub notes: String,

    /// When the registry recorded this version (Unix ms).
    pub recorded_at: i64,
}

/// A registered manuscript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manuscript {
    /// The registry key.
    pub hash: ManuscriptHash,

    /// Current owner.
    pub owner: Identity,

    pub title: String,

    pub metadata: String,

    /// Revisions, most recent last.
    pub versions: Vec<VersionEntry>,

    pub categories: Vec<String>,

    pub tags: Vec<String>,

    /// Collaborator -> granted permissions (set-like, insertion ordered).
    pub collaborators: BTreeMap<Identity, Vec<Permission>>,

    pub revenue_shares: RevenueShares,

    /// When the manuscript was registered (Unix ms).
    pub created_at: i64,

    /// When the record last changed (Unix ms).
    pub updated_at: i64,
}

impl Manuscript {
    /// Create a freshly registered manuscript with empty collections.
    pub fn new(
        hash: ManuscriptHash,
        owner: Identity,
        title: impl Into<String>,
        metadata: impl Into<String>,
        now: i64,
    ) -> Self {
        Self {
            hash,
            owner,
            title: title.into(),
            metadata: metadata.into(),
            versions: Vec::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            collaborators: BTreeMap::new(),
            revenue_shares: RevenueShares::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether `identity` is the current owner.
    pub fn is_owner(&self, identity: &Identity) -> bool {
        &self.owner == identity
    }

    /// Hand the manuscript to a new owner.
    ///
    /// Collaborators and revenue shares are left as they are.
    pub fn transfer_to(&mut self, new_owner: Identity, now: i64) {
        self.owner = new_owner;
        self.updated_at = now;
    }

    /// Append a revision to the version history.
    pub fn push_version(
        &mut self,
        hash: ManuscriptHash,
        number: u64,
        notes: impl Into<String>,
        now: i64,
    ) {
        self.versions.push(VersionEntry {
            hash,
            number,
            notes: notes.into(),
            recorded_at: now,
        });
        self.updated_at = now;
    }

    /// The bare hashes of the version history, most recent last.
    pub fn version_hashes(&self) -> impl Iterator<Item = &ManuscriptHash> {
        self.versions.iter().map(|v| &v.hash)
    }

    /// The most recent revision, if any.
    pub fn latest_version(&self) -> Option<&VersionEntry> {
        self.versions.last()
    }

    /// Append a category and its tag batch.
    ///
    /// `max_per_call` bounds the batch; `max_total`, when set, bounds the
    /// number of tags stored after the append. On error nothing is appended.
    pub fn add_category(
        &mut self,
        category: impl Into<String>,
        tags: Vec<String>,
        max_per_call: usize,
        max_total: Option<usize>,
        now: i64,
    ) -> Result<(), CoreError> {
        validate_tag_batch(tags.len(), max_per_call)?;

        if let Some(max) = max_total {
            let total = self.tags.len() + tags.len();
            if total > max {
                return Err(CoreError::TagCapExceeded { total, max });
            }
        }

        self.categories.push(category.into());
        self.tags.extend(tags);
        self.updated_at = now;
        Ok(())
    }

    /// Grant `collaborator` exactly `permissions`, replacing any prior grant.
    ///
    /// Repeated labels keep their first position only.
    pub fn set_collaborator(
        &mut self,
        collaborator: Identity,
        permissions: Vec<Permission>,
        now: i64,
    ) {
        let mut deduped: Vec<Permission> = Vec::with_capacity(permissions.len());
        for perm in permissions {
            if !deduped.contains(&perm) {
                deduped.push(perm);
            }
        }
        self.collaborators.insert(collaborator, deduped);
        self.updated_at = now;
    }

    /// Check whether `collaborator` holds `permission`.
    ///
    /// Unknown collaborators simply hold nothing.
    pub fn has_permission(&self, collaborator: &Identity, permission: &Permission) -> bool {
        self.permissions_of(collaborator)
            .map(|perms| perms.contains(permission))
            .unwrap_or(false)
    }

    /// Permissions granted to `collaborator`, if any.
    pub fn permissions_of(&self, collaborator: &Identity) -> Option<&[Permission]> {
        self.collaborators.get(collaborator).map(Vec::as_slice)
    }

    /// Set `account`'s revenue share under the given accounting rule.
    pub fn set_revenue_share(
        &mut self,
        account: Identity,
        percentage: u8,
        accounting: ShareAccounting,
        cap: u32,
        now: i64,
    ) -> Result<(), CoreError> {
        self.revenue_shares.set(account, percentage, accounting, cap)?;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{MAX_TAGS_PER_CALL, SHARE_CAP};

    fn make_manuscript() -> Manuscript {
        Manuscript::new(
            ManuscriptHash::from("hash-001"),
            Identity::from("owner"),
            "Ancient Text",
            "metadata",
            1000,
        )
    }

    fn tags(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("tag-{i}")).collect()
    }

    #[test]
    fn test_new_manuscript_is_empty() {
        let m = make_manuscript();
        assert!(m.is_owner(&Identity::from("owner")));
        assert!(m.versions.is_empty());
        assert!(m.categories.is_empty());
        assert!(m.tags.is_empty());
        assert!(m.collaborators.is_empty());
        assert!(m.revenue_shares.is_empty());
        assert_eq!(m.created_at, m.updated_at);
    }

    #[test]
    fn test_versions_append_in_order() {
        let mut m = make_manuscript();
        m.push_version(ManuscriptHash::from("v2"), 1, "Updated scan", 1001);
        m.push_version(ManuscriptHash::from("v3"), 2, "Restored margin", 1002);

        let hashes: Vec<&str> = m.version_hashes().map(|h| h.as_str()).collect();
        assert_eq!(hashes, vec!["v2", "v3"]);
        assert_eq!(m.latest_version().unwrap().notes, "Restored margin");
        assert_eq!(m.updated_at, 1002);
    }

    #[test]
    fn test_add_category_appends_tags() {
        let mut m = make_manuscript();
        m.add_category("History", tags(3), MAX_TAGS_PER_CALL, None, 1001)
            .unwrap();
        m.add_category("Latin", tags(2), MAX_TAGS_PER_CALL, None, 1002)
            .unwrap();

        assert_eq!(m.categories, vec!["History", "Latin"]);
        assert_eq!(m.tags.len(), 5);
        assert_eq!(m.tags[3], "tag-0");
    }

    #[test]
    fn test_add_category_too_many_tags_is_atomic() {
        let mut m = make_manuscript();
        let err = m
            .add_category("History", tags(11), MAX_TAGS_PER_CALL, None, 1001)
            .unwrap_err();
        assert!(matches!(err, CoreError::TooManyTags { count: 11, max: 10 }));
        assert!(m.categories.is_empty());
        assert!(m.tags.is_empty());
        assert_eq!(m.updated_at, 1000);
    }

    #[test]
    fn test_cumulative_tag_cap() {
        let mut m = make_manuscript();
        m.add_category("a", tags(10), MAX_TAGS_PER_CALL, Some(15), 1001)
            .unwrap();
        let err = m
            .add_category("b", tags(6), MAX_TAGS_PER_CALL, Some(15), 1002)
            .unwrap_err();
        assert!(matches!(err, CoreError::TagCapExceeded { total: 16, max: 15 }));
        assert_eq!(m.categories, vec!["a"]);
    }

    #[test]
    fn test_collaborator_replace_not_merge() {
        let mut m = make_manuscript();
        let c = Identity::from("collab");
        m.set_collaborator(c.clone(), vec![Permission::edit(), Permission::read()], 1001);
        assert!(m.has_permission(&c, &Permission::edit()));

        m.set_collaborator(c.clone(), vec![Permission::read()], 1002);
        assert!(!m.has_permission(&c, &Permission::edit()));
        assert!(m.has_permission(&c, &Permission::read()));
    }

    #[test]
    fn test_collaborator_permissions_deduplicated() {
        let mut m = make_manuscript();
        let c = Identity::from("collab");
        m.set_collaborator(
            c.clone(),
            vec![Permission::edit(), Permission::read(), Permission::edit()],
            1001,
        );
        assert_eq!(
            m.permissions_of(&c).unwrap(),
            &[Permission::edit(), Permission::read()]
        );
    }

    #[test]
    fn test_unknown_collaborator_has_nothing() {
        let m = make_manuscript();
        assert!(!m.has_permission(&Identity::from("stranger"), &Permission::read()));
    }

    #[test]
    fn test_transfer_keeps_collaborators_and_shares() {
        let mut m = make_manuscript();
        let c = Identity::from("collab");
        m.set_collaborator(c.clone(), vec![Permission::edit()], 1001);
        m.set_revenue_share(c.clone(), 30, ShareAccounting::Replace, SHARE_CAP, 1002)
            .unwrap();

        m.transfer_to(Identity::from("new-owner"), 1003);
        assert!(m.is_owner(&Identity::from("new-owner")));
        assert!(m.has_permission(&c, &Permission::edit()));
        assert_eq!(m.revenue_shares.get(&c), Some(30));
    }
}
