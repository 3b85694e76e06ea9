//! Proptest generators for property-based testing.
//!
//! Keys and identities are drawn from small pools so that random operation
//! sequences hit existing records, collide on registration and cross
//! ownership boundaries often.

use proptest::prelude::*;

use manuscript_registry::{Registry, Result};
use manuscript_registry_core::{Identity, ManuscriptHash, Permission};
use manuscript_registry_store::Store;

use crate::fixtures::accounts;

/// Generate one of a handful of identities.
pub fn identity() -> impl Strategy<Value = Identity> {
    prop_oneof![
        Just(Identity::from(accounts::OWNER)),
        Just(Identity::from(accounts::COLLABORATOR)),
        Just(Identity::from(accounts::NON_OWNER)),
        Just(Identity::from(accounts::DEPLOYER)),
    ]
}

/// Generate a manuscript key, occasionally an empty one.
pub fn manuscript_hash() -> impl Strategy<Value = ManuscriptHash> {
    prop_oneof![
        8 => "m[1-3]".prop_map(ManuscriptHash::new),
        1 => Just(ManuscriptHash::from("")),
    ]
}

/// Generate a version hash.
pub fn version_hash() -> impl Strategy<Value = ManuscriptHash> {
    "[a-f0-9]{8}".prop_map(ManuscriptHash::new)
}

/// Generate a tag batch straddling the per-call limit.
pub fn tag_batch() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}", 0..=12)
}

/// Generate a permission label.
pub fn permission() -> impl Strategy<Value = Permission> {
    prop_oneof![
        Just(Permission::new(Permission::READ)),
        Just(Permission::new(Permission::EDIT)),
        Just(Permission::new(Permission::DELETE)),
        Just(Permission::new(Permission::PUBLISH)),
        "[a-z]{3,10}".prop_map(Permission::new),
    ]
}

/// Generate a share percentage, including values no single account may hold.
pub fn percentage() -> impl Strategy<Value = u8> {
    prop_oneof![
        6 => 0u8..=60,
        1 => 61u8..=100,
        1 => 101u8..=u8::MAX,
    ]
}

/// A single registry request.
#[derive(Debug, Clone)]
pub enum Op {
    Register {
        caller: Identity,
        hash: ManuscriptHash,
        title: String,
    },
    Transfer {
        caller: Identity,
        hash: ManuscriptHash,
        new_owner: Identity,
    },
    AddVersion {
        caller: Identity,
        hash: ManuscriptHash,
        version: ManuscriptHash,
        number: u64,
    },
    AddCategory {
        caller: Identity,
        hash: ManuscriptHash,
        category: String,
        tags: Vec<String>,
    },
    AddCollaborator {
        caller: Identity,
        hash: ManuscriptHash,
        collaborator: Identity,
        permissions: Vec<Permission>,
    },
    SetShare {
        caller: Identity,
        hash: ManuscriptHash,
        account: Identity,
        percentage: u8,
    },
}

impl Op {
    /// The manuscript this request targets.
    pub fn hash(&self) -> &ManuscriptHash {
        match self {
            Op::Register { hash, .. }
            | Op::Transfer { hash, .. }
            | Op::AddVersion { hash, .. }
            | Op::AddCategory { hash, .. }
            | Op::AddCollaborator { hash, .. }
            | Op::SetShare { hash, .. } => hash,
        }
    }

    /// Send this request to `registry`.
    pub async fn apply<S: Store>(&self, registry: &Registry<S>) -> Result<()> {
        match self {
            Op::Register {
                caller,
                hash,
                title,
            } => registry.register(caller, hash, title, "").await,
            Op::Transfer {
                caller,
                hash,
                new_owner,
            } => registry.transfer_ownership(caller, hash, new_owner).await,
            Op::AddVersion {
                caller,
                hash,
                version,
                number,
            } => registry.add_version(caller, hash, version, *number, "").await,
            Op::AddCategory {
                caller,
                hash,
                category,
                tags,
            } => {
                registry
                    .add_category(caller, hash, category, tags.clone())
                    .await
            }
            Op::AddCollaborator {
                caller,
                hash,
                collaborator,
                permissions,
            } => {
                registry
                    .add_collaborator(caller, hash, collaborator, permissions.clone())
                    .await
            }
            Op::SetShare {
                caller,
                hash,
                account,
                percentage,
            } => {
                registry
                    .set_revenue_share(caller, hash, account, *percentage)
                    .await
            }
        }
    }
}

impl Arbitrary for Op {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            2 => (identity(), manuscript_hash(), "[A-Za-z ]{0,16}").prop_map(
                |(caller, hash, title)| Op::Register { caller, hash, title }
            ),
            1 => (identity(), manuscript_hash(), identity()).prop_map(
                |(caller, hash, new_owner)| Op::Transfer { caller, hash, new_owner }
            ),
            2 => (identity(), manuscript_hash(), version_hash(), any::<u64>()).prop_map(
                |(caller, hash, version, number)| Op::AddVersion { caller, hash, version, number }
            ),
            2 => (identity(), manuscript_hash(), "[a-z]{1,12}", tag_batch()).prop_map(
                |(caller, hash, category, tags)| Op::AddCategory { caller, hash, category, tags }
            ),
            2 => (
                identity(),
                manuscript_hash(),
                identity(),
                prop::collection::vec(permission(), 0..4),
            )
                .prop_map(|(caller, hash, collaborator, permissions)| {
                    Op::AddCollaborator { caller, hash, collaborator, permissions }
                }),
            3 => (identity(), manuscript_hash(), identity(), percentage()).prop_map(
                |(caller, hash, account, percentage)| Op::SetShare {
                    caller,
                    hash,
                    account,
                    percentage,
                }
            ),
        ]
        .boxed()
    }
}

/// Generate a sequence of requests.
pub fn ops(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(any::<Op>(), 0..=max_len)
}
