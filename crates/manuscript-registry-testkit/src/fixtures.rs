//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use manuscript_registry::{Registry, RegistryConfig, Result};
use manuscript_registry_core::{Identity, ManuscriptHash};
use manuscript_registry_store::MemoryStore;

/// Well-known test accounts.
pub mod accounts {
    pub const DEPLOYER: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";
    pub const OWNER: &str = "ST2J9EVYHPYFPJW8P9J7RZ7Y9T8E2ZZ0Q8E9Q6K8M";
    pub const COLLABORATOR: &str = "ST3AM1A2B3C4D5E6F7G8H9J0KLMNOPQRSTUVWXYYZ";
    pub const NON_OWNER: &str = "ST1J2EVYHPYFPJW8P9J7RZ7Y9T8E2ZZ0Q8E9Q6AAA";
}

/// A test fixture with a memory-backed registry and named accounts.
pub struct TestFixture {
    pub registry: Arc<Registry<MemoryStore>>,
    pub deployer: Identity,
    pub owner: Identity,
    pub collaborator: Identity,
    pub non_owner: Identity,
}

impl TestFixture {
    /// Create a new fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            registry: Arc::new(Registry::new(MemoryStore::new(), config)),
            deployer: Identity::from(accounts::DEPLOYER),
            owner: Identity::from(accounts::OWNER),
            collaborator: Identity::from(accounts::COLLABORATOR),
            non_owner: Identity::from(accounts::NON_OWNER),
        }
    }

    /// Register `content` as a manuscript owned by the fixture's owner.
    ///
    /// The key is the content hash of `content`.
    pub async fn register_owned(&self, content: &[u8], title: &str) -> Result<ManuscriptHash> {
        let hash = ManuscriptHash::of_content(content);
        self.registry
            .register(&self.owner, &hash, title, "{}")
            .await?;
        Ok(hash)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
