//! Concurrent mutations through one shared registry.

use std::sync::Arc;

use manuscript_registry::store::{MemoryStore, SqliteStore, Store};
use manuscript_registry::{ErrorKind, Identity, ManuscriptHash, Registry, RegistryConfig};

const OWNER: &str = "ST2J9EVYHPYFPJW8P9J7RZ7Y9T8E2ZZ0Q8E9Q6K8M";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

async fn concurrent_versions_are_all_kept<S: Store + 'static>(store: S) {
    init_tracing();
    let registry = Arc::new(Registry::new(store, RegistryConfig::default()));
    let owner = Identity::from(OWNER);
    let key = ManuscriptHash::from("shared");
    registry.register(&owner, &key, "T", "m").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..32u64 {
        let registry = Arc::clone(&registry);
        let owner = owner.clone();
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            let version = ManuscriptHash::new(format!("v{i}"));
            registry
                .add_version(&owner, &key, &version, i, "")
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // Lost updates would drop entries from the history.
    let details = registry.get_details(&key).await.unwrap().unwrap();
    assert_eq!(details.versions.len(), 32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_versions_memory() {
    concurrent_versions_are_all_kept(MemoryStore::new()).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_versions_sqlite() {
    concurrent_versions_are_all_kept(SqliteStore::open_memory().unwrap()).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_shares_never_exceed_cap() {
    init_tracing();
    let registry = Arc::new(Registry::new(MemoryStore::new(), RegistryConfig::default()));
    let owner = Identity::from(OWNER);
    let key = ManuscriptHash::from("royalties");
    registry.register(&owner, &key, "T", "m").await.unwrap();

    // Twenty accounts ask for 10% each; only ten can fit.
    let mut handles = Vec::new();
    for i in 0..20 {
        let registry = Arc::clone(&registry);
        let owner = owner.clone();
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            let account = Identity::new(format!("account-{i}"));
            registry.set_revenue_share(&owner, &key, &account, 10).await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => accepted += 1,
            Err(e) => assert_eq!(e.kind(), ErrorKind::ShareLimitExceeded),
        }
    }

    assert_eq!(accepted, 10);
    assert_eq!(registry.revenue_share_total(&key).await.unwrap(), 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_has_one_winner() {
    init_tracing();
    let registry = Arc::new(Registry::new(MemoryStore::new(), RegistryConfig::default()));
    let key = ManuscriptHash::from("contested");

    let mut handles = Vec::new();
    for i in 0..8 {
        let registry = Arc::clone(&registry);
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            let caller = Identity::new(format!("claimant-{i}"));
            registry.register(&caller, &key, "T", "m").await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => winners += 1,
            Err(e) => assert_eq!(e.kind(), ErrorKind::AlreadyExists),
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(registry.count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_independent_keys_progress() {
    init_tracing();
    let registry = Arc::new(Registry::new(MemoryStore::new(), RegistryConfig::default()));
    let owner = Identity::from(OWNER);

    let mut handles = Vec::new();
    for i in 0..16 {
        let registry = Arc::clone(&registry);
        let owner = owner.clone();
        handles.push(tokio::spawn(async move {
            let key = ManuscriptHash::new(format!("m{i}"));
            registry.register(&owner, &key, "T", "m").await.unwrap();
            registry
                .add_category(&owner, &key, "c", vec!["t".to_string()])
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(registry.count().await.unwrap(), 16);
    let owned = registry.list_manuscripts(Some(&owner)).await.unwrap();
    assert_eq!(owned.len(), 16);
}
