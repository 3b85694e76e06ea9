//! # Manuscript Registry
//!
//! Ownership, provenance and access rights for content-addressed documents.
//!
//! ## Overview
//!
//! The [`Registry`] is the single authority over a keyed collection of
//! manuscripts. It provides:
//!
//! - **Registration**: a content hash becomes a manuscript owned by its registrant
//! - **Ownership**: transfer and verification
//! - **Provenance**: an append-only version history
//! - **Classification**: categories and bounded tag batches
//! - **Access rights**: per-collaborator permission sets
//! - **Revenue shares**: percentage allocations capped at 100 in total
//!
//! ## Key Concepts
//!
//! - **Owner**: the only identity that may change a manuscript's state.
//! - **Collaborator**: holds named permissions but no mutation rights.
//! - **All-or-nothing**: every check runs before any change is written.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use manuscript_registry::{Registry, RegistryConfig};
//! use manuscript_registry::core::{Identity, ManuscriptHash, Permission};
//! use manuscript_registry::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("registry.db").unwrap();
//!     let registry = Registry::new(store, RegistryConfig::default());
//!
//!     let owner = Identity::from("owner1");
//!     let hash = ManuscriptHash::of_content(b"manuscript body");
//!     registry.register(&owner, &hash, "Title", "{}").await.unwrap();
//!
//!     let editor = Identity::from("editor");
//!     registry
//!         .add_collaborator(&owner, &hash, &editor, vec![Permission::edit()])
//!         .await
//!         .unwrap();
//!     assert!(registry
//!         .has_permission(&hash, &editor, &Permission::edit())
//!         .await
//!         .unwrap());
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `manuscript_registry::core` - Record types and validation
//! - `manuscript_registry::store` - Storage abstraction and SQLite

pub mod error;
pub mod locks;
pub mod registry;
pub mod response;

// Re-export component crates
pub use manuscript_registry_core as core;
pub use manuscript_registry_store as store;

// Re-export main types for convenience
pub use error::{ErrorKind, RegistryError, Result};
pub use registry::{Registry, RegistryConfig};
pub use response::Response;

// Re-export commonly used core types
pub use manuscript_registry_core::{
    Identity, Manuscript, ManuscriptHash, Permission, RevenueShares, ShareAccounting,
    VersionEntry,
};
