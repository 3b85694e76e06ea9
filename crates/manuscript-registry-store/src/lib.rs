//! # Manuscript Registry Store
//!
//! Storage abstraction for the manuscript registry. Provides a trait-based
//! interface for record persistence with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The store module abstracts manuscript storage behind the [`Store`] trait,
//! allowing the registry to be storage-agnostic. The durable implementation
//! is [`SqliteStore`], with [`MemoryStore`] for tests and ephemeral use.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage
//! - [`InsertResult`] - Result of inserting a manuscript
//!
//! ## Usage
//!
//! ```rust,no_run
//! use manuscript_registry_store::{SqliteStore, Store, InsertResult};
//! use manuscript_registry_core::{Identity, Manuscript, ManuscriptHash};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("registry.db").unwrap();
//!
//!     let manuscript = Manuscript::new(
//!         ManuscriptHash::from("hash-001"),
//!         Identity::from("owner"),
//!         "Ancient Text",
//!         "metadata",
//!         0,
//!     );
//!     let result = store.insert_manuscript(&manuscript).await.unwrap();
//!     assert_eq!(result, InsertResult::Inserted);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Insert never overwrites**: inserting an existing hash returns `AlreadyExists`
//! - **Whole-record writes**: `put_manuscript` replaces a record in one transaction
//! - **No cross-call locking**: callers serialize read-modify-write cycles per key

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{InsertResult, Store};
