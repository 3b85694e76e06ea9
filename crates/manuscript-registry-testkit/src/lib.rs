//! # Manuscript Registry Testkit
//!
//! Testing utilities for the manuscript registry.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: A memory-backed registry with named test accounts
//! - **Generators**: Proptest strategies for keys, identities and whole requests
//!
//! ## Property Testing
//!
//! Random request sequences are replayed against a registry and the
//! invariants checked afterwards:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use manuscript_registry_testkit::generators::ops;
//!
//! proptest! {
//!     #[test]
//!     fn shares_stay_capped(sequence in ops(40)) {
//!         // apply each op, then check revenue_share_total <= 100
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use manuscript_registry_testkit::fixtures::TestFixture;
//!
//! async fn example() {
//!     let fixture = TestFixture::new();
//!     let hash = fixture.register_owned(b"folio 1r", "Folio").await.unwrap();
//!     fixture.registry.verify_ownership(&hash, &fixture.owner).await.unwrap();
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{accounts, TestFixture};
pub use generators::{ops, Op};
