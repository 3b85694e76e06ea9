//! # Manuscript Registry Core
//!
//! Pure primitives for the manuscript registry: identifiers, manuscript
//! records, revenue-share accounting and input validation.
//!
//! This crate contains no I/O, no storage, no locking. It is pure computation
//! over registry records; authorization and persistence live in the
//! `manuscript-registry` and `manuscript-registry-store` crates.
//!
//! ## Key Types
//!
//! - [`Manuscript`] - The registered record for one content-addressed document
//! - [`ManuscriptHash`] - Content-hash key of a manuscript
//! - [`Identity`] - An already-authenticated caller or account
//! - [`Permission`] - A named capability granted to a collaborator
//! - [`RevenueShares`] - Percentage allocations capped at 100
//! - [`ShareAccounting`] - How share updates are checked against the cap

pub mod error;
pub mod manuscript;
pub mod shares;
pub mod types;
pub mod validation;

pub use error::{CoreError, ValidationError};
pub use manuscript::{Manuscript, VersionEntry};
pub use shares::{RevenueShares, ShareAccounting};
pub use types::{Identity, ManuscriptHash, Permission};
pub use validation::{
    validate_hash, validate_tag_batch, MAX_HASH_LEN, MAX_TAGS_PER_CALL, SHARE_CAP,
};
