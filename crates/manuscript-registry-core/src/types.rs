//! Strong type definitions for the manuscript registry.
//!
//! All identifiers are newtypes to prevent misuse at compile time: a caller
//! identity can never be passed where a manuscript hash is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content-hash identifier of a manuscript.
///
/// The registry treats the hash as an opaque key. Callers usually compute it
/// themselves; [`ManuscriptHash::of_content`] is provided for callers that
/// want the registry's own content addressing.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManuscriptHash(String);

impl ManuscriptHash {
    /// Wrap a raw hash string. No validation happens here; see
    /// [`crate::validation::validate_hash`].
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Derive a content hash (Blake3, lowercase hex) from document bytes.
    pub fn of_content(content: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"manuscript-content-v1:");
        hasher.update(content);
        Self(hex::encode(hasher.finalize().as_bytes()))
    }

    /// Get the hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the hash is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for ManuscriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ManuscriptHash({})", self.0)
    }
}

impl fmt::Display for ManuscriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ManuscriptHash {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ManuscriptHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ManuscriptHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An already-authenticated caller or account identity.
///
/// Authentication happens outside the registry; this is just the opaque
/// principal string handed in with every request.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A named capability granted to a collaborator.
///
/// The vocabulary is open: collaborators may carry custom labels. The
/// constants below cover the labels the registry's own tooling uses.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(String);

impl Permission {
    pub const READ: &'static str = "read";
    pub const EDIT: &'static str = "edit";
    pub const DELETE: &'static str = "delete";
    pub const PUBLISH: &'static str = "publish";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn read() -> Self {
        Self::new(Self::READ)
    }

    pub fn edit() -> Self {
        Self::new(Self::EDIT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Permission({})", self.0)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Permission {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Permission {
    fn from(s: String) -> Self {
        Self(s)
    }
}
