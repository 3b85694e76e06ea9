//! Error types for the Registry.

use manuscript_registry_core::{CoreError, Identity, ManuscriptHash, ValidationError};
use manuscript_registry_store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during Registry operations.
///
/// Each operation fails with exactly one of these. Nothing is retried
/// internally: every domain error is caused by the request itself.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Manuscript key rejected at registration.
    #[error("invalid manuscript key: {0}")]
    InvalidKey(#[from] ValidationError),

    /// A manuscript with this key is already registered.
    #[error("manuscript already exists: {0}")]
    AlreadyExists(ManuscriptHash),

    /// No manuscript is registered under this key.
    #[error("manuscript not found: {0}")]
    NotFound(ManuscriptHash),

    /// Caller is not the owner (ownership transfer and verification).
    #[error("{caller} is not the owner of {hash}")]
    NotOwner {
        hash: ManuscriptHash,
        caller: Identity,
    },

    /// Caller is not the owner (all other mutations).
    #[error("{caller} may not modify {hash}")]
    PermissionDenied {
        hash: ManuscriptHash,
        caller: Identity,
    },

    /// Tag batch (or, when capped, the stored total) is too large.
    #[error("too many tags: {count} exceeds the limit of {max}")]
    TooManyTags { count: usize, max: usize },

    /// Revenue shares would sum above the cap.
    #[error("revenue shares would total {total}%, above the cap of {cap}%")]
    ShareLimitExceeded { total: u32, cap: u32 },

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<CoreError> for RegistryError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::TooManyTags { count, max } => RegistryError::TooManyTags { count, max },
            CoreError::TagCapExceeded { total, max } => {
                RegistryError::TooManyTags { count: total, max }
            }
            CoreError::ShareLimitExceeded { total, cap } => {
                RegistryError::ShareLimitExceeded { total, cap }
            }
        }
    }
}

impl RegistryError {
    /// The taxonomy tag for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::InvalidKey(_) => ErrorKind::InvalidKey,
            RegistryError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            RegistryError::NotFound(_) => ErrorKind::NotFound,
            RegistryError::NotOwner { .. } => ErrorKind::NotOwner,
            RegistryError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            RegistryError::TooManyTags { .. } => ErrorKind::TooManyTags,
            RegistryError::ShareLimitExceeded { .. } => ErrorKind::ShareLimitExceeded,
            RegistryError::Store(_) => ErrorKind::Storage,
        }
    }
}

/// Stable, transport-facing name of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidKey,
    AlreadyExists,
    NotFound,
    NotOwner,
    PermissionDenied,
    TooManyTags,
    ShareLimitExceeded,
    /// Infrastructure failure in the backing store.
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidKey => "invalid_key",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::NotFound => "not_found",
            ErrorKind::NotOwner => "not_owner",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::TooManyTags => "too_many_tags",
            ErrorKind::ShareLimitExceeded => "share_limit_exceeded",
            ErrorKind::Storage => "storage",
        }
    }
}

/// Result type for Registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
