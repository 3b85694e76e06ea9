//! Error types for the manuscript registry core.

use thiserror::Error;

/// Core errors raised by record-level operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("tag batch of {count} exceeds the per-call limit of {max}")]
    TooManyTags { count: usize, max: usize },

    #[error("tag total would reach {total}, above the cap of {max}")]
    TagCapExceeded { total: usize, max: usize },

    #[error("revenue shares would total {total}%, above the cap of {cap}%")]
    ShareLimitExceeded { total: u32, cap: u32 },
}

/// Validation errors for manuscript identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("manuscript hash is empty")]
    EmptyHash,

    #[error("manuscript hash is {len} bytes, above the maximum of {max}")]
    HashTooLong { len: usize, max: usize },

    #[error("manuscript hash contains a control character at byte {0}")]
    ControlCharacter(usize),
}
