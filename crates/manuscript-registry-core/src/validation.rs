//! Input validation: manuscript keys and tag batches.

use crate::error::{CoreError, ValidationError};
use crate::types::ManuscriptHash;

/// Maximum length of a manuscript hash, in bytes.
pub const MAX_HASH_LEN: usize = 256;

/// Default maximum number of tags accepted by a single category addition.
pub const MAX_TAGS_PER_CALL: usize = 10;

/// Default cap on the sum of revenue shares for one manuscript, in percent.
pub const SHARE_CAP: u32 = 100;

/// Validate a manuscript key before registration.
///
/// Rejects:
/// - the empty string
/// - keys longer than [`MAX_HASH_LEN`] bytes
/// - keys containing control characters (newlines, NUL, ...)
pub fn validate_hash(hash: &ManuscriptHash) -> Result<(), ValidationError> {
    let raw = hash.as_str();

    if raw.is_empty() {
        return Err(ValidationError::EmptyHash);
    }

    if raw.len() > MAX_HASH_LEN {
        return Err(ValidationError::HashTooLong {
            len: raw.len(),
            max: MAX_HASH_LEN,
        });
    }

    if let Some((idx, _)) = raw.char_indices().find(|(_, c)| c.is_control()) {
        return Err(ValidationError::ControlCharacter(idx));
    }

    Ok(())
}

/// Validate the size of an incoming tag batch.
///
/// The limit applies to the batch alone, not to tags already stored.
pub fn validate_tag_batch(count: usize, max: usize) -> Result<(), CoreError> {
    if count > max {
        return Err(CoreError::TooManyTags { count, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hash() {
        assert!(validate_hash(&ManuscriptHash::from("hash-001")).is_ok());
        assert!(validate_hash(&ManuscriptHash::of_content(b"scan")).is_ok());
    }

    #[test]
    fn test_empty_hash_rejected() {
        assert_eq!(
            validate_hash(&ManuscriptHash::from("")),
            Err(ValidationError::EmptyHash)
        );
    }

    #[test]
    fn test_overlong_hash_rejected() {
        let long = "a".repeat(MAX_HASH_LEN + 1);
        assert_eq!(
            validate_hash(&ManuscriptHash::from(long)),
            Err(ValidationError::HashTooLong {
                len: MAX_HASH_LEN + 1,
                max: MAX_HASH_LEN
            })
        );

        let exact = "a".repeat(MAX_HASH_LEN);
        assert!(validate_hash(&ManuscriptHash::from(exact)).is_ok());
    }

    #[test]
    fn test_control_character_rejected() {
        assert_eq!(
            validate_hash(&ManuscriptHash::from("abc\ndef")),
            Err(ValidationError::ControlCharacter(3))
        );
    }

    #[test]
    fn test_tag_batch_limit() {
        assert!(validate_tag_batch(0, MAX_TAGS_PER_CALL).is_ok());
        assert!(validate_tag_batch(10, MAX_TAGS_PER_CALL).is_ok());
        assert!(matches!(
            validate_tag_batch(11, MAX_TAGS_PER_CALL),
            Err(CoreError::TooManyTags { count: 11, max: 10 })
        ));
    }
}
