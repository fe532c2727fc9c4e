//! Logical-name validation.
//!
//! Valid logical names:
//! - Must be non-empty
//! - Must not contain path separators (`/`, `\`) or NUL
//! - Must not be `.` or `..`
//!
//! The rules exist so that file-backed stores can never be steered outside
//! their root directory by a hostile name.

use crate::error::{BlobError, BlobResult};

/// Characters that are forbidden anywhere in a logical name.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0'];

/// Validate a logical name, returning `Ok(())` if usable as a storage key.
pub fn validate_logical_name(name: &str) -> BlobResult<()> {
    if name.is_empty() {
        return Err(BlobError::InvalidName {
            name: name.to_string(),
            reason: "logical name must not be empty".into(),
        });
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(BlobError::InvalidName {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    if name == "." || name == ".." {
        return Err(BlobError::InvalidName {
            name: name.to_string(),
            reason: "must not be a relative path component".into(),
        });
    }

    Ok(())
}
