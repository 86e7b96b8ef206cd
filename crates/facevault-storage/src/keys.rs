//! Storage key validation shared by all backends.

use crate::traits::{StorageError, StorageResult};

/// Reject keys that are empty, start with `/` or have a `..` segment.
///
/// Dots inside a name (`my..photo.png`) are allowed.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.starts_with('/') || key.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
