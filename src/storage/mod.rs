//! Durable key-value storage for client state.
//!
//! The itinerary store only needs a synchronous text get/set keyed by string,
//! so backends implement [`KeyValueStore`] and nothing else. No transactional
//! guarantees are offered beyond last-write-wins.

mod file;
mod memory;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;

use crate::error::{Result, RouteWiseError};

/// Synchronous, capacity-bounded text store keyed by string.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing was written.
    fn read_text(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`.
    fn write_text(&self, key: &str, text: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn read_text(&self, key: &str) -> Result<Option<String>> {
        (**self).read_text(key)
    }

    fn write_text(&self, key: &str, text: &str) -> Result<()> {
        (**self).write_text(key, text)
    }
}

/// Validate a storage key.
///
/// Keys double as file names in the file backend, so they are limited to
/// ASCII letters, digits, `.`, `_` and `-`, and may not start with `.`.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(RouteWiseError::InvalidKey(key.to_string()))
    }
}

/// Reject values larger than `limit` bytes.
pub(crate) fn check_capacity(key: &str, text: &str, limit: usize) -> Result<()> {
    if text.len() > limit {
        return Err(RouteWiseError::QuotaExceeded {
            key: key.to_string(),
            size: text.len(),
            limit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("routewise-itinerary").is_ok());
        assert!(validate_key("a.b_c-1").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("with space").is_err());
    }

    #[test]
    fn test_check_capacity() {
        assert!(check_capacity("k", "12345", 5).is_ok());
        let err = check_capacity("k", "123456", 5).unwrap_err();
        assert!(matches!(
            err,
            RouteWiseError::QuotaExceeded {
                size: 6,
                limit: 5,
                ..
            }
        ));
    }
}
