use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::{Result, RouteWiseError};

use super::{KeyValueStore, check_capacity, validate_key};

/// In-process store for ephemeral sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
    capacity: Option<usize>,
    fail_writes: Mutex<Option<String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Seed a raw value, bypassing validation and capacity.
    pub fn with_entry(self, key: &str, text: &str) -> Self {
        self.entries.lock().insert(key.to_string(), text.to_string());
        self
    }

    /// Make every subsequent write fail with `reason` (or succeed again with `None`).
    pub fn set_fail_writes(&self, reason: Option<&str>) {
        *self.fail_writes.lock() = reason.map(str::to_string);
    }

    /// Raw stored value, for assertions.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn read_text(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.entries.lock().get(key).cloned())
    }

    fn write_text(&self, key: &str, text: &str) -> Result<()> {
        validate_key(key)?;
        if let Some(reason) = self.fail_writes.lock().as_ref() {
            return Err(RouteWiseError::WriteRejected(reason.clone()));
        }
        if let Some(limit) = self.capacity {
            check_capacity(key, text, limit)?;
        }
        self.entries.lock().insert(key.to_string(), text.to_string());
        Ok(())
    }
}
