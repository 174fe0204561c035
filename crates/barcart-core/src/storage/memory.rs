use std::collections::HashMap;

use super::{Storage, StorageError};

/// In-memory `Storage`. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A storage whose every `set` fails with `StorageError::Full`,
    /// the way a quota-exhausted store would.
    pub fn full() -> Self {
        Self {
            entries: HashMap::new(),
            fail_writes: true,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Full);
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
