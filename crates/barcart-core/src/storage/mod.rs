//! Local key-value storage.
//!
//! `Storage` is the only way the lookup cache and the favorites list reach
//! persisted state. Values are strings (serialized JSON); keys are free text.
//!
//! - `FileStorage`: one file per key in a directory
//! - `MemoryStorage`: in-process map, for tests and `--no-persist`

pub mod file;
pub mod memory;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub use file::FileStorage;
pub use memory::MemoryStorage;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage is full")]
    Full,
}

pub trait Storage {
    /// Read the raw value for `key`, `None` if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write (replace) the raw value for `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Parse persisted JSON, treating absence and malformed data alike as `default`.
pub fn parse_or_default<T: DeserializeOwned>(raw: Option<&str>, default: T) -> T {
    match raw {
        Some(raw) => match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "Discarding malformed persisted value");
                default
            }
        },
        None => default,
    }
}

/// Read `key` and parse it, falling back to `default` on any failure,
/// including a storage read error.
pub fn load_or_default<S, T>(storage: &S, key: &str, default: T) -> T
where
    S: Storage + ?Sized,
    T: DeserializeOwned,
{
    match storage.get(key) {
        Ok(raw) => parse_or_default(raw.as_deref(), default),
        Err(e) => {
            debug!(key, error = %e, "Failed to read persisted value");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_default_absent() {
        let value: Vec<String> = parse_or_default(None, vec!["x".to_string()]);
        assert_eq!(value, vec!["x"]);
    }

    #[test]
    fn test_parse_or_default_malformed() {
        let value: Vec<String> = parse_or_default(Some("{not json"), Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn test_parse_or_default_wrong_shape() {
        let value: Vec<String> = parse_or_default(Some(r#"{"a": 1}"#), Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn test_parse_or_default_valid() {
        let value: Vec<String> = parse_or_default(Some(r#"["a","b"]"#), Vec::new());
        assert_eq!(value, vec!["a", "b"]);
    }

    #[test]
    fn test_boxed_storage_delegates() {
        let mut storage: Box<dyn Storage> = Box::new(MemoryStorage::new());
        storage.set("k", "\"v\"").unwrap();
        assert_eq!(load_or_default(&storage, "k", String::new()), "v");
    }

    #[test]
    fn test_load_or_default_from_storage() {
        let mut storage = MemoryStorage::new();
        storage.set("n", "42").unwrap();
        assert_eq!(load_or_default(&storage, "n", 0u32), 42);
        assert_eq!(load_or_default(&storage, "missing", 7u32), 7);
    }
}
