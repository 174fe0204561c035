use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use super::{Storage, StorageError};

/// Longest percent-encoded key used verbatim as a file stem.
/// Keeps names well under the common 255-byte NAME_MAX.
const MAX_ENCODED_KEY_LEN: usize = 200;

/// Bytes of the encoded key kept in front of the hash for long keys.
const HASHED_PREFIX_LEN: usize = 120;

/// File stem for `key`: the percent-encoded key, or for long keys a
/// truncated prefix plus the SHA-256 of the full key.
fn file_stem(key: &str) -> String {
    let encoded = urlencoding::encode(key);
    if encoded.len() <= MAX_ENCODED_KEY_LEN {
        return encoded.into_owned();
    }
    // Percent-encoded output is ASCII, so any byte index is a char boundary
    let digest = Sha256::digest(key.as_bytes());
    format!("{}-{}", &encoded[..HASHED_PREFIX_LEN], hex::encode(digest))
}

/// Directory-backed `Storage`: each key is one `<file stem>.json` file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        std::fs::write(&tmp, value).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)?;
        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert_eq!(storage.get("recipe_margarita").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("favorites", "[]").unwrap();

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get("favorites").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_long_non_ascii_key_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        let key = format!("recipe_{}", "酒".repeat(30));

        storage.set(&key, "{}").unwrap();
        assert_eq!(storage.get(&key).unwrap().as_deref(), Some("{}"));

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get(&key).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_long_keys_sharing_a_prefix_stay_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        let base = "ß".repeat(100);
        let first = format!("recipe_{base}a");
        let second = format!("recipe_{base}b");

        storage.set(&first, "1").unwrap();
        storage.set(&second, "2").unwrap();

        assert_eq!(storage.get(&first).unwrap().as_deref(), Some("1"));
        assert_eq!(storage.get(&second).unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_file_stem_is_bounded() {
        assert_eq!(file_stem("favorites"), "favorites");
        let stem = file_stem(&"酒".repeat(500));
        assert_eq!(stem.len(), HASHED_PREFIX_LEN + 1 + 64);
        assert!(stem.len() + ".json.tmp".len() < 255);
    }

    #[test]
    fn test_keys_with_path_characters_stay_inside_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path().join("nested")).unwrap();
        storage.set("recipe_../../etc/passwd", "x").unwrap();
        storage.set("recipe_gin & tonic", "y").unwrap();

        let files: Vec<_> = std::fs::read_dir(storage.dir()).unwrap().collect();
        assert_eq!(files.len(), 2);
        assert_eq!(storage.get("recipe_../../etc/passwd").unwrap().as_deref(), Some("x"));
        assert_eq!(storage.get("recipe_gin & tonic").unwrap().as_deref(), Some("y"));
    }
}
