//! Local Storage Module
//!
//! Persistent string key/value storage backing the session and theme stores.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Key for the session token
pub const TOKEN_KEY: &str = "ems_token";
/// Key for the cached user profile
pub const USER_KEY: &str = "ems_user";
/// Key for the theme preference
pub const THEME_KEY: &str = "ems-theme";

/// File-backed storage, one file per key under the data directory
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage_path: PathBuf,
}

impl LocalStorage {
    /// Open storage rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let storage_path = dir.into();

        std::fs::create_dir_all(&storage_path)
            .map_err(|e| StorageError::Io(e.to_string()))?;

        debug!("Local storage initialized at: {:?}", storage_path);

        Ok(Self { storage_path })
    }

    /// Directory holding the stored items
    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Read a raw string value
    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let file_path = self.item_path(key)?;

        match std::fs::read_to_string(&file_path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    /// Write a raw string value, replacing any previous one
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let file_path = self.item_path(key)?;

        std::fs::write(&file_path, value)
            .map_err(|e| StorageError::Io(e.to_string()))?;

        debug!("Stored value for key: {}", key);
        Ok(())
    }

    /// Delete a stored value; missing keys are not an error
    pub fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let file_path = self.item_path(key)?;

        if file_path.exists() {
            std::fs::remove_file(&file_path)
                .map_err(|e| StorageError::Io(e.to_string()))?;
            info!("Removed stored value for key: {}", key);
        }

        Ok(())
    }

    /// Check if key exists
    pub fn contains(&self, key: &str) -> bool {
        self.item_path(key).map(|p| p.exists()).unwrap_or(false)
    }

    /// Save a value as JSON
    pub fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(data)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        self.set_item(key, &json)
    }

    /// Load a JSON value; `Ok(None)` when the key is absent
    pub fn load<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(json) = self.get_item(key)? else {
            return Ok(None);
        };

        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn item_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.storage_path.join(format!("{}.dat", key)))
    }
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, LocalStorage) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = LocalStorage::open(dir.path().join("ems")).expect("open storage");
        (dir, storage)
    }

    #[test]
    fn missing_key_reads_as_none() {
        let (_dir, storage) = storage();
        assert_eq!(storage.get_item(TOKEN_KEY).expect("read"), None);
        assert!(!storage.contains(TOKEN_KEY));
    }

    #[test]
    fn set_then_remove_item() {
        let (_dir, storage) = storage();
        storage.set_item(TOKEN_KEY, "abc").expect("write");
        assert_eq!(storage.get_item(TOKEN_KEY).expect("read").as_deref(), Some("abc"));

        storage.remove_item(TOKEN_KEY).expect("remove");
        assert!(!storage.contains(TOKEN_KEY));
        // removing twice is fine
        storage.remove_item(TOKEN_KEY).expect("remove again");
    }

    #[test]
    fn values_survive_reopen() {
        let (dir, storage) = storage();
        storage.set_item(THEME_KEY, "light").expect("write");

        let reopened = LocalStorage::open(dir.path().join("ems")).expect("reopen");
        assert_eq!(reopened.get_item(THEME_KEY).expect("read").as_deref(), Some("light"));
    }

    #[test]
    fn json_helpers_and_corrupt_values() {
        let (_dir, storage) = storage();
        storage.save(USER_KEY, &vec![1, 2, 3]).expect("save");
        let loaded: Option<Vec<u32>> = storage.load(USER_KEY).expect("load");
        assert_eq!(loaded, Some(vec![1, 2, 3]));

        storage.set_item(USER_KEY, "{not json").expect("write");
        let err = storage.load::<Vec<u32>>(USER_KEY).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn rejects_path_like_keys() {
        let (_dir, storage) = storage();
        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(
                storage.set_item(key, "x"),
                Err(StorageError::InvalidKey(_))
            ));
        }
    }
}
