//! Key-value persistence for history.
//!
//! The history store only needs to read and write one string value under a
//! fixed key. [`KeyValueStore`] captures that, with two implementations:
//!
//! - [`FileStore`]: one JSON file per key in a data directory. Writes go to a
//!   temporary file that is then renamed over the target, so a crash never
//!   leaves a half-written value behind.
//! - [`MemoryStore`]: an in-memory map, shared between clones.

use super::models::HistoryError;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Minimal string key-value persistence.
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if nothing has been stored under the key yet.
    fn get(&self, key: &str) -> Result<Option<String>, HistoryError>;

    /// Replaces the value stored under `key` in a single write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), HistoryError>;
}

/// File-backed store: `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store in the default per-user data directory.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::StorageError` if the home directory cannot be determined.
    pub fn in_default_dir() -> Result<Self, HistoryError> {
        Ok(Self::new(default_data_dir()?))
    }

    /// Directory this store writes to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, HistoryError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(HistoryError::StorageError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid storage key '{}'", key),
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, HistoryError> {
        let path = self.path_for(key)?;

        // If file doesn't exist, nothing has been stored yet
        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), HistoryError> {
        let path = self.path_for(key)?;

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        // Write to a temporary file first
        let temp_path = path.with_extension("json.tmp");
        let mut temp_file = File::create(&temp_path)?;
        temp_file.write_all(value.as_bytes())?;
        temp_file.flush()?;
        drop(temp_file); // Close the file

        // Atomically replace the old file with the new one
        fs::rename(&temp_path, &path)?;

        Ok(())
    }
}

/// In-memory store. Clones share the same map, so a value written through
/// one handle is visible to the others (used to simulate a reload).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one value.
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        store
    }
}

fn poisoned() -> HistoryError {
    HistoryError::StorageError(std::io::Error::new(
        std::io::ErrorKind::Other,
        "memory store lock poisoned",
    ))
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, HistoryError> {
        let values = self.values.lock().map_err(|_| poisoned())?;
        Ok(values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), HistoryError> {
        let mut values = self.values.lock().map_err(|_| poisoned())?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Gets the default data directory.
///
/// Returns `~/.config/lab-insight` on Unix-like systems, or
/// `%USERPROFILE%\AppData\Roaming\lab-insight` on Windows.
///
/// # Errors
///
/// Returns `HistoryError::StorageError` if no home directory is set.
pub fn default_data_dir() -> Result<PathBuf, HistoryError> {
    let config_dir = if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".config")
    } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
        PathBuf::from(user_profile).join("AppData").join("Roaming")
    } else {
        return Err(HistoryError::StorageError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        )));
    };

    Ok(config_dir.join("lab-insight"))
}
