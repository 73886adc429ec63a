use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StorageError;
use crate::models::Task;

/// A string key-value store that survives restarts.
///
/// Mirrors the shape of browser local storage: values are opaque strings,
/// every write replaces the previous value, and nothing expires.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage. Contents are lost when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object file, `{ "<key>": "<value>" }`.
///
/// The whole file is rewritten on every `set_item` / `remove_item`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Opens storage at `path`, creating the parent directory if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let mut f = OpenOptions::new().read(true).open(&self.path)?;
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        if s.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&s)?)
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let s = serde_json::to_string_pretty(items)?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        f.write_all(s.as_bytes())?;
        Ok(())
    }

    /// Reads the file, discarding it when it is not a JSON object of strings.
    fn read_or_reset(&self) -> BTreeMap<String, String> {
        self.read_all().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Storage file unreadable, starting over");
            BTreeMap::new()
        })
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.read_all() {
            Ok(mut items) => Ok(items.remove(key)),
            Err(StorageError::Json(e)) => {
                warn!(path = %self.path.display(), error = %e, "Storage file is not valid JSON");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.read_or_reset();
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let mut items = self.read_or_reset();
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }
}

/// The task list persisted as one JSON array under a fixed key.
pub struct TaskStore {
    backend: Box<dyn Storage>,
    key: String,
}

impl TaskStore {
    pub fn new(backend: Box<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Convenience constructor over a fresh `MemoryStorage`.
    pub fn in_memory(key: impl Into<String>) -> Self {
        Self::new(Box::new(MemoryStorage::new()), key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads all tasks.
    ///
    /// Returns an empty vector if nothing is stored or if the stored value is
    /// not a valid task array. Corrupt content is logged and left in place
    /// until the next save overwrites it.
    pub fn load(&self) -> Vec<Task> {
        let raw = match self.backend.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Could not read stored tasks");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key = %self.key, error = %e, "Stored tasks are malformed, treating as empty");
            Vec::new()
        })
    }

    /// Overwrites the stored list with `tasks`.
    pub fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let s = serde_json::to_string(tasks)?;
        self.backend.set_item(&self.key, &s)?;
        debug!(key = %self.key, count = tasks.len(), "Saved tasks");
        Ok(())
    }

    /// Removes the stored list entirely.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.backend.remove_item(&self.key)?;
        debug!(key = %self.key, "Cleared tasks");
        Ok(())
    }

    /// Raw access to the underlying storage, mainly for inspection in tests.
    pub fn backend(&self) -> &dyn Storage {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> &mut dyn Storage {
        self.backend.as_mut()
    }
}
