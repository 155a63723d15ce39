//! Key-value storage adapters
//!
//! The goal repository only needs string get/set/remove by key. `FileStore`
//! keeps one file per key on disk; `MemoryStore` is used in tests and can be
//! told to fail writes.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::error::GoalError;

use super::file_io::{read_string, write_atomic};

/// String-valued persistent storage addressed by key
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, GoalError>;

    /// Replace the value at `key` in a single write
    fn set(&self, key: &str, value: &str) -> Result<(), GoalError>;

    /// Returns whether a value was present
    fn remove(&self, key: &str) -> Result<bool, GoalError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, GoalError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), GoalError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, GoalError> {
        (**self).remove(key)
    }
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, GoalError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(GoalError::Storage(format!("Invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, GoalError> {
        read_string(self.path_for(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), GoalError> {
        write_atomic(self.path_for(key)?, value.as_bytes())
    }

    fn remove(&self, key: &str) -> Result<bool, GoalError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(GoalError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// In-memory store with write failure injection
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing the write counter
    pub fn with_value(self, key: &str, value: &str) -> Self {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Make every subsequent `set`/`remove` fail, like a full quota
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<(), GoalError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GoalError::Storage("Storage quota exceeded".into()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, GoalError> {
        let values = self
            .values
            .read()
            .map_err(|e| GoalError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), GoalError> {
        self.check_writable()?;
        let mut values = self
            .values
            .write()
            .map_err(|e| GoalError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        values.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, GoalError> {
        self.check_writable()?;
        let mut values = self
            .values
            .write()
            .map_err(|e| GoalError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let removed = values.remove(key).is_some();
        if removed {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(removed)
    }
}
