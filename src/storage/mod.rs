//! Storage layer for spend-goals
//!
//! Goals go through a swappable key-value adapter; the category and
//! transaction ledger is plain JSON files with atomic writes.

pub mod file_io;
pub mod goals;
pub mod init;
pub mod kv;
pub mod ledger;

pub use file_io::{read_json, write_json_atomic};
pub use goals::GoalRepository;
pub use init::initialize_storage;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use ledger::LedgerStore;

use crate::config::paths::GoalPaths;
use crate::error::GoalError;

/// Disk-backed storage for the CLI: goals in a file store, plus the ledger
pub struct Storage {
    paths: GoalPaths,
    goal_store: FileStore,
    pub ledger: LedgerStore,
}

impl Storage {
    pub fn new(paths: GoalPaths) -> Result<Self, GoalError> {
        paths.ensure_directories()?;

        Ok(Self {
            goal_store: FileStore::new(paths.data_dir()),
            ledger: LedgerStore::new(paths.categories_file(), paths.transactions_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &GoalPaths {
        &self.paths
    }

    pub fn goals(&self) -> GoalRepository<&FileStore> {
        GoalRepository::new(&self.goal_store)
    }

    /// Load the ledger; goals are read fresh on every access
    ///
    /// Unreadable ledger files do not fail this, see `LedgerStore::load`.
    pub fn load_all(&self) -> Result<(), GoalError> {
        self.ledger.load()
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GoalPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
        storage.load_all().unwrap();
        assert!(storage.goals().load_all().is_empty());
    }

    #[test]
    fn test_goals_persist_under_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(GoalPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();

        let today = chrono::NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let goal = crate::models::Goal::new(
            &crate::models::Category::new("Groceries"),
            crate::models::Money::from_cents(50000),
            today,
        );
        storage.goals().save_all(&[goal.clone()]).unwrap();

        assert!(temp_dir.path().join("data").join("goals.json").exists());
        let reopened = Storage::new(GoalPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        assert_eq!(reopened.goals().load_all(), vec![goal]);
    }

    #[test]
    fn test_corrupt_ledger_does_not_fail_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(GoalPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        std::fs::write(storage.paths().transactions_file(), "{garbage").unwrap();

        storage.load_all().unwrap();
    }
}
