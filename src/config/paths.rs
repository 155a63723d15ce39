//! Path management for spend-goals
//!
//! ## Path Resolution Order
//!
//! 1. `SPEND_GOALS_DATA_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/spend-goals` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::GoalError;

pub const DATA_DIR_ENV: &str = "SPEND_GOALS_DATA_DIR";

/// Manages all paths used by spend-goals
#[derive(Debug, Clone)]
pub struct GoalPaths {
    base_dir: PathBuf,
}

impl GoalPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, GoalError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "spend-goals")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    GoalError::Config("Could not determine a config directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create GoalPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding one JSON file per store key
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    pub fn ensure_directories(&self) -> Result<(), GoalError> {
        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| GoalError::Io(format!("Failed to create data directory: {}", e)))?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
