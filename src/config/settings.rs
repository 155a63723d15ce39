//! User settings for spend-goals

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::GoalPaths;
use crate::error::GoalError;
use crate::models::goal::DEFAULT_WARNING_PERCENT;
use crate::models::GoalPeriod;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Lower edge of the warning band, in percent of the limit
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold_percent: i64,

    /// Row cap for the single expense query made per reconciliation
    #[serde(default = "default_query_limit")]
    pub transaction_query_limit: usize,

    /// Period assigned to new goals when none is given
    #[serde(default)]
    pub default_period: GoalPeriod,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_warning_threshold() -> i64 {
    DEFAULT_WARNING_PERCENT
}

fn default_query_limit() -> usize {
    1000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            warning_threshold_percent: default_warning_threshold(),
            transaction_query_limit: default_query_limit(),
            default_period: GoalPeriod::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &GoalPaths) -> Result<Self, GoalError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| GoalError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| GoalError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), GoalError> {
        if !(1..=100).contains(&self.warning_threshold_percent) {
            return Err(GoalError::Config(format!(
                "warning_threshold_percent must be between 1 and 100, got {}",
                self.warning_threshold_percent
            )));
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(GoalError::Config(format!(
                "date_format '{}' is not a valid strftime format",
                self.date_format
            )));
        }
        if self.transaction_query_limit == 0 {
            return Err(GoalError::Config(
                "transaction_query_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn save(&self, paths: &GoalPaths) -> Result<(), GoalError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| GoalError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| GoalError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
