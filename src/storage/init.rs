//! Storage initialization
//!
//! First-run setup: directories plus a starter set of categories.

use crate::config::paths::GoalPaths;
use crate::error::GoalError;
use crate::models::Category;

use super::ledger::LedgerStore;

/// Starter categories as (name, icon, color)
const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Groceries", "cart", "#4caf50"),
    ("Dining Out", "utensils", "#ff9800"),
    ("Rent", "home", "#3f51b5"),
    ("Utilities", "bolt", "#ffc107"),
    ("Transportation", "car", "#009688"),
    ("Entertainment", "film", "#9c27b0"),
    ("Shopping", "bag", "#e91e63"),
    ("Health", "heart", "#f44336"),
];

/// Initialize storage for a fresh installation
///
/// Returns the number of categories created; an existing category file is
/// left alone.
pub fn initialize_storage(paths: &GoalPaths) -> Result<usize, GoalError> {
    paths.ensure_directories()?;

    if paths.categories_file().exists() {
        return Ok(0);
    }

    let ledger = LedgerStore::new(paths.categories_file(), paths.transactions_file());
    ledger.load()?;
    for (name, icon, color) in DEFAULT_CATEGORIES {
        ledger.add_category(Category::new(*name).with_style(*icon, *color))?;
    }
    ledger.save()?;

    Ok(DEFAULT_CATEGORIES.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::source::CategorySource;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_defaults_once() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GoalPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(initialize_storage(&paths).unwrap(), DEFAULT_CATEGORIES.len());
        assert_eq!(initialize_storage(&paths).unwrap(), 0);

        let ledger = LedgerStore::new(paths.categories_file(), paths.transactions_file());
        ledger.load().unwrap();
        let categories = ledger.fetch_categories().unwrap();
        assert_eq!(categories.len(), DEFAULT_CATEGORIES.len());
        assert!(categories.iter().all(|c| c.validate().is_ok()));
    }
}
