//! Local ledger of categories and transactions
//!
//! Stands in for the remote finance backend: `categories.json` and
//! `transactions.json` in the data directory, served through the
//! `CategorySource` and `TransactionSource` traits.
//!
//! A file that fails to load marks its half of the ledger unavailable instead
//! of failing the whole load. Queries against that half return
//! `GoalError::Query`, and `save` leaves the unreadable file untouched.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::warn;

use crate::error::{GoalError, GoalResult};
use crate::models::{
    Category, CategoryId, Transaction, TransactionFilter, TransactionId, TransactionPage,
};
use crate::services::source::{CategorySource, TransactionSource};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    #[serde(default)]
    categories: Vec<Category>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

pub struct LedgerStore {
    categories_path: PathBuf,
    transactions_path: PathBuf,
    categories: RwLock<Vec<Category>>,
    transactions: RwLock<HashMap<TransactionId, Transaction>>,
    /// Load failure reasons, `None` while the file is usable
    categories_unavailable: RwLock<Option<String>>,
    transactions_unavailable: RwLock<Option<String>>,
}

fn lock_err(e: impl std::fmt::Display) -> GoalError {
    GoalError::Storage(format!("Failed to acquire ledger lock: {}", e))
}

impl LedgerStore {
    pub fn new(categories_path: PathBuf, transactions_path: PathBuf) -> Self {
        Self {
            categories_path,
            transactions_path,
            categories: RwLock::new(Vec::new()),
            transactions: RwLock::new(HashMap::new()),
            categories_unavailable: RwLock::new(None),
            transactions_unavailable: RwLock::new(None),
        }
    }

    /// Load both files; an unreadable file is logged and marked unavailable
    pub fn load(&self) -> GoalResult<()> {
        let (categories, cat_error) = match read_json::<CategoryData, _>(&self.categories_path) {
            Ok(data) => (data.categories, None),
            Err(e) => {
                warn!(error = %e, "category file unreadable, categories unavailable");
                (Vec::new(), Some(e.to_string()))
            }
        };
        *self.categories.write().map_err(lock_err)? = categories;
        *self.categories_unavailable.write().map_err(lock_err)? = cat_error;

        let (list, txn_error) = match read_json::<TransactionData, _>(&self.transactions_path) {
            Ok(data) => (data.transactions, None),
            Err(e) => {
                warn!(error = %e, "transaction file unreadable, transactions unavailable");
                (Vec::new(), Some(e.to_string()))
            }
        };
        let mut transactions = self.transactions.write().map_err(lock_err)?;
        transactions.clear();
        for txn in list {
            transactions.insert(txn.id, txn);
        }
        *self.transactions_unavailable.write().map_err(lock_err)? = txn_error;
        Ok(())
    }

    fn ensure_categories(&self) -> GoalResult<()> {
        match self.categories_unavailable.read().map_err(lock_err)?.as_ref() {
            Some(reason) => Err(GoalError::Query(format!("categories unavailable: {}", reason))),
            None => Ok(()),
        }
    }

    fn ensure_transactions(&self) -> GoalResult<()> {
        match self.transactions_unavailable.read().map_err(lock_err)?.as_ref() {
            Some(reason) => Err(GoalError::Query(format!("transactions unavailable: {}", reason))),
            None => Ok(()),
        }
    }

    /// Write every usable file; unreadable ones are skipped
    pub fn save(&self) -> GoalResult<()> {
        if self.ensure_categories().is_ok() {
            let categories = self.categories.read().map_err(lock_err)?.clone();
            write_json_atomic(&self.categories_path, &CategoryData { categories })?;
        }
        if self.ensure_transactions().is_err() {
            return Ok(());
        }

        let mut list: Vec<_> = self
            .transactions
            .read()
            .map_err(lock_err)?
            .values()
            .cloned()
            .collect();
        list.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        write_json_atomic(
            &self.transactions_path,
            &TransactionData { transactions: list },
        )
    }

    /// Case-insensitive lookup by name
    pub fn category_by_name(&self, name: &str) -> GoalResult<Option<Category>> {
        self.ensure_categories()?;
        let name = name.trim().to_lowercase();
        Ok(self
            .categories
            .read()
            .map_err(lock_err)?
            .iter()
            .find(|c| c.name.to_lowercase() == name)
            .cloned())
    }

    /// Look a category up by name, then by id string
    pub fn resolve_category(&self, identifier: &str) -> GoalResult<Option<Category>> {
        if let Some(cat) = self.category_by_name(identifier)? {
            return Ok(Some(cat));
        }
        match identifier.parse::<CategoryId>() {
            Ok(id) => self.find_category(id),
            Err(_) => Ok(None),
        }
    }

    pub fn add_category(&self, category: Category) -> GoalResult<Category> {
        category
            .validate()
            .map_err(|e| GoalError::validation("category", e.to_string()))?;

        if self.category_by_name(&category.name)?.is_some() {
            return Err(GoalError::Duplicate {
                entity_type: "Category",
                identifier: category.name.clone(),
            });
        }

        let mut categories = self.categories.write().map_err(lock_err)?;
        categories.push(category.clone());
        Ok(category)
    }

    /// Replace a category's display fields, keeping its id
    pub fn update_category(&self, category: Category) -> GoalResult<Category> {
        category
            .validate()
            .map_err(|e| GoalError::validation("category", e.to_string()))?;

        if let Some(other) = self.category_by_name(&category.name)? {
            if other.id != category.id {
                return Err(GoalError::Duplicate {
                    entity_type: "Category",
                    identifier: category.name.clone(),
                });
            }
        }

        let mut categories = self.categories.write().map_err(lock_err)?;
        let slot = categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or_else(|| GoalError::category_not_found(category.id.to_string()))?;
        *slot = category.clone();
        Ok(category)
    }

    pub fn add_transaction(&self, txn: Transaction) -> GoalResult<Transaction> {
        self.ensure_transactions()?;
        if let Some(cat_id) = txn.category_id {
            if self.find_category(cat_id)?.is_none() {
                return Err(GoalError::category_not_found(cat_id.to_string()));
            }
        }
        self.transactions
            .write()
            .map_err(lock_err)?
            .insert(txn.id, txn.clone());
        Ok(txn)
    }

    pub fn transaction_count(&self) -> GoalResult<usize> {
        self.ensure_transactions()?;
        Ok(self.transactions.read().map_err(lock_err)?.len())
    }
}

impl CategorySource for LedgerStore {
    fn fetch_categories(&self) -> GoalResult<Vec<Category>> {
        self.ensure_categories()?;
        let mut list = self.categories.read().map_err(lock_err)?.clone();
        list.sort_by_key(|c| c.name.to_lowercase());
        Ok(list)
    }
}

impl TransactionSource for LedgerStore {
    /// Newest first; `total` counts every match before the cap
    fn fetch_transactions(&self, filter: &TransactionFilter) -> GoalResult<TransactionPage> {
        self.ensure_transactions()?;
        let transactions = self.transactions.read().map_err(lock_err)?;

        let mut matching: Vec<_> = transactions
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));

        let total = matching.len();
        matching.truncate(filter.limit);

        Ok(TransactionPage {
            has_more: total > matching.len(),
            transactions: matching,
            total,
        })
    }
}
