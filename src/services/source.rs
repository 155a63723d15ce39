//! Collaborator interfaces consumed by the goal core
//!
//! Categories and transactions are owned by some backend (here the local
//! ledger). The goal services only see these two query traits.

use crate::error::GoalResult;
use crate::models::{Category, CategoryId, TransactionFilter, TransactionPage};

pub trait CategorySource {
    fn fetch_categories(&self) -> GoalResult<Vec<Category>>;

    fn find_category(&self, id: CategoryId) -> GoalResult<Option<Category>> {
        Ok(self.fetch_categories()?.into_iter().find(|c| c.id == id))
    }
}

pub trait TransactionSource {
    /// Transactions matching `filter`, capped at `filter.limit`
    fn fetch_transactions(&self, filter: &TransactionFilter) -> GoalResult<TransactionPage>;
}

impl<T: CategorySource + ?Sized> CategorySource for &T {
    fn fetch_categories(&self) -> GoalResult<Vec<Category>> {
        (**self).fetch_categories()
    }

    fn find_category(&self, id: CategoryId) -> GoalResult<Option<Category>> {
        (**self).find_category(id)
    }
}

impl<T: TransactionSource + ?Sized> TransactionSource for &T {
    fn fetch_transactions(&self, filter: &TransactionFilter) -> GoalResult<TransactionPage> {
        (**self).fetch_transactions(filter)
    }
}
