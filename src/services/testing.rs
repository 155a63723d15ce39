//! In-memory collaborators for service tests

use std::cell::{Cell, RefCell};

use crate::error::{GoalError, GoalResult};
use crate::models::{Category, Transaction, TransactionFilter, TransactionPage};

use super::source::{CategorySource, TransactionSource};

#[derive(Default)]
pub struct FakeTransactions {
    transactions: RefCell<Vec<Transaction>>,
    fail: Cell<bool>,
    calls: Cell<usize>,
    last_filter: RefCell<Option<TransactionFilter>>,
}

impl FakeTransactions {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: RefCell::new(transactions),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        let fake = Self::default();
        fake.fail.set(true);
        fake
    }

    pub fn push(&self, txn: Transaction) {
        self.transactions.borrow_mut().push(txn);
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_filter(&self) -> Option<TransactionFilter> {
        self.last_filter.borrow().clone()
    }
}

impl TransactionSource for FakeTransactions {
    fn fetch_transactions(&self, filter: &TransactionFilter) -> GoalResult<TransactionPage> {
        self.calls.set(self.calls.get() + 1);
        *self.last_filter.borrow_mut() = Some(filter.clone());

        if self.fail.get() {
            return Err(GoalError::Query("backend unavailable".into()));
        }

        let mut matching: Vec<_> = self
            .transactions
            .borrow()
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        let total = matching.len();
        matching.truncate(filter.limit);

        Ok(TransactionPage {
            has_more: total > matching.len(),
            transactions: matching,
            total,
        })
    }
}

#[derive(Default)]
pub struct FakeCategories {
    categories: RefCell<Vec<Category>>,
}

impl FakeCategories {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories: RefCell::new(categories),
        }
    }

    /// Swap in a changed category with the same id
    pub fn replace(&self, category: Category) {
        let mut categories = self.categories.borrow_mut();
        if let Some(slot) = categories.iter_mut().find(|c| c.id == category.id) {
            *slot = category;
        }
    }
}

impl CategorySource for FakeCategories {
    fn fetch_categories(&self) -> GoalResult<Vec<Category>> {
        Ok(self.categories.borrow().clone())
    }
}
