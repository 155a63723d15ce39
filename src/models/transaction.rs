//! Transaction model
//!
//! Transactions are read-only to the goal core. The amount is signed, and
//! `kind` decides whether a row counts as spending.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, TransactionId};
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    /// Infer the kind from a signed amount: outflows are expenses
    pub fn from_amount(amount: Money) -> Self {
        if amount.is_negative() {
            Self::Expense
        } else {
            Self::Income
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "expense"),
            Self::Income => write!(f, "income"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub amount: Money,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    pub fn new(
        category_id: Option<CategoryId>,
        amount: Money,
        kind: TransactionKind,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            category_id,
            amount,
            kind,
            date,
            description: String::new(),
        }
    }

    /// Shorthand for an expense in a category
    pub fn expense(category_id: CategoryId, amount: Money, date: NaiveDate) -> Self {
        Self::new(Some(category_id), amount, TransactionKind::Expense, date)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// Query over transactions: optional kind, inclusive date bounds, row cap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: usize,
}

impl TransactionFilter {
    pub fn expenses_between(start: NaiveDate, end: NaiveDate, limit: usize) -> Self {
        Self {
            kind: Some(TransactionKind::Expense),
            start_date: Some(start),
            end_date: Some(end),
            limit,
        }
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(kind) = self.kind {
            if txn.kind != kind {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if txn.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if txn.date > end {
                return false;
            }
        }
        true
    }
}

impl Default for TransactionFilter {
    fn default() -> Self {
        Self {
            kind: None,
            start_date: None,
            end_date: None,
            limit: 100,
        }
    }
}

/// One page of query results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    /// Number of matching transactions before the cap was applied
    pub total: usize,
    pub has_more: bool,
}
