//! Service layer for spend-goals
//!
//! Business logic on top of storage: goal CRUD and validation, progress
//! reconciliation, and ledger import.

pub mod goal;
pub mod import;
pub mod reconcile;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use goal::{CreateGoal, GoalService, GoalUpdate, Saved};
pub use import::{ImportService, ImportSummary};
pub use reconcile::ProgressReconciler;
pub use source::{CategorySource, TransactionSource};
