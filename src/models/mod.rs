//! Core data models
//!
//! Goals and the money/period types they are built from, plus the category
//! and transaction shapes read from the ledger.

pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use category::{Category, CategorySnapshot};
pub use goal::{is_over_limit, progress_percent, Goal, GoalProgress, ProgressStatus};
pub use ids::{CategoryId, GoalId, TransactionId};
pub use money::Money;
pub use period::{DateRange, GoalPeriod};
pub use transaction::{Transaction, TransactionFilter, TransactionKind, TransactionPage};
