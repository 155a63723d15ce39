//! Terminal output formatting

pub mod goal;
pub mod ledger;

pub use goal::{format_goal_details, format_goal_table, progress_bar};
pub use ledger::{format_category_list, format_transaction_list};
