//! spend-goals - per-category monthly spending goals
//!
//! A goal caps what may be spent in one category. Its `current_amount` is
//! never entered by hand: every read recomputes it from the expenses in the
//! current calendar month.
//!
//! # Architecture
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Goals, categories, transactions and money
//! - `storage`: Key-value goal persistence and the JSON ledger
//! - `services`: Goal operations, progress reconciliation, CSV import
//! - `audit`: Append-only audit log
//! - `display`: Terminal tables
//! - `cli`: Command handlers for the `goals` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use spend_goals::config::{paths::GoalPaths, settings::Settings};
//! use spend_goals::storage::Storage;
//!
//! let paths = GoalPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! let goals = spend_goals::cli::goal_service(&storage, &settings).list();
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{GoalError, GoalResult};
