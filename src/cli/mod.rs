//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer.

pub mod category;
pub mod goal;
pub mod transaction;

pub use category::{handle_category_command, CategoryCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use crate::audit::AuditLogger;
use crate::config::settings::Settings;
use crate::error::{GoalError, GoalResult};
use crate::models::{Category, GoalPeriod, Money};
use crate::services::{GoalService, ProgressReconciler};
use crate::storage::{FileStore, LedgerStore, Storage};

pub type CliGoalService<'a> = GoalService<&'a FileStore, &'a LedgerStore, &'a LedgerStore>;

/// Wire the goal service to disk storage and the local ledger
pub fn goal_service<'a>(storage: &'a Storage, settings: &Settings) -> CliGoalService<'a> {
    let reconciler =
        ProgressReconciler::with_query_limit(&storage.ledger, settings.transaction_query_limit);
    GoalService::new(storage.goals(), &storage.ledger, reconciler)
        .with_audit(AuditLogger::new(storage.paths().audit_log()))
        .with_warning_percent(settings.warning_threshold_percent)
        .with_default_period(settings.default_period)
}

pub(crate) fn resolve_category(storage: &Storage, identifier: &str) -> GoalResult<Category> {
    storage
        .ledger
        .resolve_category(identifier)?
        .ok_or_else(|| GoalError::category_not_found(identifier))
}

pub(crate) fn parse_amount(s: &str) -> GoalResult<Money> {
    Money::parse(s).map_err(|e| GoalError::validation("limit_amount", e.to_string()))
}

pub(crate) fn parse_period(s: &str) -> GoalResult<GoalPeriod> {
    s.parse()
        .map_err(|e: crate::models::period::PeriodParseError| {
            GoalError::validation("period", e.to_string())
        })
}

/// Print the most recent audit entries
pub fn handle_audit_command(storage: &Storage, limit: usize) -> GoalResult<()> {
    let entries = AuditLogger::new(storage.paths().audit_log()).read_recent(limit)?;
    if entries.is_empty() {
        println!("Audit log is empty.");
    }
    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
