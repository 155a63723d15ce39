//! Audit trail for goal and ledger changes
//!
//! Each create, update or delete appends one JSON line with the entity's
//! before/after values. See `AuditLogger::record` for the failure policy.

mod diff;
mod entry;
mod logger;

pub use diff::summarize_changes;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
