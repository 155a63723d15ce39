//! Transaction CLI commands

use std::fs::File;

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::settings::Settings;
use crate::display::format_transaction_list;
use crate::error::{GoalError, GoalResult};
use crate::models::{Transaction, TransactionFilter, TransactionKind};
use crate::services::{CategorySource, ImportService, TransactionSource};
use crate::storage::Storage;

use super::{parse_amount, resolve_category};

#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction (negative amounts are expenses)
    Add {
        /// Amount, e.g. "-12.50" for an expense
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Only expenses or only income
        #[arg(short, long)]
        kind: Option<String>,
        /// Start date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Import transactions from a CSV file (date,amount,category,description)
    Import {
        /// Path to CSV file
        file: String,
        /// Date format used in the file
        #[arg(long)]
        date_format: Option<String>,
    },
}

fn parse_date(s: &str) -> GoalResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| GoalError::validation("date", format!("'{}' is not a YYYY-MM-DD date", s)))
}

fn parse_kind(s: &str) -> GoalResult<TransactionKind> {
    match s.trim().to_lowercase().as_str() {
        "expense" | "expenses" | "out" => Ok(TransactionKind::Expense),
        "income" | "in" => Ok(TransactionKind::Income),
        _ => Err(GoalError::validation(
            "kind",
            format!("'{}' is not expense or income", s),
        )),
    }
}

pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> GoalResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            amount,
            category,
            date,
            description,
        } => {
            let amount = parse_amount(&amount)?;
            if amount.is_zero() {
                return Err(GoalError::validation("amount", "amount cannot be zero"));
            }
            let category = category
                .as_deref()
                .map(|c| resolve_category(storage, c))
                .transpose()?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => Local::now().date_naive(),
            };

            let mut txn = Transaction::new(
                category.as_ref().map(|c| c.id),
                amount,
                TransactionKind::from_amount(amount),
                date,
            );
            if let Some(description) = description {
                txn = txn.with_description(description);
            }

            let txn = storage.ledger.add_transaction(txn)?;
            storage.ledger.save()?;
            AuditLogger::new(storage.paths().audit_log()).record(&AuditEntry::create(
                EntityType::Transaction,
                txn.id.to_string(),
                None,
                &txn,
            ));

            println!(
                "Recorded {} of {} on {}{}",
                txn.kind,
                txn.amount.abs().format_with_symbol(symbol),
                txn.date.format(&settings.date_format),
                category
                    .map(|c| format!(" in '{}'", c.name))
                    .unwrap_or_default()
            );
        }

        TransactionCommands::List {
            kind,
            from,
            to,
            limit,
        } => {
            let filter = TransactionFilter {
                kind: kind.as_deref().map(parse_kind).transpose()?,
                start_date: from.as_deref().map(parse_date).transpose()?,
                end_date: to.as_deref().map(parse_date).transpose()?,
                limit,
            };
            let page = storage.ledger.fetch_transactions(&filter)?;
            let categories = storage.ledger.fetch_categories()?;

            println!(
                "{}",
                format_transaction_list(&page.transactions, &categories, symbol, &settings.date_format)
            );
            if page.has_more {
                println!(
                    "Showing {} of {} transactions. Use --limit to see more.",
                    page.transactions.len(),
                    page.total
                );
            }
        }

        TransactionCommands::Import { file, date_format } => {
            let reader = File::open(&file)
                .map_err(|e| GoalError::Import(format!("Cannot open {}: {}", file, e)))?;

            let mut service = ImportService::new(&storage.ledger);
            if let Some(format) = date_format {
                service = service.with_date_format(format);
            }
            let summary = service.import_csv(reader)?;
            storage.ledger.save()?;

            println!("Imported {} transaction(s) from {}", summary.imported, file);
            for skipped in &summary.skipped {
                println!("  Skipped line {}: {}", skipped.line, skipped.reason);
            }
        }
    }

    Ok(())
}
