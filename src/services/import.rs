//! CSV transaction import into the local ledger
//!
//! Expected header: `date,amount,category,description`. Negative amounts are
//! expenses and positive amounts income. The category column is matched by
//! name and may be blank.

use std::io::Read;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::error::GoalResult;
use crate::models::{Money, Transaction, TransactionKind};
use crate::storage::LedgerStore;

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    amount: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the file, header included
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: Vec<SkippedRow>,
}

pub struct ImportService<'a> {
    ledger: &'a LedgerStore,
    date_format: String,
}

impl<'a> ImportService<'a> {
    pub fn new(ledger: &'a LedgerStore) -> Self {
        Self {
            ledger,
            date_format: "%Y-%m-%d".to_string(),
        }
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Import every valid row; bad rows are reported, not fatal
    ///
    /// The caller saves the ledger afterwards.
    pub fn import_csv<R: Read>(&self, reader: R) -> GoalResult<ImportSummary> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut summary = ImportSummary::default();
        for (index, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
            let line = index + 2;
            let result = record
                .map_err(|e| e.to_string())
                .and_then(|row| self.to_transaction(&row));

            match result.and_then(|txn| self.ledger.add_transaction(txn).map_err(|e| e.to_string())) {
                Ok(_) => summary.imported += 1,
                Err(reason) => summary.skipped.push(SkippedRow { line, reason }),
            }
        }

        info!(
            imported = summary.imported,
            skipped = summary.skipped.len(),
            "csv import finished"
        );
        Ok(summary)
    }

    fn to_transaction(&self, row: &CsvRow) -> Result<Transaction, String> {
        let date = NaiveDate::parse_from_str(&row.date, &self.date_format)
            .map_err(|_| format!("invalid date '{}'", row.date))?;

        let amount = Money::parse(&row.amount).map_err(|e| e.to_string())?;
        if amount.is_zero() {
            return Err("amount is zero".to_string());
        }

        let category_id = if row.category.is_empty() {
            None
        } else {
            let category = self
                .ledger
                .category_by_name(&row.category)
                .map_err(|e| e.to_string())?
                .ok_or_else(|| format!("unknown category '{}'", row.category))?;
            Some(category.id)
        };

        Ok(
            Transaction::new(category_id, amount, TransactionKind::from_amount(amount), date)
                .with_description(row.description.clone()),
        )
    }
}
