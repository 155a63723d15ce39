//! Category and transaction listings

use std::collections::HashMap;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Category, CategoryId, Transaction};

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Icon")]
    icon: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "ID")]
    id: String,
}

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'goals init' to create default categories."
            .to_string();
    }

    let rows = categories.iter().map(|c| CategoryRow {
        name: c.name.clone(),
        icon: c.icon.clone(),
        color: c.color.clone(),
        id: c.id.to_string(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn format_transaction_list(
    transactions: &[Transaction],
    categories: &[Category],
    symbol: &str,
    date_format: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let names: HashMap<CategoryId, &str> =
        categories.iter().map(|c| (c.id, c.name.as_str())).collect();

    let rows = transactions.iter().map(|t| TransactionRow {
        date: t.date.format(date_format).to_string(),
        kind: t.kind.to_string(),
        amount: t.amount.format_with_symbol(symbol),
        category: t
            .category_id
            .and_then(|id| names.get(&id).copied())
            .unwrap_or("-")
            .to_string(),
        description: t.description.clone(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}
