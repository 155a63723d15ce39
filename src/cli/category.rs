//! Category CLI commands

use clap::Subcommand;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::display::format_category_list;
use crate::error::GoalResult;
use crate::models::Category;
use crate::services::CategorySource;
use crate::storage::Storage;

use super::resolve_category;

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,

    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// Icon name
        #[arg(short, long)]
        icon: Option<String>,
        /// Color as #rgb or #rrggbb
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Rename or restyle a category (goals keep their snapshot until `goal resync`)
    Edit {
        /// Category name or ID
        category: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        icon: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
    },
}

pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> GoalResult<()> {
    let audit = AuditLogger::new(storage.paths().audit_log());

    match cmd {
        CategoryCommands::List => {
            let categories = storage.ledger.fetch_categories()?;
            println!("{}", format_category_list(&categories));
        }

        CategoryCommands::Add { name, icon, color } => {
            let mut category = Category::new(name.trim());
            if let Some(icon) = icon {
                category.icon = icon;
            }
            if let Some(color) = color {
                category.color = color;
            }

            let category = storage.ledger.add_category(category)?;
            storage.ledger.save()?;
            audit.record(&AuditEntry::create(
                EntityType::Category,
                category.id.to_string(),
                Some(category.name.clone()),
                &category,
            ));
            println!("Created category '{}' ({})", category.name, category.id);
        }

        CategoryCommands::Edit {
            category,
            name,
            icon,
            color,
        } => {
            let before = resolve_category(storage, &category)?;
            let mut updated = before.clone();
            if let Some(name) = name {
                updated.name = name.trim().to_string();
            }
            if let Some(icon) = icon {
                updated.icon = icon;
            }
            if let Some(color) = color {
                updated.color = color;
            }

            let updated = storage.ledger.update_category(updated)?;
            storage.ledger.save()?;
            audit.record(&AuditEntry::update(
                EntityType::Category,
                updated.id.to_string(),
                Some(updated.name.clone()),
                &before,
                &updated,
            ));
            println!("Updated category '{}'", updated.name);
            println!("Run 'goals goal resync' to refresh goals that use it.");
        }
    }

    Ok(())
}
