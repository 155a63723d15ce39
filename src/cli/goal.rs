//! Goal CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_goal_details, format_goal_table};
use crate::error::{GoalError, GoalResult};
use crate::services::{CreateGoal, GoalUpdate, Saved};
use crate::storage::Storage;

use super::{goal_service, parse_amount, parse_period, resolve_category};

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a spending goal for a category
    Add {
        /// Category name or ID
        category: String,
        /// Spending limit (e.g., "500" or "500.00")
        #[arg(allow_hyphen_values = true)]
        limit: String,
        /// Flag the goal in `goal status` when it nears or passes the limit
        #[arg(short, long)]
        alert: bool,
        /// Period: monthly, weekly or yearly
        #[arg(short, long)]
        period: Option<String>,
    },

    /// List goals with this month's progress
    List,

    /// Show a single goal
    Show {
        /// Goal ID or category name
        goal: String,
    },

    /// Edit a goal
    Edit {
        /// Goal ID or category name
        goal: String,
        /// Move the goal to another category
        #[arg(short, long)]
        category: Option<String>,
        /// New spending limit
        #[arg(short, long, allow_hyphen_values = true)]
        limit: Option<String>,
        /// Turn alerts on or off
        #[arg(long)]
        alert: Option<bool>,
        /// New period
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Delete a goal
    Delete {
        /// Goal ID or category name
        goal: String,
    },

    /// Refresh category names, icons and colors on every goal
    Resync,

    /// Show alerting goals that are near or over their limit
    Status,
}

fn report_storage<T>(saved: &Saved<T>) {
    if let Some(warning) = &saved.storage_warning {
        eprintln!("Warning: change may not have been saved: {}", warning);
    }
}

pub fn handle_goal_command(storage: &Storage, settings: &Settings, cmd: GoalCommands) -> GoalResult<()> {
    let service = goal_service(storage, settings);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        GoalCommands::Add {
            category,
            limit,
            alert,
            period,
        } => {
            let cat = resolve_category(storage, &category)?;
            let input = CreateGoal {
                category_id: Some(cat.id),
                limit_amount: Some(parse_amount(&limit)?),
                alert_on_exceed: alert,
                period: period.as_deref().map(parse_period).transpose()?,
            };

            let saved = service.create(input)?;
            report_storage(&saved);
            let goal = &saved.value;
            let progress = service.progress(goal);
            println!(
                "Created goal {} for '{}': {} {}",
                goal.id,
                goal.category.name,
                goal.limit_amount.format_with_symbol(symbol),
                goal.period
            );
            println!(
                "  Spent this month: {} ({}%)",
                goal.current_amount.format_with_symbol(symbol),
                progress.percent
            );
        }

        GoalCommands::List => {
            let goals = service.list();
            println!("{}", format_goal_table(&goals, symbol, |g| service.progress(g)));
        }

        GoalCommands::Show { goal } => {
            let goal = service.find(&goal)?;
            let progress = service.progress(&goal);
            print!(
                "{}",
                format_goal_details(&goal, &progress, symbol, &settings.date_format)
            );
        }

        GoalCommands::Edit {
            goal,
            category,
            limit,
            alert,
            period,
        } => {
            let existing = service.find(&goal)?;
            let update = GoalUpdate {
                category_id: category
                    .as_deref()
                    .map(|c| resolve_category(storage, c).map(|cat| cat.id))
                    .transpose()?,
                limit_amount: limit.as_deref().map(parse_amount).transpose()?,
                alert_on_exceed: alert,
                period: period.as_deref().map(parse_period).transpose()?,
            };

            if update.is_empty() {
                return Err(GoalError::validation(
                    "goal",
                    "nothing to change; pass --category, --limit, --alert or --period",
                ));
            }

            let saved = service.update(existing.id, update)?;
            report_storage(&saved);
            println!("Updated goal {} ({})", saved.value.id, saved.value);
        }

        GoalCommands::Delete { goal } => {
            let existing = service.find(&goal)?;
            let saved = service.delete(existing.id)?;
            report_storage(&saved);
            println!(
                "Deleted goal {} for '{}'",
                saved.value.id, saved.value.category.name
            );
        }

        GoalCommands::Resync => {
            let saved = service.resync_categories()?;
            report_storage(&saved);
            match saved.value {
                0 => println!("All goals already match their categories."),
                n => println!("Refreshed category details on {} goal(s).", n),
            }
        }

        GoalCommands::Status => {
            let alerts = service.alerts();
            if alerts.is_empty() {
                println!("No alerts. All flagged goals are on track.");
            }
            for (goal, progress) in alerts {
                println!(
                    "{}: {} of {} ({}%, {})",
                    goal.category.name,
                    goal.current_amount.format_with_symbol(symbol),
                    goal.limit_amount.format_with_symbol(symbol),
                    progress.percent,
                    progress.status
                );
            }
        }
    }

    Ok(())
}
