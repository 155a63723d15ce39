//! Goal display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Goal, GoalProgress, ProgressStatus};

const BAR_WIDTH: usize = 20;

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// `[#########-----------]`, full at or beyond the limit
pub fn progress_bar(progress: &GoalProgress) -> String {
    let filled = (progress.bar_percent() as usize * BAR_WIDTH + 50) / 100;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled)
    )
}

fn status_label(goal: &Goal, progress: &GoalProgress) -> String {
    let label = progress.status.to_string();
    if goal.alert_on_exceed && progress.status != ProgressStatus::OnTrack {
        format!("{} !", label)
    } else {
        label
    }
}

/// Render goals as a table; `progress_of` applies the configured threshold
pub fn format_goal_table<F>(goals: &[Goal], symbol: &str, progress_of: F) -> String
where
    F: Fn(&Goal) -> GoalProgress,
{
    if goals.is_empty() {
        return "No goals yet.\n\nUse 'goals goal add <category> <limit>' to create one."
            .to_string();
    }

    let rows = goals.iter().map(|goal| {
        let progress = progress_of(goal);
        GoalRow {
            id: goal.id.to_string(),
            category: goal.category.name.clone(),
            spent: goal.current_amount.format_with_symbol(symbol),
            limit: goal.limit_amount.format_with_symbol(symbol),
            progress: format!("{} {:>3}%", progress_bar(&progress), progress.percent),
            status: status_label(goal, &progress),
        }
    });

    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn format_goal_details(goal: &Goal, progress: &GoalProgress, symbol: &str, date_format: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Goal: {}\n", goal.category.name));
    output.push_str(&format!("  ID:        {}\n", goal.id.full()));
    output.push_str(&format!(
        "  Category:  {} (icon: {}, color: {})\n",
        goal.category.name, goal.category.icon, goal.category.color
    ));
    output.push_str(&format!("  Period:    {}\n", goal.period));
    output.push_str(&format!(
        "  Limit:     {}\n",
        goal.limit_amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Spent:     {} this month\n",
        goal.current_amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Remaining: {}\n",
        goal.remaining().format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Progress:  {} {}% ({})\n",
        progress_bar(progress),
        progress.percent,
        progress.status
    ));
    output.push_str(&format!(
        "  Alerts:    {}\n",
        if goal.alert_on_exceed { "on" } else { "off" }
    ));
    output.push_str(&format!(
        "  Window:    {} to {}\n",
        goal.start_date.format(date_format),
        goal.end_date.format(date_format)
    ));
    output.push_str(&format!(
        "  Created:   {}\n",
        goal.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}
