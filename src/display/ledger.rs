//! Recurring template and budget goal listings

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::{BudgetGoal, RecurringTemplate};

use super::report::{money, truncate};

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Monthly limit")]
    limit: String,
}

pub fn format_template_list(templates: &[RecurringTemplate], settings: &Settings) -> String {
    if templates.is_empty() {
        return "No recurring templates. Create one with 'ledger recurring add'.\n".to_string();
    }

    let rows = templates.iter().map(|t| TemplateRow {
        id: t.id.to_string(),
        description: truncate(&t.description, 30),
        category: t.category.to_string(),
        amount: money(t.amount, &settings.currency_symbol),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

pub fn format_goal_list(goals: &[BudgetGoal], settings: &Settings) -> String {
    if goals.is_empty() {
        return "No budget goals set.\n".to_string();
    }

    let rows = goals.iter().map(|g| GoalRow {
        category: g.category.to_string(),
        limit: if g.is_set() {
            money(g.limit, &settings.currency_symbol)
        } else {
            "(no goal)".to_string()
        },
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}
