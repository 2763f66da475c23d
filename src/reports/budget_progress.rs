//! Budget Progress Report
//!
//! Settled spending per category for one month, measured against the
//! category's goal.

use crate::config::Settings;
use crate::display::report::{double_separator, format_bar, format_percentage, money, separator};
use crate::error::LedgerResult;
use crate::models::{Category, Money, MonthPeriod};
use crate::services::{BudgetLine, LedgerAggregator};
use crate::storage::Storage;

const BAR_WIDTH: usize = 20;

/// Budget Progress Report
#[derive(Debug, Clone)]
pub struct BudgetProgressReport {
    pub period: MonthPeriod,
    /// One line per category with a goal, in category order
    pub lines: Vec<BudgetLine>,
    /// Settled spend in categories that have no goal
    pub unbudgeted: Vec<(Category, Money)>,
}

impl BudgetProgressReport {
    pub fn generate(storage: &Storage, period: MonthPeriod) -> LedgerResult<Self> {
        let slice = storage.transactions.get_by_period(period)?;
        let goals = storage.goals.get_all()?;

        let lines = LedgerAggregator::budget_progress(&slice, &goals);
        let unbudgeted = LedgerAggregator::category_spend(&slice)
            .into_iter()
            .filter(|(category, _)| !lines.iter().any(|l| l.category == *category))
            .collect();

        Ok(Self {
            period,
            lines,
            unbudgeted,
        })
    }

    pub fn over_budget(&self) -> impl Iterator<Item = &BudgetLine> {
        self.lines.iter().filter(|l| l.is_over())
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, settings: &Settings) -> String {
        let symbol = settings.currency_symbol.as_str();
        let mut output = String::new();

        output.push_str(&format!("Budget Progress - {}\n", self.period));
        output.push_str(&double_separator(70));
        output.push('\n');

        if self.lines.is_empty() {
            output.push_str("No budget goals set. Use 'ledger goal set' to add one.\n");
        } else {
            output.push_str(&format!(
                "{:<12} {:>12} {:>12}  {:<20} {:>6}\n",
                "Category", "Spent", "Limit", "", "Used"
            ));
            output.push_str(&separator(70));
            output.push('\n');

            for line in &self.lines {
                let marker = if line.is_over() { " over" } else { "" };
                output.push_str(&format!(
                    "{:<12} {:>12} {:>12}  {} {:>6}{}\n",
                    line.category.to_string(),
                    money(line.spent, symbol),
                    money(line.limit, symbol),
                    format_bar(line.ratio, BAR_WIDTH),
                    format_percentage(line.ratio),
                    marker
                ));
            }
        }

        if !self.unbudgeted.is_empty() {
            output.push('\n');
            output.push_str("Spending without a goal:\n");
            for (category, spent) in &self.unbudgeted {
                output.push_str(&format!("  {:<12} {:>12}\n", category.to_string(), money(*spent, symbol)));
            }
        }

        output
    }
}
