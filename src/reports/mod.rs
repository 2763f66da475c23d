//! Reports for the household ledger
//!
//! Each report is generated from [`Storage`](crate::storage::Storage) and
//! rendered for the terminal with `format_terminal`.

pub mod budget_progress;
pub mod monthly_summary;
pub mod patrimony;
pub mod savings_goal;

pub use budget_progress::BudgetProgressReport;
pub use monthly_summary::{MonthlySummaryReport, SummaryEntry};
pub use patrimony::PatrimonyReport;
pub use savings_goal::{SavingsGoalReport, SurplusBasis};
