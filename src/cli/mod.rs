//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod export;
pub mod goal;
pub mod recurring;
pub mod report;
pub mod transaction;

pub use audit::{handle_audit_command, AuditArgs};
pub use export::{handle_export_command, ExportCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use recurring::{handle_recurring_command, RecurringCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, MonthPeriod};

/// Today's date in local time
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub(crate) fn parse_amount(amount: &str) -> LedgerResult<Money> {
    Money::parse(amount).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount format: '{}'. Use format like '50.00' or '100'. Error: {}",
            amount, e
        ))
    })
}

pub(crate) fn parse_date(date: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        LedgerError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", date))
    })
}

/// Parse `YYYY-MM`, or fall back to the current month
pub(crate) fn parse_period(month: Option<&str>) -> LedgerResult<MonthPeriod> {
    match month {
        Some(month) => MonthPeriod::parse(month).map_err(|e| {
            LedgerError::Validation(format!(
                "Invalid period format: {}. Use YYYY-MM (e.g., 2025-01)",
                e
            ))
        }),
        None => Ok(MonthPeriod::current()),
    }
}
