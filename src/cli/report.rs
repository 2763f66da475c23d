//! CLI commands for reports

use clap::Subcommand;

use crate::config::Settings;
use crate::error::LedgerResult;
use crate::reports::{
    BudgetProgressReport, MonthlySummaryReport, PatrimonyReport, SavingsGoalReport, SurplusBasis,
};
use crate::storage::Storage;

use super::{parse_amount, parse_period, today};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Income, expenses and surplus for a month, with unpaid carryover
    #[command(alias = "summary")]
    Month {
        /// Month (YYYY-MM), defaults to the current month
        month: Option<String>,
    },

    /// Spending against each category goal
    Budget {
        /// Month (YYYY-MM), defaults to the current month
        month: Option<String>,
    },

    /// Lifetime balance and outstanding liabilities
    #[command(alias = "networth")]
    Patrimony,

    /// How long it takes to save for a purchase
    Savings {
        /// Amount to save (e.g., "5000.00")
        target: String,

        /// Use this month's surplus (YYYY-MM) instead of the monthly average
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> LedgerResult<()> {
    let output = match cmd {
        ReportCommands::Month { month } => {
            let period = parse_period(month.as_deref())?;
            MonthlySummaryReport::generate(storage, period, today())?.format_terminal(settings)
        }
        ReportCommands::Budget { month } => {
            let period = parse_period(month.as_deref())?;
            BudgetProgressReport::generate(storage, period)?.format_terminal(settings)
        }
        ReportCommands::Patrimony => PatrimonyReport::generate(storage)?.format_terminal(settings),
        ReportCommands::Savings { target, month } => {
            let basis = match month {
                Some(month) => SurplusBasis::Month(parse_period(Some(month.as_str()))?),
                None => SurplusBasis::Average,
            };
            SavingsGoalReport::generate(storage, parse_amount(&target)?, basis)?
                .format_terminal(settings)
        }
    };

    print!("{}", output);
    Ok(())
}
