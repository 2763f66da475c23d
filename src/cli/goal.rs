//! Budget goal CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_goal_list;
use crate::error::{LedgerError, LedgerResult};
use crate::models::Category;
use crate::services::GoalService;
use crate::storage::Storage;

use super::parse_amount;

/// Budget goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Set the monthly spending limit for a category
    Set {
        /// Category
        category: String,
        /// Monthly limit (0 clears the goal but keeps the category listed)
        limit: String,
    },
    /// Remove a category's goal
    Remove {
        /// Category
        category: String,
    },
    /// List goals
    List,
}

fn parse_category(name: &str) -> LedgerResult<Category> {
    name.parse::<Category>()
        .map_err(|e| LedgerError::Validation(e.to_string()))
}

/// Handle a budget goal command
pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GoalCommands,
) -> LedgerResult<()> {
    let service = GoalService::new(storage);

    match cmd {
        GoalCommands::Set { category, limit } => {
            let goal = service.set(parse_category(&category)?, parse_amount(&limit)?)?;
            if goal.is_set() {
                println!(
                    "Goal for {}: {} per month",
                    goal.category,
                    goal.limit.format_with_symbol(&settings.currency_symbol)
                );
            } else {
                println!("Goal for {} cleared", goal.category);
            }
        }

        GoalCommands::Remove { category } => {
            let goal = service.remove(parse_category(&category)?)?;
            println!("Removed goal for {}", goal.category);
        }

        GoalCommands::List => {
            print!("{}", format_goal_list(&service.list()?, settings));
        }
    }

    Ok(())
}
