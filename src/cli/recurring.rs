//! Recurring template CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_template_list;
use crate::error::{LedgerError, LedgerResult};
use crate::models::Category;
use crate::services::RecurringService;
use crate::storage::Storage;

use super::{parse_amount, parse_period};

/// Recurring template subcommands
#[derive(Subcommand)]
pub enum RecurringCommands {
    /// Create a template for a bill that comes back every month
    Add {
        /// Description (e.g., "Rent")
        description: String,
        /// Amount (e.g., "1200.00")
        amount: String,
        /// Category
        #[arg(short, long, default_value = "bills")]
        category: String,
    },
    /// List templates
    List,
    /// Change a template's description or amount
    Edit {
        /// Template ID or description
        template: String,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
    },
    /// Record a template as a paid expense on the 1st of a month
    Launch {
        /// Template ID or description
        template: String,
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Delete a template
    Delete {
        /// Template ID or description
        template: String,
    },
}

/// Handle a recurring template command
pub fn handle_recurring_command(
    storage: &Storage,
    settings: &Settings,
    cmd: RecurringCommands,
) -> LedgerResult<()> {
    let service = RecurringService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        RecurringCommands::Add {
            description,
            amount,
            category,
        } => {
            let category = category
                .parse::<Category>()
                .map_err(|e| LedgerError::Validation(e.to_string()))?;
            let template = service.create(&description, parse_amount(&amount)?, category)?;
            println!("Created recurring template: {}", template.id);
            println!("  {} ({})", template.description, template.amount.format_with_symbol(symbol));
        }

        RecurringCommands::List => {
            print!("{}", format_template_list(&service.list()?, settings));
        }

        RecurringCommands::Edit {
            template,
            description,
            amount,
        } => {
            if description.is_none() && amount.is_none() {
                return Err(LedgerError::Validation(
                    "Nothing to change. Pass --description and/or --amount".into(),
                ));
            }
            let amount = amount.as_deref().map(parse_amount).transpose()?;
            let template = service.find(&template)?;
            let updated = service.update(template.id, description.as_deref(), amount)?;
            println!(
                "Updated template: {} ({})",
                updated.description,
                updated.amount.format_with_symbol(symbol)
            );
        }

        RecurringCommands::Launch { template, month } => {
            let period = parse_period(month.as_deref())?;
            let template = service.find(&template)?;
            let txn = service.launch(template.id, period)?;
            println!(
                "Recorded {} for {}: {} ({})",
                txn.description,
                period,
                txn.amount.format_with_symbol(symbol),
                txn.id
            );
        }

        RecurringCommands::Delete { template } => {
            let template = service.find(&template)?;
            let deleted = service.delete(template.id)?;
            println!("Deleted template: {}", deleted.description);
        }
    }

    Ok(())
}
