//! Transaction CLI commands
//!
//! Implements CLI commands for recording, listing, settling and deleting
//! transactions.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::transaction::{format_transaction_details, format_transaction_table};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Direction, SettlementState};
use crate::services::{CreateTransactionInput, TransactionFilter, TransactionService};
use crate::storage::Storage;

use super::{parse_amount, parse_date, parse_period, today};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// Description (e.g., "Electricity bill")
        description: String,
        /// Amount (e.g., "120.50")
        amount: String,
        /// Record as income instead of an expense
        #[arg(short, long)]
        income: bool,
        /// Category (groceries, housing, transport, leisure, bills, salary, other)
        #[arg(short, long)]
        category: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Settlement status (settled, pending, in-negotiation)
        #[arg(short, long)]
        status: Option<String>,
        /// Also save the expense as a recurring template
        #[arg(long)]
        recurring: bool,
    },
    /// List transactions, newest first
    List {
        /// Only this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
        /// Filter by status (settled, pending, in-negotiation)
        #[arg(short, long)]
        status: Option<String>,
        /// Filter by direction (inflow, outflow)
        #[arg(long)]
        direction: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Mark a pending or in-negotiation expense as paid
    #[command(alias = "settle")]
    Pay {
        /// Transaction ID
        id: String,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> LedgerResult<()> {
    let service = TransactionService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            description,
            amount,
            income,
            category,
            date,
            status,
            recurring,
        } => {
            let direction = if income {
                Direction::Inflow
            } else {
                Direction::Outflow
            };
            let category = match category {
                Some(name) => name
                    .parse::<Category>()
                    .map_err(|e| LedgerError::Validation(e.to_string()))?,
                None if income => Category::Salary,
                None => Category::Other,
            };
            let state = status
                .map(|s| s.parse::<SettlementState>())
                .transpose()
                .map_err(LedgerError::Validation)?;
            let date = match date {
                Some(date_str) => parse_date(&date_str)?,
                None => today(),
            };

            let input = CreateTransactionInput {
                date,
                description,
                amount: parse_amount(&amount)?,
                direction,
                category,
                state,
                save_as_template: recurring,
            };

            let txn = service.create(input)?;

            println!("Created transaction:");
            println!("  ID:       {}", txn.id);
            println!("  Date:     {}", txn.date_label(&settings.date_format));
            println!("  Amount:   {}", txn.amount.format_with_symbol(symbol));
            println!("  Category: {}", txn.category);
            println!("  Status:   {}", txn.settlement_state);
            if recurring {
                println!("Saved as a recurring template.");
            }
        }

        TransactionCommands::List {
            month,
            category,
            status,
            direction,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);

            if let Some(month) = month {
                filter = filter.period(parse_period(Some(month.as_str()))?);
            }
            if let Some(name) = category {
                let category = name
                    .parse::<Category>()
                    .map_err(|e| LedgerError::Validation(e.to_string()))?;
                filter = filter.category(category);
            }
            if let Some(status) = status {
                filter = filter.state(status.parse().map_err(LedgerError::Validation)?);
            }
            if let Some(direction) = direction {
                filter = filter.direction(direction.parse().map_err(LedgerError::Validation)?);
            }

            let transactions = service.list(filter)?;
            print!(
                "{}",
                format_transaction_table(&transactions, settings, today())
            );
            println!("\nShowing {} transactions", transactions.len());
        }

        TransactionCommands::Show { id } => {
            let txn = service.find(&id)?;
            print!("{}", format_transaction_details(&txn, settings, today()));
        }

        TransactionCommands::Pay { id } => {
            let txn = service.find(&id)?;
            let settled = service.mark_settled(txn.id)?;
            println!(
                "Marked as paid: {} ({} {})",
                settled.id,
                settled.description,
                settled.amount.format_with_symbol(symbol)
            );
        }

        TransactionCommands::Delete { id, force } => {
            let txn = service.find(&id)?;

            if !force {
                println!("About to delete transaction:");
                println!("  Date:        {}", txn.date_label(&settings.date_format));
                println!("  Description: {}", txn.description);
                println!("  Amount:      {}", txn.amount.format_with_symbol(symbol));
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deleted = service.delete(txn.id)?;
            println!(
                "Deleted transaction: {} ({})",
                deleted.id, deleted.description
            );
        }
    }

    Ok(())
}
