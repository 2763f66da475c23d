use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

use household_ledger::cli::{
    handle_audit_command, handle_export_command, handle_goal_command, handle_recurring_command,
    handle_report_command, handle_transaction_command, AuditArgs, ExportCommands, GoalCommands,
    RecurringCommands, ReportCommands, TransactionCommands,
};
use household_ledger::config::{paths::LedgerPaths, settings::Settings};
use household_ledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "ledger",
    version,
    about = "Household income and expense ledger",
    long_about = "Records income and expenses, keeps track of unpaid bills, and \
                  shows monthly summaries, budget goals and savings projections."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new ledger
    Init,

    /// Show or change configuration
    Config {
        /// Currency symbol used in output
        #[arg(long)]
        currency: Option<String>,
        /// Date format for display (chrono syntax, e.g. "%Y-%m-%d")
        #[arg(long)]
        date_format: Option<String>,
        /// Date format for CSV export
        #[arg(long)]
        export_date_format: Option<String>,
        /// Turn the audit log on or off
        #[arg(long)]
        audit: Option<bool>,
    },

    /// Transaction commands
    #[command(subcommand)]
    Txn(TransactionCommands),

    /// Recurring template commands
    #[command(subcommand)]
    Recurring(RecurringCommands),

    /// Budget goal commands
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export data
    #[command(subcommand)]
    Export(ExportCommands),

    /// Show recent audit log entries
    Audit(AuditArgs),
}

fn main() -> Result<()> {
    let _ = env_logger::try_init_from_env(Env::default().default_filter_or("warn"));

    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?.with_audit(settings.audit_enabled);
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            if storage.is_initialized() {
                println!("Ledger already initialized at: {}", paths.base_dir().display());
                return Ok(());
            }
            println!("Initializing ledger at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            storage.save_all()?;
            println!("Initialization complete!");
            println!();
            println!("Record your first entry with 'ledger txn add \"Salary\" 3000 --income'.");
        }
        Some(Commands::Config {
            currency,
            date_format,
            export_date_format,
            audit,
        }) => {
            let changed = currency.is_some()
                || date_format.is_some()
                || export_date_format.is_some()
                || audit.is_some();

            if let Some(symbol) = currency {
                settings.currency_symbol = symbol;
            }
            if let Some(format) = date_format {
                settings.set_date_format(&format)?;
            }
            if let Some(format) = export_date_format {
                settings.set_export_date_format(&format)?;
            }
            if let Some(enabled) = audit {
                settings.audit_enabled = enabled;
            }
            if changed {
                settings.save(&paths)?;
                println!("Configuration saved.");
                println!();
            }

            println!("Ledger Configuration");
            println!("====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Date format:        {}", settings.date_format);
            println!("  Export date format: {}", settings.export_date_format);
            println!("  Audit enabled:      {}", settings.audit_enabled);
        }
        Some(Commands::Txn(cmd)) => handle_transaction_command(&storage, &settings, cmd)?,
        Some(Commands::Recurring(cmd)) => handle_recurring_command(&storage, &settings, cmd)?,
        Some(Commands::Goal(cmd)) => handle_goal_command(&storage, &settings, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, &settings, &paths, cmd)?,
        Some(Commands::Audit(args)) => handle_audit_command(&paths, args)?,
        None => {
            println!("Household ledger - income, expenses and bills");
            println!();
            println!("Run 'ledger --help' for usage information.");
        }
    }

    Ok(())
}
