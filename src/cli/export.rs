//! CLI commands for data export

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::{paths::LedgerPaths, Settings};
use crate::error::{LedgerError, LedgerResult};
use crate::export::{export_full_json, export_full_yaml, export_period_csv, FullExport};
use crate::storage::Storage;

use super::parse_period;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export one month of transactions to CSV
    Csv {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,

        /// Output file, defaults to ledger-YYYY-MM.csv in the export directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the whole ledger to JSON
    Json {
        /// Output file path
        output: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export the whole ledger to YAML
    Yaml {
        /// Output file path
        output: PathBuf,
    },

    /// Show what an export would contain without writing files
    Info,
}

fn create_file(path: &Path) -> LedgerResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        LedgerError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    paths: &LedgerPaths,
    cmd: ExportCommands,
) -> LedgerResult<()> {
    match cmd {
        ExportCommands::Csv { month, output } => {
            let period = parse_period(month.as_deref())?;
            let output = match output {
                Some(path) => path,
                None => {
                    paths.ensure_directories()?;
                    paths.export_dir().join(format!("ledger-{}.csv", period))
                }
            };

            let count = export_period_csv(storage, period, settings, create_file(&output)?)?;
            println!(
                "Exported {} transactions for {} to: {}",
                count,
                period,
                output.display()
            );
        }

        ExportCommands::Json { output, pretty } => {
            let mut writer = create_file(&output)?;
            export_full_json(storage, &mut writer, pretty)?;
            println!("Full ledger exported to: {}", output.display());
        }

        ExportCommands::Yaml { output } => {
            let mut writer = create_file(&output)?;
            export_full_yaml(storage, &mut writer)?;
            println!("Full ledger exported to: {}", output.display());
        }

        ExportCommands::Info => {
            let export = FullExport::from_storage(storage)?;
            let meta = &export.metadata;

            println!("Export Information");
            println!("==================");
            println!("Schema version: {}", export.schema_version);
            println!("App version:    {}", export.app_version);
            println!();
            println!("Transactions:   {}", meta.transaction_count);
            println!("  undated:      {}", meta.undated_count);
            println!("Templates:      {}", meta.template_count);
            println!("Goals:          {}", meta.goal_count);
            if let (Some(earliest), Some(latest)) =
                (&meta.earliest_transaction, &meta.latest_transaction)
            {
                println!("Date range:     {} to {}", earliest, latest);
            }
        }
    }

    Ok(())
}
