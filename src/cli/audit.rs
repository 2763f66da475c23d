//! Audit log CLI command

use clap::Args;

use crate::audit::AuditLogger;
use crate::config::paths::LedgerPaths;
use crate::error::LedgerResult;

/// Arguments for `ledger audit`
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Number of entries to show, most recent last
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

/// Print the most recent audit entries
///
/// Reads the log even when auditing is currently disabled, so earlier
/// history stays visible.
pub fn handle_audit_command(paths: &LedgerPaths, args: AuditArgs) -> LedgerResult<()> {
    let logger = AuditLogger::new(paths.audit_log());

    if !logger.exists() {
        println!("No audit log yet at {}", logger.path().display());
        return Ok(());
    }

    let entries = logger.read_recent(args.limit)?;
    let total = logger.entry_count()?;

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    println!("\nShowing {} of {} entries", entries.len(), total);

    Ok(())
}
