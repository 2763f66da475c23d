//! YAML export of the whole ledger
//!
//! Same content as the JSON export, in a form that is easy to read.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full ledger to YAML
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> LedgerResult<()> {
    let export = FullExport::checked_from_storage(storage)?;
    let to_export_error = |e: std::io::Error| LedgerError::Export(e.to_string());

    writeln!(writer, "# Household ledger export").map_err(to_export_error)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(to_export_error)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(to_export_error)?;
    writeln!(writer).map_err(to_export_error)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{Category, Direction, Money, SettlementState, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_roundtrip_keeps_state() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let on = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let txn = Transaction::new(on, "Dentist", Money::from_cents(9000), Direction::Outflow, Category::Other)
            .with_state(SettlementState::InNegotiation);
        storage.transactions.upsert(txn).unwrap();

        let mut output = Vec::new();
        export_full_yaml(&storage, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.starts_with("# Household ledger export"));
        assert!(text.contains("in_negotiation"));

        let imported: FullExport = serde_yaml::from_str(&text).unwrap();
        assert!(imported.validate().is_ok());
        assert_eq!(imported.transactions.len(), 1);
        assert_eq!(
            imported.transactions[0].settlement_state,
            SettlementState::InNegotiation
        );
    }
}
