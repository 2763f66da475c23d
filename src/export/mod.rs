//! Export module for the household ledger
//!
//! - CSV: one month of transactions, spreadsheet-compatible
//! - JSON: machine-readable full ledger export
//! - YAML: human-readable full ledger export

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_period_csv, read_transactions_csv, write_transactions_csv, ExportedRow};
pub use json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
