//! CSV export of a month
//!
//! Writes the period slice as `date,description,amount,direction,status`
//! rows that open cleanly in a spreadsheet, and reads such a file back.

use std::fmt::Write as _;
use std::io::{Read, Write};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Direction, Money, MonthPeriod, SettlementState, Transaction};
use crate::storage::Storage;

/// One exported line, as it appears in the file
#[derive(Debug, Serialize, Deserialize)]
struct CsvRecord {
    date: String,
    description: String,
    amount: String,
    direction: String,
    status: String,
}

/// A row read back from an exported file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedRow {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub direction: Direction,
    pub status: SettlementState,
}

impl From<&Transaction> for ExportedRow {
    fn from(txn: &Transaction) -> Self {
        Self {
            // Callers only pass period slices, which are always dated
            date: txn.date.unwrap_or_default(),
            description: txn.description.clone(),
            amount: txn.amount,
            direction: txn.direction,
            status: txn.settlement_state,
        }
    }
}

/// Export the transactions of one month to CSV, returning the row count
pub fn export_period_csv<W: Write>(
    storage: &Storage,
    period: MonthPeriod,
    settings: &Settings,
    writer: W,
) -> LedgerResult<usize> {
    let slice = storage.transactions.get_by_period(period)?;
    write_transactions_csv(&slice, &settings.export_date_format, writer)
}

/// Write transactions as CSV rows sorted by date then description
///
/// Undated transactions have no place in a month export and are skipped.
pub fn write_transactions_csv<W: Write>(
    transactions: &[Transaction],
    date_format: &str,
    writer: W,
) -> LedgerResult<usize> {
    let mut rows: Vec<(NaiveDate, &Transaction)> = transactions
        .iter()
        .filter_map(|t| t.date.map(|d| (d, t)))
        .collect();
    rows.sort_by(|(a_date, a), (b_date, b)| {
        a_date
            .cmp(b_date)
            .then_with(|| a.description.cmp(&b.description))
    });

    let mut csv_writer = csv::Writer::from_writer(writer);
    for (date, txn) in &rows {
        let mut date_text = String::new();
        write!(date_text, "{}", date.format(date_format))
            .map_err(|_| LedgerError::Export(format!("Invalid date format '{}'", date_format)))?;
        csv_writer.serialize(CsvRecord {
            date: date_text,
            description: txn.description.clone(),
            amount: txn.amount.to_decimal_string(),
            direction: txn.direction.to_string(),
            status: txn.settlement_state.to_string(),
        })?;
    }
    csv_writer
        .flush()
        .map_err(|e| LedgerError::Export(e.to_string()))?;

    log::debug!("Exported {} rows to CSV", rows.len());
    Ok(rows.len())
}

/// Read rows from a CSV file written by [`write_transactions_csv`]
pub fn read_transactions_csv<R: Read>(reader: R, date_format: &str) -> LedgerResult<Vec<ExportedRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, result) in csv_reader.deserialize::<CsvRecord>().enumerate() {
        let record = result?;
        let line = index + 2;
        let bad = |field: &str, detail: String| {
            LedgerError::Export(format!("Line {}: invalid {}: {}", line, field, detail))
        };

        rows.push(ExportedRow {
            date: NaiveDate::parse_from_str(&record.date, date_format)
                .map_err(|e| bad("date", e.to_string()))?,
            amount: Money::parse(&record.amount).map_err(|e| bad("amount", e.to_string()))?,
            direction: record
                .direction
                .parse()
                .map_err(|e: String| bad("direction", e))?,
            status: record.status.parse().map_err(|e: String| bad("status", e))?,
            description: record.description,
        });
    }

    Ok(rows)
}
