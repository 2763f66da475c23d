//! Monthly Summary Report
//!
//! The month view: income, settled spending and surplus for the month, the
//! month's entries with their due status, and unpaid bills carried over
//! from earlier months.

use chrono::NaiveDate;

use crate::config::Settings;
use crate::display::report::{double_separator, money, separator, truncate};
use crate::display::status_label;
use crate::error::LedgerResult;
use crate::models::{DueStatus, Money, MonthPeriod, Transaction};
use crate::services::{LedgerAggregator, MonthTotals};
use crate::storage::Storage;

/// A transaction together with its due status on the report date
#[derive(Debug, Clone)]
pub struct SummaryEntry {
    pub transaction: Transaction,
    pub due_status: Option<DueStatus>,
}

impl SummaryEntry {
    fn new(transaction: Transaction, today: NaiveDate) -> Self {
        Self {
            due_status: LedgerAggregator::due_status(&transaction, today),
            transaction,
        }
    }
}

/// Monthly Summary Report
#[derive(Debug, Clone)]
pub struct MonthlySummaryReport {
    pub period: MonthPeriod,
    pub today: NaiveDate,
    pub totals: MonthTotals,
    /// Entries dated in the month, newest first
    pub entries: Vec<SummaryEntry>,
    /// Pending outflows from before the month, oldest first
    pub carryover: Vec<SummaryEntry>,
    pub carryover_total: Money,
}

impl MonthlySummaryReport {
    pub fn generate(storage: &Storage, period: MonthPeriod, today: NaiveDate) -> LedgerResult<Self> {
        let slice = storage.transactions.get_by_period(period)?;
        let all = storage.transactions.get_all()?;

        let totals = LedgerAggregator::month_totals(&slice);
        let carryover = LedgerAggregator::overdue_carryover(&all, period.start_date());
        let carryover_total: Money = carryover.iter().map(|t| t.amount).sum();

        Ok(Self {
            period,
            today,
            totals,
            entries: slice.into_iter().map(|t| SummaryEntry::new(t, today)).collect(),
            carryover: carryover
                .into_iter()
                .map(|t| SummaryEntry::new(t, today))
                .collect(),
            carryover_total,
        })
    }

    /// Number of entries in the month that are past due
    pub fn overdue_count(&self) -> usize {
        self.entries
            .iter()
            .chain(&self.carryover)
            .filter(|e| matches!(e.due_status, Some(DueStatus::Overdue { .. })))
            .count()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, settings: &Settings) -> String {
        let symbol = settings.currency_symbol.as_str();
        let mut output = String::new();

        output.push_str(&format!(
            "Monthly Summary - {} {}\n",
            self.period.month_name(),
            self.period.year()
        ));
        output.push_str(&double_separator(60));
        output.push('\n');
        output.push_str(&format!("Income:           {:>15}\n", money(self.totals.inflow, symbol)));
        output.push_str(&format!(
            "Settled expenses: {:>15}\n",
            money(self.totals.settled_outflow, symbol)
        ));
        output.push_str(&format!("Surplus:          {:>15}\n", money(self.totals.surplus, symbol)));
        output.push('\n');

        if !self.carryover.is_empty() {
            output.push_str(&format!(
                "Unpaid from earlier months: {} ({} bills)\n",
                money(self.carryover_total, symbol),
                self.carryover.len()
            ));
            output.push_str(&separator(60));
            output.push('\n');
            for entry in &self.carryover {
                output.push_str(&self.format_entry(entry, settings));
            }
            output.push('\n');
        }

        if self.entries.is_empty() {
            output.push_str("No transactions this month.\n");
            return output;
        }

        output.push_str(&format!("{:<12} {:<28} {:>12}  {}\n", "Date", "Description", "Amount", "Status"));
        output.push_str(&separator(60));
        output.push('\n');
        for entry in &self.entries {
            output.push_str(&self.format_entry(entry, settings));
        }

        output
    }

    fn format_entry(&self, entry: &SummaryEntry, settings: &Settings) -> String {
        let txn = &entry.transaction;
        let sign = if txn.is_outflow() { "-" } else { "+" };
        format!(
            "{:<12} {:<28} {:>12}  {}\n",
            txn.date_label(&settings.date_format),
            truncate(&txn.description, 28),
            format!("{}{}", sign, money(txn.amount, &settings.currency_symbol)),
            status_label(txn, self.today)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{Category, Direction, SettlementState};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn add(storage: &Storage, on: NaiveDate, cents: i64, direction: Direction, state: SettlementState) {
        let txn = Transaction::new(on, "Entry", Money::from_cents(cents), direction, Category::Other)
            .with_state(state);
        storage.transactions.upsert(txn).unwrap();
    }

    #[test]
    fn test_empty_month_with_carryover() {
        let (_temp_dir, storage) = create_test_storage();
        add(&storage, date(2025, 1, 5), 300000, Direction::Inflow, SettlementState::Settled);
        add(&storage, date(2025, 1, 6), 100000, Direction::Outflow, SettlementState::Settled);
        add(&storage, date(2025, 1, 20), 50000, Direction::Outflow, SettlementState::Pending);

        let report =
            MonthlySummaryReport::generate(&storage, MonthPeriod::new(2025, 2).unwrap(), date(2025, 2, 3))
                .unwrap();

        assert!(report.entries.is_empty());
        assert_eq!(report.totals, MonthTotals::default());
        assert_eq!(report.carryover.len(), 1);
        assert_eq!(report.carryover_total, Money::from_cents(50000));
        assert_eq!(report.overdue_count(), 1);

        let text = report.format_terminal(&Settings::default());
        assert!(text.starts_with("Monthly Summary - February 2025\n"));
        assert!(text.contains("Unpaid from earlier months: $500.00"));
        assert!(text.contains("No transactions this month."));
    }

    #[test]
    fn test_month_totals_and_due_status() {
        let (_temp_dir, storage) = create_test_storage();
        add(&storage, date(2025, 3, 1), 400000, Direction::Inflow, SettlementState::Settled);
        add(&storage, date(2025, 3, 2), 150000, Direction::Outflow, SettlementState::Settled);
        add(&storage, date(2025, 3, 20), 8000, Direction::Outflow, SettlementState::Pending);

        let report =
            MonthlySummaryReport::generate(&storage, MonthPeriod::new(2025, 3).unwrap(), date(2025, 3, 20))
                .unwrap();

        assert_eq!(report.totals.surplus, Money::from_cents(250000));
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.entries[0].due_status, Some(DueStatus::DueToday));
        assert!(report.carryover.is_empty());
    }
}
