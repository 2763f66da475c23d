//! Savings Goal Report
//!
//! How many months of surplus it takes to afford a purchase, and how much
//! of it the current balance already covers.

use crate::config::Settings;
use crate::display::report::{double_separator, format_bar, format_percentage, money};
use crate::error::LedgerResult;
use crate::models::{Money, MonthPeriod};
use crate::services::{GoalProjection, LedgerAggregator};
use crate::storage::Storage;

/// Which surplus the projection is based on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurplusBasis {
    /// Surplus of a single month
    Month(MonthPeriod),
    /// Mean surplus over every month with dated transactions
    Average,
}

impl std::fmt::Display for SurplusBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Month(period) => write!(f, "surplus of {}", period),
            Self::Average => write!(f, "average monthly surplus"),
        }
    }
}

/// Savings Goal Report
#[derive(Debug, Clone)]
pub struct SavingsGoalReport {
    pub target: Money,
    pub basis: SurplusBasis,
    /// `None` when no month has been observed yet
    pub surplus: Option<Money>,
    pub projection: GoalProjection,
    pub balance: Money,
    pub progress: Option<f64>,
}

impl SavingsGoalReport {
    pub fn generate(storage: &Storage, target: Money, basis: SurplusBasis) -> LedgerResult<Self> {
        let all = storage.transactions.get_all()?;

        let surplus = match basis {
            SurplusBasis::Month(period) => {
                let slice = LedgerAggregator::period_slice(&all, period);
                Some(LedgerAggregator::month_totals(&slice).surplus)
            }
            SurplusBasis::Average => LedgerAggregator::average_monthly_surplus(&all),
        };

        let projection = surplus
            .map(|s| LedgerAggregator::months_to_goal(target, s))
            .unwrap_or(GoalProjection::NotAchievable);
        let balance = LedgerAggregator::net_balance(&all);

        Ok(Self {
            target,
            basis,
            surplus,
            projection,
            balance,
            progress: LedgerAggregator::goal_progress(balance, target),
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, settings: &Settings) -> String {
        let symbol = settings.currency_symbol.as_str();
        let mut output = String::new();

        output.push_str("Savings Goal\n");
        output.push_str(&double_separator(50));
        output.push('\n');
        output.push_str(&format!("Target:        {}\n", money(self.target, symbol)));
        match self.surplus {
            Some(surplus) => output.push_str(&format!(
                "Based on:      {} ({})\n",
                self.basis,
                money(surplus, symbol)
            )),
            None => output.push_str(&format!("Based on:      {} (no data yet)\n", self.basis)),
        }
        output.push_str(&format!("Time to goal:  {}\n", self.projection));

        if let Some(progress) = self.progress {
            output.push_str(&format!(
                "Balance:       {}  {} {}\n",
                money(self.balance, symbol),
                format_bar(progress, 20),
                format_percentage(progress)
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{Category, Direction, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add(storage: &Storage, y: i32, m: u32, cents: i64, direction: Direction) {
        let on = NaiveDate::from_ymd_opt(y, m, 3).unwrap();
        storage
            .transactions
            .upsert(Transaction::new(on, "Row", Money::from_cents(cents), direction, Category::Other))
            .unwrap();
    }

    #[test]
    fn test_projection_from_single_month() {
        let (_temp_dir, storage) = create_test_storage();
        add(&storage, 2025, 1, 300000, Direction::Inflow);
        add(&storage, 2025, 1, 270000, Direction::Outflow);

        let report = SavingsGoalReport::generate(
            &storage,
            Money::from_cents(100000),
            SurplusBasis::Month(MonthPeriod::new(2025, 1).unwrap()),
        )
        .unwrap();

        assert_eq!(report.surplus, Some(Money::from_cents(30000)));
        assert_eq!(report.projection, GoalProjection::Months(4));
        assert_eq!(report.progress, Some(0.3));
    }

    #[test]
    fn test_negative_average_is_not_achievable() {
        let (_temp_dir, storage) = create_test_storage();
        add(&storage, 2025, 1, 10000, Direction::Inflow);
        add(&storage, 2025, 2, 50000, Direction::Outflow);

        let report =
            SavingsGoalReport::generate(&storage, Money::from_cents(100000), SurplusBasis::Average)
                .unwrap();

        assert_eq!(report.projection, GoalProjection::NotAchievable);
        assert_eq!(report.progress, Some(0.0));
        assert!(report
            .format_terminal(&Settings::default())
            .contains("not achievable"));
    }

    #[test]
    fn test_empty_ledger_has_no_surplus() {
        let (_temp_dir, storage) = create_test_storage();

        let report =
            SavingsGoalReport::generate(&storage, Money::from_cents(5000), SurplusBasis::Average)
                .unwrap();

        assert_eq!(report.surplus, None);
        assert_eq!(report.projection, GoalProjection::NotAchievable);
        assert!(report.format_terminal(&Settings::default()).contains("no data yet"));
    }
}
