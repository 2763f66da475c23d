//! Patrimony Report
//!
//! Lifetime figures across the whole ledger. The headline is the net
//! balance; unpaid liabilities are listed beside it but never subtracted.

use crate::config::Settings;
use crate::display::report::{double_separator, money, separator};
use crate::error::LedgerResult;
use crate::models::Money;
use crate::services::LedgerAggregator;
use crate::storage::Storage;

/// Patrimony Report
#[derive(Debug, Clone, PartialEq)]
pub struct PatrimonyReport {
    pub total_inflow: Money,
    pub total_settled_outflow: Money,
    pub net_balance: Money,
    pub pending_outflow: Money,
    pub in_negotiation: Money,
    pub transaction_count: usize,
    /// Transactions whose date is missing or unreadable
    pub undated_count: usize,
}

impl PatrimonyReport {
    pub fn generate(storage: &Storage) -> LedgerResult<Self> {
        let all = storage.transactions.get_all()?;

        Ok(Self {
            total_inflow: LedgerAggregator::total_inflow(&all),
            total_settled_outflow: LedgerAggregator::total_settled_outflow(&all),
            net_balance: LedgerAggregator::net_balance(&all),
            pending_outflow: LedgerAggregator::total_pending_outflow(&all),
            in_negotiation: LedgerAggregator::total_in_negotiation(&all),
            transaction_count: all.len(),
            undated_count: all.iter().filter(|t| t.date.is_none()).count(),
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, settings: &Settings) -> String {
        let symbol = settings.currency_symbol.as_str();
        let mut output = String::new();

        output.push_str("Patrimony\n");
        output.push_str(&double_separator(40));
        output.push('\n');
        output.push_str(&format!("Total income:     {:>20}\n", money(self.total_inflow, symbol)));
        output.push_str(&format!(
            "Total paid:       {:>20}\n",
            money(self.total_settled_outflow, symbol)
        ));
        output.push_str(&separator(40));
        output.push('\n');
        output.push_str(&format!("Net balance:      {:>20}\n", money(self.net_balance, symbol)));
        output.push('\n');

        if self.pending_outflow.is_positive() {
            output.push_str(&format!(
                "Pending bills:    {:>20}\n",
                money(self.pending_outflow, symbol)
            ));
        }
        if self.in_negotiation.is_positive() {
            output.push_str(&format!(
                "Warning: {} in negotiation, not included in the balance\n",
                money(self.in_negotiation, symbol)
            ));
        }
        if self.undated_count > 0 {
            output.push_str(&format!(
                "{} of {} transactions have no readable date and appear in no month\n",
                self.undated_count, self.transaction_count
            ));
        }

        output
    }
}
