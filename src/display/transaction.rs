//! Transaction display formatting
//!
//! List views are rendered with `tabled`; the detail view is plain text.

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::{DueStatus, SettlementState, Transaction};

use super::report::{money, truncate};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Amount with a sign that shows the direction
pub fn signed_amount(txn: &Transaction, symbol: &str) -> String {
    let sign = if txn.is_outflow() { "-" } else { "+" };
    format!("{}{}", sign, money(txn.amount, symbol))
}

/// Settlement state, with the due status appended for pending outflows
pub fn status_label(txn: &Transaction, today: NaiveDate) -> String {
    match txn.due_status(today) {
        Some(DueStatus::Overdue { days_late }) => format!("Pending ({} days late)", days_late),
        Some(DueStatus::DueToday) => "Pending (due today)".to_string(),
        Some(DueStatus::NotYetDue) => "Pending".to_string(),
        None if txn.settlement_state == SettlementState::InNegotiation => {
            "In negotiation".to_string()
        }
        None => txn.settlement_state.to_string(),
    }
}

/// Format transactions as a table, in the order given
pub fn format_transaction_table(
    transactions: &[Transaction],
    settings: &Settings,
    today: NaiveDate,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows = transactions.iter().map(|txn| TransactionRow {
        id: txn.id.to_string(),
        date: txn.date_label(&settings.date_format),
        description: truncate(&txn.description, 30),
        category: txn.category.to_string(),
        amount: signed_amount(txn, &settings.currency_symbol),
        status: status_label(txn, today),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Format transaction details for display
pub fn format_transaction_details(
    txn: &Transaction,
    settings: &Settings,
    today: NaiveDate,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date_label(&settings.date_format)));
    if txn.unparsed_date.is_some() {
        output.push_str("             (unrecognized date, excluded from monthly views)\n");
    }
    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }
    output.push_str(&format!("Category:    {}\n", txn.category));
    output.push_str(&format!("Direction:   {}\n", txn.direction));
    output.push_str(&format!(
        "Amount:      {}\n",
        money(txn.amount, &settings.currency_symbol)
    ));
    output.push_str(&format!("Status:      {}\n", status_label(txn, today)));
    output.push_str(&format!(
        "Created:     {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Direction, Money};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pending_bill() -> Transaction {
        Transaction::new(
            date(2025, 2, 10),
            "Water",
            Money::from_cents(4550),
            Direction::Outflow,
            Category::Bills,
        )
        .with_state(SettlementState::Pending)
    }

    #[test]
    fn test_status_label_includes_lateness() {
        let txn = pending_bill();
        assert_eq!(status_label(&txn, date(2025, 2, 15)), "Pending (5 days late)");
        assert_eq!(status_label(&txn, date(2025, 2, 10)), "Pending (due today)");
        assert_eq!(status_label(&txn, date(2025, 2, 1)), "Pending");
    }

    #[test]
    fn test_table_contains_rows() {
        let settings = Settings::default();
        let table = format_transaction_table(&[pending_bill()], &settings, date(2025, 2, 1));

        assert!(table.contains("Description"));
        assert!(table.contains("Water"));
        assert!(table.contains("-$45.50"));
    }

    #[test]
    fn test_empty_table() {
        let table = format_transaction_table(&[], &Settings::default(), date(2025, 1, 1));
        assert_eq!(table, "No transactions found.\n");
    }

    #[test]
    fn test_details_flag_unparsed_date() {
        let mut txn = pending_bill();
        txn.date = None;
        txn.unparsed_date = Some("31/02/2025".into());

        let details = format_transaction_details(&txn, &Settings::default(), date(2025, 3, 1));
        assert!(details.contains("?31/02/2025"));
        assert!(details.contains("unrecognized date"));
        // Without a date the bill has no due status
        assert!(details.contains("Status:      Pending\n"));
    }
}
