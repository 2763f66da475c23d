//! Transaction model
//!
//! A transaction is a single money movement: an inflow (income) or an
//! outflow (expense or bill). Outflows move through a small settlement
//! lifecycle: they start Settled, Pending or InNegotiation, and an unpaid
//! outflow can only ever move to Settled.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::category::Category;
use super::ids::TransactionId;
use super::money::Money;
use super::period::MonthPeriod;

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inflow,
    Outflow,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inflow => write!(f, "Inflow"),
            Self::Outflow => write!(f, "Outflow"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inflow" | "in" | "income" => Ok(Self::Inflow),
            "outflow" | "out" | "expense" => Ok(Self::Outflow),
            other => Err(format!(
                "Invalid direction: '{}'. Use inflow or outflow",
                other
            )),
        }
    }
}

/// Settlement state of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SettlementState {
    /// Payment has happened and counts against the balance
    #[default]
    Settled,
    /// Expected but not yet paid; can become overdue
    Pending,
    /// Under dispute or renegotiation; never overdue
    InNegotiation,
}

impl SettlementState {
    /// Pending and InNegotiation entries are unpaid liabilities
    pub fn is_unpaid(&self) -> bool {
        !matches!(self, Self::Settled)
    }
}

impl fmt::Display for SettlementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settled => write!(f, "Settled"),
            Self::Pending => write!(f, "Pending"),
            Self::InNegotiation => write!(f, "In negotiation"),
        }
    }
}

impl FromStr for SettlementState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            // Portuguese labels written by older versions of the ledger
            "settled" | "paid" | "pago" => Ok(Self::Settled),
            "pending" | "unpaid" | "pendente" => Ok(Self::Pending),
            "innegotiation" | "negotiation" | "negotiating" | "disputed" | "emnegociao"
            | "negociao" => Ok(Self::InNegotiation),
            _ => Err(format!(
                "Invalid status: '{}'. Use settled, pending, or in-negotiation",
                s.trim()
            )),
        }
    }
}

/// Due-date status of an unpaid outflow relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Due date has passed by this many days (always > 0)
    Overdue { days_late: i64 },
    /// Due today
    DueToday,
    /// Due date is in the future
    NotYetDue,
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overdue { days_late: 1 } => write!(f, "Overdue by 1 day"),
            Self::Overdue { days_late } => write!(f, "Overdue by {} days", days_late),
            Self::DueToday => write!(f, "Due today"),
            Self::NotYetDue => write!(f, "Not yet due"),
        }
    }
}

/// A single money movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Date the movement was recorded or is due; `None` when unknown
    pub date: Option<NaiveDate>,

    /// Original date text when it could not be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unparsed_date: Option<String>,

    /// Free-text label
    #[serde(default)]
    pub description: String,

    /// Non-negative amount
    pub amount: Money,

    pub direction: Direction,

    pub category: Category,

    #[serde(default)]
    pub settlement_state: SettlementState,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new settled transaction
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
        direction: Direction,
        category: Category,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            date: Some(date),
            unparsed_date: None,
            description: description.into(),
            amount,
            direction,
            category,
            settlement_state: SettlementState::Settled,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the settlement state at construction time
    pub fn with_state(mut self, state: SettlementState) -> Self {
        self.settlement_state = state;
        self
    }

    pub fn is_inflow(&self) -> bool {
        self.direction == Direction::Inflow
    }

    pub fn is_outflow(&self) -> bool {
        self.direction == Direction::Outflow
    }

    /// Outflow that has actually been paid
    pub fn is_settled_outflow(&self) -> bool {
        self.is_outflow() && self.settlement_state == SettlementState::Settled
    }

    /// Outflow awaiting payment (the only kind that can become overdue)
    pub fn is_pending_outflow(&self) -> bool {
        self.is_outflow() && self.settlement_state == SettlementState::Pending
    }

    /// Whether the transaction is dated within `period`
    ///
    /// Transactions with an unknown date belong to no period.
    pub fn in_period(&self, period: &MonthPeriod) -> bool {
        self.date.is_some_and(|d| period.contains(d))
    }

    /// Due status relative to `today`
    ///
    /// Only pending outflows with a known date have one.
    pub fn due_status(&self, today: NaiveDate) -> Option<DueStatus> {
        if !self.is_pending_outflow() {
            return None;
        }

        let date = self.date?;
        let days_late = (today - date).num_days();

        Some(if days_late > 0 {
            DueStatus::Overdue { days_late }
        } else if days_late == 0 {
            DueStatus::DueToday
        } else {
            DueStatus::NotYetDue
        })
    }

    /// Mark an unpaid outflow as settled
    ///
    /// Settlement is one-directional: a settled transaction cannot be
    /// settled again and there is no way back to an unpaid state.
    pub fn mark_settled(&mut self) -> Result<(), SettlementError> {
        if self.settlement_state == SettlementState::Settled {
            return Err(SettlementError::AlreadySettled);
        }
        if self.is_inflow() {
            return Err(SettlementError::NotAnOutflow);
        }

        self.settlement_state = SettlementState::Settled;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Validate the transaction before it is stored
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if self.is_inflow() && self.settlement_state.is_unpaid() {
            return Err(TransactionValidationError::UnsettledInflow);
        }

        Ok(())
    }

    /// Date as text for display; unknown dates show their original text
    pub fn date_label(&self, format: &str) -> String {
        match (&self.date, &self.unparsed_date) {
            (Some(date), _) => date.format(format).to_string(),
            (None, Some(raw)) => format!("?{}", raw),
            (None, None) => "(no date)".to_string(),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_outflow() { "-" } else { "+" };
        write!(
            f,
            "{} {} {}{}",
            self.date_label("%Y-%m-%d"),
            self.description,
            sign,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    UnsettledInflow,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            Self::UnsettledInflow => write!(f, "Inflows are always settled"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

/// Errors from the settlement lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementError {
    AlreadySettled,
    NotAnOutflow,
}

impl fmt::Display for SettlementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySettled => write!(f, "already settled"),
            Self::NotAnOutflow => write!(f, "only outflows can be settled"),
        }
    }
}

impl std::error::Error for SettlementError {}
