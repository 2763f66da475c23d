//! Ledger aggregation
//!
//! Pure functions that derive every figure the ledger shows from a set of
//! transactions: lifetime totals, the net balance, month slices, overdue
//! carryover, category spend and savings projections.
//!
//! The net balance only recognizes settled outflows. Pending and
//! in-negotiation outflows are tracked separately and never reduce it.
//! Transactions with an unknown date count toward lifetime totals but
//! belong to no month, so they never appear in a slice or in carryover.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{
    BudgetGoal, Category, DueStatus, Money, MonthPeriod, SettlementState, Transaction,
};

/// Outcome of projecting how long it takes to save for a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalProjection {
    /// Reachable after this many months of the given surplus
    Months(i64),
    /// The surplus is zero or negative
    NotAchievable,
}

impl std::fmt::Display for GoalProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Months(1) => write!(f, "1 month"),
            Self::Months(n) => write!(f, "{} months", n),
            Self::NotAchievable => write!(f, "not achievable with the current surplus"),
        }
    }
}

/// The metric row of one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthTotals {
    pub inflow: Money,
    pub settled_outflow: Money,
    pub surplus: Money,
}

/// One category's spend measured against its goal
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetLine {
    pub category: Category,
    pub spent: Money,
    pub limit: Money,
    /// `spent / limit`, capped at 1.0
    pub ratio: f64,
}

impl BudgetLine {
    /// Whether spend has gone past the limit (the ratio alone caps at 1.0)
    pub fn is_over(&self) -> bool {
        self.spent > self.limit
    }
}

/// Aggregates transaction sets into ledger figures
pub struct LedgerAggregator;

impl LedgerAggregator {
    /// Sum of all inflows, regardless of period or state
    pub fn total_inflow(transactions: &[Transaction]) -> Money {
        transactions
            .iter()
            .filter(|t| t.is_inflow())
            .map(|t| t.amount)
            .sum()
    }

    /// Sum of outflows that have been paid
    pub fn total_settled_outflow(transactions: &[Transaction]) -> Money {
        transactions
            .iter()
            .filter(|t| t.is_settled_outflow())
            .map(|t| t.amount)
            .sum()
    }

    /// Lifetime inflow minus settled outflow
    pub fn net_balance(transactions: &[Transaction]) -> Money {
        Self::total_inflow(transactions) - Self::total_settled_outflow(transactions)
    }

    /// Sum of outflows still awaiting payment
    pub fn total_pending_outflow(transactions: &[Transaction]) -> Money {
        transactions
            .iter()
            .filter(|t| t.is_pending_outflow())
            .map(|t| t.amount)
            .sum()
    }

    /// Sum of outflows under negotiation
    pub fn total_in_negotiation(transactions: &[Transaction]) -> Money {
        transactions
            .iter()
            .filter(|t| t.is_outflow() && t.settlement_state == SettlementState::InNegotiation)
            .map(|t| t.amount)
            .sum()
    }

    /// Transactions dated within `period`
    pub fn period_slice(transactions: &[Transaction], period: MonthPeriod) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|t| t.in_period(&period))
            .cloned()
            .collect()
    }

    /// Pending outflows dated before `period_start`, oldest first
    pub fn overdue_carryover(
        transactions: &[Transaction],
        period_start: NaiveDate,
    ) -> Vec<Transaction> {
        let mut carryover: Vec<Transaction> = transactions
            .iter()
            .filter(|t| t.is_pending_outflow() && t.date.is_some_and(|d| d < period_start))
            .cloned()
            .collect();
        carryover.sort_by_key(|t| t.date);
        carryover
    }

    /// Due status of a pending outflow on `today`; `None` for anything else
    pub fn due_status(transaction: &Transaction, today: NaiveDate) -> Option<DueStatus> {
        transaction.due_status(today)
    }

    /// Settled outflow per category
    pub fn category_spend(transactions: &[Transaction]) -> BTreeMap<Category, Money> {
        let mut spend = BTreeMap::new();
        for txn in transactions.iter().filter(|t| t.is_settled_outflow()) {
            *spend.entry(txn.category).or_insert_with(Money::zero) += txn.amount;
        }
        spend
    }

    /// One line per goal with a positive limit, in category order
    ///
    /// Only settled spend counts toward a goal.
    pub fn budget_progress(transactions: &[Transaction], goals: &[BudgetGoal]) -> Vec<BudgetLine> {
        let spend = Self::category_spend(transactions);

        let mut lines: Vec<BudgetLine> = goals
            .iter()
            .filter_map(|goal| {
                let spent = spend.get(&goal.category).copied().unwrap_or_default();
                goal.progress(spent).map(|ratio| BudgetLine {
                    category: goal.category,
                    spent,
                    limit: goal.limit,
                    ratio,
                })
            })
            .collect();
        lines.sort_by_key(|l| l.category);
        lines
    }

    /// Inflow, settled outflow and surplus of an already-sliced month
    pub fn month_totals(slice: &[Transaction]) -> MonthTotals {
        let inflow = Self::total_inflow(slice);
        let settled_outflow = Self::total_settled_outflow(slice);
        MonthTotals {
            inflow,
            settled_outflow,
            surplus: inflow - settled_outflow,
        }
    }

    /// Mean monthly surplus over every month that has a dated transaction
    ///
    /// Returns `None` when no month has been observed.
    pub fn average_monthly_surplus(transactions: &[Transaction]) -> Option<Money> {
        let mut months: BTreeMap<MonthPeriod, Money> = BTreeMap::new();
        for txn in transactions {
            let Some(date) = txn.date else { continue };
            let surplus = months.entry(MonthPeriod::containing(date)).or_default();
            if txn.is_inflow() {
                *surplus += txn.amount;
            } else if txn.is_settled_outflow() {
                *surplus -= txn.amount;
            }
        }

        if months.is_empty() {
            return None;
        }

        let total: Money = months.values().sum();
        Some(Money::from_cents(total.cents() / months.len() as i64))
    }

    /// Months of saving `surplus` needed to reach `target`
    ///
    /// `floor(target / surplus) + 1` for a positive surplus. Negative
    /// targets are treated as already reached.
    pub fn months_to_goal(target: Money, surplus: Money) -> GoalProjection {
        if !surplus.is_positive() {
            return GoalProjection::NotAchievable;
        }
        let target = target.cents().max(0);
        GoalProjection::Months(target / surplus.cents() + 1)
    }

    /// Share of `target` already covered by `balance`, clamped to 0..=1
    ///
    /// Returns `None` for a target that is not positive.
    pub fn goal_progress(balance: Money, target: Money) -> Option<f64> {
        if !target.is_positive() {
            return None;
        }
        balance.ratio_to(target).map(|r| r.clamp(0.0, 1.0))
    }
}
