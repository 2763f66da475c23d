//! Service layer for the household ledger
//!
//! Services validate input, persist through [`Storage`](crate::storage::Storage)
//! and record every mutation in the audit log. The aggregator is a set of
//! pure functions over transaction slices.

pub mod aggregator;
pub mod goal;
pub mod recurring;
pub mod transaction;

pub use aggregator::{BudgetLine, GoalProjection, LedgerAggregator, MonthTotals};
pub use goal::GoalService;
pub use recurring::RecurringService;
pub use transaction::{CreateTransactionInput, TransactionFilter, TransactionService};
