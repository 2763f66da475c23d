//! Core data models for the household ledger
//!
//! This module contains the data structures of the ledger domain:
//! transactions, recurring templates, budget goals and the value types
//! they are built from.

pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
pub mod period;
pub mod recurring;
pub mod transaction;

pub use category::Category;
pub use goal::BudgetGoal;
pub use ids::{TemplateId, TransactionId};
pub use money::Money;
pub use period::MonthPeriod;
pub use recurring::RecurringTemplate;
pub use transaction::{
    Direction, DueStatus, SettlementError, SettlementState, Transaction,
    TransactionValidationError,
};
