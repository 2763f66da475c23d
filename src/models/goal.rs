//! Budget goals
//!
//! A goal is a monthly spending limit for one category. Goals are
//! informational: they never block a transaction.

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::money::Money;

/// Monthly spending limit for a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetGoal {
    pub category: Category,
    pub limit: Money,
}

impl BudgetGoal {
    pub fn new(category: Category, limit: Money) -> Self {
        Self { category, limit }
    }

    /// A zero limit means no goal is set
    pub fn is_set(&self) -> bool {
        self.limit.is_positive()
    }

    /// Progress of `spent` toward the limit, capped at 1.0
    ///
    /// Returns `None` when no goal is set.
    pub fn progress(&self, spent: Money) -> Option<f64> {
        if !self.is_set() {
            return None;
        }
        spent
            .ratio_to(self.limit)
            .map(|ratio| ratio.clamp(0.0, 1.0))
    }
}
