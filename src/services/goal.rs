//! Budget goal service
//!
//! One monthly spending limit per category. Goals are informational and
//! never block a transaction.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{BudgetGoal, Category, Money, MonthPeriod};
use crate::storage::Storage;

use super::aggregator::{BudgetLine, LedgerAggregator};

/// Service for budget goal management
pub struct GoalService<'a> {
    storage: &'a Storage,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set (or replace) the monthly limit for a category
    ///
    /// A limit of zero keeps the category listed without a goal.
    pub fn set(&self, category: Category, limit: Money) -> LedgerResult<BudgetGoal> {
        if !category.accepts_goal() {
            return Err(LedgerError::Validation(format!(
                "{} is an income category and cannot have a budget goal",
                category
            )));
        }
        if limit.is_negative() {
            return Err(LedgerError::Validation(format!(
                "Goal limit cannot be negative (got {})",
                limit
            )));
        }

        let goal = BudgetGoal::new(category, limit);
        match self.storage.goals.upsert(goal)? {
            Some(previous) => self.storage.log_update(
                EntityType::BudgetGoal,
                category.as_str(),
                None,
                &previous,
                &goal,
            )?,
            None => {
                self.storage
                    .log_create(EntityType::BudgetGoal, category.as_str(), None, &goal)?
            }
        }
        log::info!("budget goal for {} set to {}", category, limit);

        Ok(goal)
    }

    pub fn remove(&self, category: Category) -> LedgerResult<BudgetGoal> {
        let goal = self
            .storage
            .goals
            .delete(category)?
            .ok_or_else(|| LedgerError::goal_not_found(category.as_str()))?;

        self.storage
            .log_delete(EntityType::BudgetGoal, category.as_str(), None, &goal)?;

        Ok(goal)
    }

    /// All goals in category order
    pub fn list(&self) -> LedgerResult<Vec<BudgetGoal>> {
        self.storage.goals.get_all()
    }

    /// Settled spend against each set goal for one month
    pub fn progress(&self, period: MonthPeriod) -> LedgerResult<Vec<BudgetLine>> {
        let slice = self.storage.transactions.get_by_period(period)?;
        let goals = self.storage.goals.get_all()?;
        Ok(LedgerAggregator::budget_progress(&slice, &goals))
    }
}
