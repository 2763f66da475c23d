//! Recurring expense templates
//!
//! A template remembers a bill that repeats every month (rent, internet,
//! school fees). Launching it stamps out a settled outflow dated the first
//! day of the chosen month.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::ids::TemplateId;
use super::money::Money;
use super::period::MonthPeriod;
use super::transaction::{Direction, SettlementState, Transaction};

/// A recurring expense template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTemplate {
    pub id: TemplateId,

    #[serde(default)]
    pub description: String,

    pub amount: Money,

    pub category: Category,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl RecurringTemplate {
    pub fn new(description: impl Into<String>, amount: Money, category: Category) -> Self {
        let now = Utc::now();
        Self {
            id: TemplateId::new(),
            description: description.into(),
            amount,
            category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Change the stored description and/or amount
    pub fn update(&mut self, description: Option<String>, amount: Option<Money>) {
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(amount) = amount {
            self.amount = amount;
        }
        self.updated_at = Utc::now();
    }

    /// Build the outflow this template produces for `period`
    pub fn instantiate(&self, period: MonthPeriod) -> Transaction {
        Transaction::new(
            period.start_date(),
            self.description.clone(),
            self.amount,
            Direction::Outflow,
            self.category,
        )
        .with_state(SettlementState::Settled)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_positive() {
            return Err(format!(
                "Template amount must be greater than zero (got {})",
                self.amount
            ));
        }
        Ok(())
    }
}

impl fmt::Display for RecurringTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.description, self.amount, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_instantiate_dates_first_of_month() {
        let template = RecurringTemplate::new("Rent", Money::from_cents(150000), Category::Housing);
        let period = MonthPeriod::new(2025, 4).unwrap();

        let txn = template.instantiate(period);
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2025, 4, 1));
        assert_eq!(txn.direction, Direction::Outflow);
        assert_eq!(txn.settlement_state, SettlementState::Settled);
        assert_eq!(txn.category, Category::Housing);
        assert_eq!(txn.amount, template.amount);
        assert_eq!(txn.description, "Rent");
    }

    #[test]
    fn test_update_keeps_category() {
        let mut template =
            RecurringTemplate::new("Internet", Money::from_cents(9990), Category::Bills);
        template.update(Some("Fiber".into()), Some(Money::from_cents(11990)));

        assert_eq!(template.description, "Fiber");
        assert_eq!(template.amount.cents(), 11990);
        assert_eq!(template.category, Category::Bills);

        template.update(None, None);
        assert_eq!(template.description, "Fiber");
    }

    #[test]
    fn test_validate() {
        let template = RecurringTemplate::new("Gym", Money::zero(), Category::Leisure);
        assert!(template.validate().is_err());
    }
}
