//! Recurring template service
//!
//! Templates hold a description, amount and category for bills that repeat
//! each month. Launching a template records a settled outflow on the first
//! day of the chosen month.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Money, MonthPeriod, RecurringTemplate, TemplateId, Transaction};
use crate::storage::Storage;

/// Service for recurring template management
pub struct RecurringService<'a> {
    storage: &'a Storage,
}

impl<'a> RecurringService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(
        &self,
        description: &str,
        amount: Money,
        category: Category,
    ) -> LedgerResult<RecurringTemplate> {
        self.insert(Self::prepare(description, amount, category)?)
    }

    /// Build and validate a template without storing it
    pub(crate) fn prepare(
        description: &str,
        amount: Money,
        category: Category,
    ) -> LedgerResult<RecurringTemplate> {
        let description = description.trim();
        if description.is_empty() {
            return Err(LedgerError::Validation(
                "Template description cannot be empty".into(),
            ));
        }

        let template = RecurringTemplate::new(description, amount, category);
        template.validate().map_err(LedgerError::Validation)?;
        Ok(template)
    }

    /// Store an already validated template
    pub(crate) fn insert(&self, template: RecurringTemplate) -> LedgerResult<RecurringTemplate> {
        self.storage.templates.upsert(template.clone())?;
        self.storage.log_create(
            EntityType::RecurringTemplate,
            template.id.to_string(),
            Some(template.description.clone()),
            &template,
        )?;
        log::info!("created recurring template {} ({})", template.id, template);

        Ok(template)
    }

    /// All templates, sorted by description
    pub fn list(&self) -> LedgerResult<Vec<RecurringTemplate>> {
        self.storage.templates.get_all()
    }

    /// Find a template by id or by exact (case-insensitive) description
    pub fn find(&self, identifier: &str) -> LedgerResult<RecurringTemplate> {
        if let Ok(id) = identifier.trim().parse::<TemplateId>() {
            if let Some(template) = self.storage.templates.get(id)? {
                return Ok(template);
            }
        }

        let wanted = identifier.trim().to_lowercase();
        let mut matches: Vec<RecurringTemplate> = self
            .storage
            .templates
            .get_all()?
            .into_iter()
            .filter(|t| t.id.matches(identifier) || t.description.to_lowercase() == wanted)
            .collect();

        match matches.len() {
            0 => Err(LedgerError::template_not_found(identifier)),
            1 => Ok(matches.remove(0)),
            _ => Err(LedgerError::Ambiguous {
                entity_type: "Recurring template",
                identifier: identifier.to_string(),
            }),
        }
    }

    /// Change a template's description and/or amount
    pub fn update(
        &self,
        id: TemplateId,
        description: Option<&str>,
        amount: Option<Money>,
    ) -> LedgerResult<RecurringTemplate> {
        let mut template = self
            .storage
            .templates
            .get(id)?
            .ok_or_else(|| LedgerError::template_not_found(id.to_string()))?;

        let description = description.map(str::trim);
        if description.is_some_and(str::is_empty) {
            return Err(LedgerError::Validation(
                "Template description cannot be empty".into(),
            ));
        }

        let before = template.clone();
        template.update(description.map(String::from), amount);
        template.validate().map_err(LedgerError::Validation)?;

        self.storage.templates.upsert(template.clone())?;
        self.storage.log_update(
            EntityType::RecurringTemplate,
            template.id.to_string(),
            Some(template.description.clone()),
            &before,
            &template,
        )?;

        Ok(template)
    }

    pub fn delete(&self, id: TemplateId) -> LedgerResult<RecurringTemplate> {
        let template = self
            .storage
            .templates
            .delete(id)?
            .ok_or_else(|| LedgerError::template_not_found(id.to_string()))?;

        self.storage.log_delete(
            EntityType::RecurringTemplate,
            id.to_string(),
            Some(template.description.clone()),
            &template,
        )?;

        Ok(template)
    }

    /// Record this month's occurrence of a template as a settled outflow
    pub fn launch(&self, id: TemplateId, period: MonthPeriod) -> LedgerResult<Transaction> {
        let template = self
            .storage
            .templates
            .get(id)?
            .ok_or_else(|| LedgerError::template_not_found(id.to_string()))?;

        let txn = template.instantiate(period);
        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &txn,
        )?;
        log::info!("launched template {} for {} as {}", template.id, period, txn.id);

        Ok(txn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{Direction, SettlementState};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_validates() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RecurringService::new(&storage);

        assert!(service
            .create("Rent", Money::zero(), Category::Housing)
            .unwrap_err()
            .is_validation());
        assert!(service
            .create("   ", Money::from_cents(100), Category::Housing)
            .unwrap_err()
            .is_validation());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_launch_creates_settled_outflow_on_first_of_month() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RecurringService::new(&storage);
        let template = service
            .create("Internet", Money::from_cents(9990), Category::Bills)
            .unwrap();

        let period = MonthPeriod::new(2025, 6).unwrap();
        let txn = service.launch(template.id, period).unwrap();

        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(txn.direction, Direction::Outflow);
        assert_eq!(txn.settlement_state, SettlementState::Settled);
        assert_eq!(txn.amount, Money::from_cents(9990));
        assert_eq!(storage.transactions.get_by_period(period).unwrap().len(), 1);
    }

    #[test]
    fn test_update_changes_amount_only() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RecurringService::new(&storage);
        let template = service
            .create("Gym", Money::from_cents(8000), Category::Leisure)
            .unwrap();

        let updated = service
            .update(template.id, None, Some(Money::from_cents(8500)))
            .unwrap();
        assert_eq!(updated.description, "Gym");
        assert_eq!(updated.amount, Money::from_cents(8500));
        assert_eq!(updated.category, Category::Leisure);

        assert!(service
            .update(template.id, None, Some(Money::from_cents(-1)))
            .unwrap_err()
            .is_validation());
        assert_eq!(
            service.find("gym").unwrap().amount,
            Money::from_cents(8500)
        );
    }

    #[test]
    fn test_find_and_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RecurringService::new(&storage);
        let template = service
            .create("School fees", Money::from_cents(45000), Category::Other)
            .unwrap();

        assert_eq!(service.find(&template.id.to_string()).unwrap().id, template.id);
        assert_eq!(service.find("SCHOOL FEES").unwrap().id, template.id);

        service.delete(template.id).unwrap();
        assert!(service.find("school fees").unwrap_err().is_not_found());
    }
}
