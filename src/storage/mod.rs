//! Storage layer for the household ledger
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. Every mutation lands on disk before it is visible in memory.

pub mod file_io;
pub mod goals;
pub mod templates;
pub mod transactions;

pub use file_io::{read_json, write_json_atomic};
pub use goals::GoalRepository;
pub use templates::TemplateRepository;
pub use transactions::TransactionRepository;

use serde::{Deserialize, Serialize};

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::{BudgetGoal, RecurringTemplate, Transaction};

/// Everything the ledger holds, as a single serializable value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub transactions: Vec<Transaction>,
    pub templates: Vec<RecurringTemplate>,
    pub goals: Vec<BudgetGoal>,
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub transactions: TransactionRepository,
    pub templates: TemplateRepository,
    pub goals: GoalRepository,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Create a new Storage instance with audit logging enabled
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            templates: TemplateRepository::new(paths.templates_file()),
            goals: GoalRepository::new(paths.goals_file()),
            audit: Some(AuditLogger::new(paths.audit_log())),
            paths,
        })
    }

    /// Turn the audit log on or off
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit = if enabled {
            Some(AuditLogger::new(self.paths.audit_log()))
        } else {
            None
        };
        self
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// The audit logger, if auditing is enabled
    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), LedgerError> {
        self.transactions.load()?;
        self.templates.load()?;
        self.goals.load()?;
        log::debug!(
            "Loaded ledger from {}: {} transactions, {} templates",
            self.paths.data_dir().display(),
            self.transactions.count()?,
            self.templates.count()?
        );
        Ok(())
    }

    /// Discard in-memory state and read everything back from disk
    pub fn reload(&mut self) -> Result<(), LedgerError> {
        self.load_all()
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), LedgerError> {
        self.transactions.save()?;
        self.templates.save()?;
        self.goals.save()?;
        Ok(())
    }

    /// Check if storage has been initialized (has a settings file)
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Copy of the whole ledger, for export
    pub fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        let mut transactions = self.transactions.get_all()?;
        transactions.reverse();

        Ok(LedgerSnapshot {
            transactions,
            templates: self.templates.get_all()?,
            goals: self.goals.get_all()?,
        })
    }

    /// Record a create operation in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), LedgerError> {
        match &self.audit {
            Some(logger) => logger.log(&AuditEntry::create(
                entity_type,
                entity_id,
                entity_name,
                entity,
            )),
            None => Ok(()),
        }
    }

    /// Record an update operation, with a diff of the changed fields
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), LedgerError> {
        let Some(logger) = &self.audit else {
            return Ok(());
        };

        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };

        logger.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Record a delete operation in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), LedgerError> {
        match &self.audit {
            Some(logger) => logger.log(&AuditEntry::delete(
                entity_type,
                entity_id,
                entity_name,
                entity,
            )),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Direction, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_storage();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
        assert!(storage.audit().is_some());
    }

    #[test]
    fn test_reload_picks_up_saved_data() {
        let (temp_dir, storage) = create_storage();
        let txn = Transaction::new(
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            "Salary",
            Money::from_cents(300000),
            Direction::Inflow,
            Category::Salary,
        );
        storage.transactions.upsert(txn).unwrap();

        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut other = Storage::new(paths).unwrap();
        other.load_all().unwrap();
        assert_eq!(other.transactions.count().unwrap(), 1);

        let id = storage.transactions.get_all().unwrap()[0].id;
        storage.transactions.delete(id).unwrap();
        other.reload().unwrap();
        assert_eq!(other.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_audit_entries_written() {
        let (_temp_dir, storage) = create_storage();
        let before = RecurringTemplate::new("Rent", Money::from_cents(100000), Category::Housing);
        let mut after = before.clone();
        after.update(None, Some(Money::from_cents(120000)));

        storage
            .log_create(EntityType::RecurringTemplate, before.id.to_string(), None, &before)
            .unwrap();
        storage
            .log_update(
                EntityType::RecurringTemplate,
                after.id.to_string(),
                Some("Rent".into()),
                &before,
                &after,
            )
            .unwrap();

        let entries = storage.audit().unwrap().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        let diff = entries[1].diff_summary.as_deref().unwrap();
        assert!(diff.contains("amount"));
    }

    #[test]
    fn test_audit_disabled_writes_nothing() {
        let (temp_dir, storage) = create_storage();
        let storage = storage.with_audit(false);
        let goal = BudgetGoal::new(Category::Leisure, Money::from_cents(5000));

        storage
            .log_create(EntityType::BudgetGoal, "leisure", None, &goal)
            .unwrap();
        assert!(!temp_dir.path().join("audit.log").exists());
    }

    #[test]
    fn test_snapshot_holds_everything() {
        let (_temp_dir, storage) = create_storage();
        storage
            .templates
            .upsert(RecurringTemplate::new("Gym", Money::from_cents(8000), Category::Leisure))
            .unwrap();
        storage
            .goals
            .upsert(BudgetGoal::new(Category::Groceries, Money::from_cents(60000)))
            .unwrap();

        let snapshot = storage.snapshot().unwrap();
        assert!(snapshot.transactions.is_empty());
        assert_eq!(snapshot.templates.len(), 1);
        assert_eq!(snapshot.goals.len(), 1);
    }
}
