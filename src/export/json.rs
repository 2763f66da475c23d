//! JSON export of the whole ledger
//!
//! A versioned snapshot of every transaction, template and goal, with a
//! small metadata block for reference.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{BudgetGoal, RecurringTemplate, Transaction};
use crate::services::LedgerAggregator;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full ledger export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// All transactions, oldest first
    pub transactions: Vec<Transaction>,

    /// All recurring templates
    pub templates: Vec<RecurringTemplate>,

    /// All budget goals
    pub goals: Vec<BudgetGoal>,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub transaction_count: usize,
    pub template_count: usize,
    pub goal_count: usize,

    /// Transactions without a readable date
    pub undated_count: usize,

    /// Date range of dated transactions
    pub earliest_transaction: Option<String>,
    pub latest_transaction: Option<String>,

    /// Net balance at export time, in cents
    pub net_balance_cents: i64,
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> LedgerResult<Self> {
        let snapshot = storage.snapshot()?;

        let dates = || snapshot.transactions.iter().filter_map(|t| t.date);
        let metadata = ExportMetadata {
            transaction_count: snapshot.transactions.len(),
            template_count: snapshot.templates.len(),
            goal_count: snapshot.goals.len(),
            undated_count: snapshot.transactions.iter().filter(|t| t.date.is_none()).count(),
            earliest_transaction: dates().min().map(|d| d.to_string()),
            latest_transaction: dates().max().map(|d| d.to_string()),
            net_balance_cents: LedgerAggregator::net_balance(&snapshot.transactions).cents(),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            transactions: snapshot.transactions,
            templates: snapshot.templates,
            goals: snapshot.goals,
            metadata,
        })
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let mut seen = HashSet::new();
        for txn in &self.transactions {
            if !seen.insert(txn.id) {
                return Err(format!("Duplicate transaction id {}", txn.id));
            }
            txn.validate()
                .map_err(|e| format!("Transaction {}: {}", txn.id, e))?;
        }

        for template in &self.templates {
            template
                .validate()
                .map_err(|e| format!("Template {}: {}", template.id, e))?;
        }

        let mut categories = HashSet::new();
        for goal in &self.goals {
            if !goal.category.accepts_goal() {
                return Err(format!("Goal set on {}, which takes no goals", goal.category));
            }
            if !categories.insert(goal.category) {
                return Err(format!("More than one goal for {}", goal.category));
            }
        }

        Ok(())
    }

    /// Build an export from storage and refuse to hand out an inconsistent one
    pub fn checked_from_storage(storage: &Storage) -> LedgerResult<Self> {
        let export = Self::from_storage(storage)?;
        export.validate().map_err(LedgerError::Export)?;
        Ok(export)
    }
}

/// Export the full ledger to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W, pretty: bool) -> LedgerResult<()> {
    let export = FullExport::checked_from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{Category, Direction, Money, SettlementState};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn seed(storage: &Storage) {
        let rows = [
            (2025, 1, 300000, Direction::Inflow, SettlementState::Settled),
            (2025, 1, 100000, Direction::Outflow, SettlementState::Settled),
            (2025, 2, 50000, Direction::Outflow, SettlementState::Pending),
        ];
        for (y, m, cents, direction, state) in rows {
            let on = NaiveDate::from_ymd_opt(y, m, 10).unwrap();
            let txn = Transaction::new(on, "Row", Money::from_cents(cents), direction, Category::Bills)
                .with_state(state);
            storage.transactions.upsert(txn).unwrap();
        }
        storage
            .templates
            .upsert(RecurringTemplate::new("Rent", Money::from_cents(120000), Category::Housing))
            .unwrap();
        storage
            .goals
            .upsert(BudgetGoal::new(Category::Groceries, Money::from_cents(50000)))
            .unwrap();
    }

    #[test]
    fn test_full_export() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);

        let export = FullExport::from_storage(&storage).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.metadata.transaction_count, 3);
        assert_eq!(export.metadata.template_count, 1);
        assert_eq!(export.metadata.goal_count, 1);
        assert_eq!(export.metadata.earliest_transaction.as_deref(), Some("2025-01-10"));
        assert_eq!(export.metadata.latest_transaction.as_deref(), Some("2025-02-10"));
        assert_eq!(export.metadata.net_balance_cents, 200000);
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);

        let mut output = Vec::new();
        export_full_json(&storage, &mut output, true).unwrap();
        let imported: FullExport = serde_json::from_slice(&output).unwrap();
        assert!(imported.validate().is_ok());

        assert_eq!(imported.transactions.len(), 3);
        assert_eq!(imported.templates[0].description, "Rent");
        assert_eq!(imported.goals[0].category, Category::Groceries);
    }

    #[test]
    fn test_validate_rejects_salary_goal() {
        let (_temp_dir, storage) = create_test_storage();
        let mut export = FullExport::from_storage(&storage).unwrap();
        export
            .goals
            .push(BudgetGoal::new(Category::Salary, Money::from_cents(100)));

        assert!(export.validate().unwrap_err().contains("takes no goals"));
    }

    #[test]
    fn test_export_refuses_goal_on_salary() {
        let (_temp_dir, storage) = create_test_storage();
        // Written straight to the repository, bypassing GoalService checks
        storage
            .goals
            .upsert(BudgetGoal::new(Category::Salary, Money::from_cents(100)))
            .unwrap();

        let mut output = Vec::new();
        let err = export_full_json(&storage, &mut output, false).unwrap_err();

        assert!(matches!(err, LedgerError::Export(_)));
        assert!(output.is_empty());
    }

    #[test]
    fn test_validate_rejects_schema_mismatch() {
        let (_temp_dir, storage) = create_test_storage();
        let mut export = FullExport::from_storage(&storage).unwrap();
        export.schema_version = "0.1.0".into();

        assert!(export.validate().is_err());
    }
}
