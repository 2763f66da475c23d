//! Budget goal repository for JSON storage
//!
//! Goals are keyed by category; setting a goal for a category replaces
//! whatever limit it had before.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::{BudgetGoal, Category};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GoalData {
    goals: Vec<BudgetGoal>,
}

/// Repository for budget goal persistence
pub struct GoalRepository {
    path: PathBuf,
    data: RwLock<BTreeMap<Category, BudgetGoal>>,
}

impl GoalRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: GoalData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        // Later entries win if a file lists a category twice
        *data = file_data
            .goals
            .into_iter()
            .map(|g| (g.category, g))
            .collect();

        Ok(())
    }

    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let goals: Vec<BudgetGoal> = data.values().copied().collect();
        write_json_atomic(&self.path, &GoalData { goals })
    }

    pub fn get(&self, category: Category) -> Result<Option<BudgetGoal>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&category).copied())
    }

    /// All goals in category order
    pub fn get_all(&self) -> Result<Vec<BudgetGoal>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().copied().collect())
    }

    /// Set the goal for its category, persisting before memory changes
    pub fn upsert(&self, goal: BudgetGoal) -> Result<Option<BudgetGoal>, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut next = data.clone();
        let previous = next.insert(goal.category, goal);
        let goals: Vec<BudgetGoal> = next.values().copied().collect();
        write_json_atomic(&self.path, &GoalData { goals })?;

        *data = next;
        Ok(previous)
    }

    pub fn delete(&self, category: Category) -> Result<Option<BudgetGoal>, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if !data.contains_key(&category) {
            return Ok(None);
        }

        let goals: Vec<BudgetGoal> = data
            .values()
            .filter(|g| g.category != category)
            .copied()
            .collect();
        write_json_atomic(&self.path, &GoalData { goals })?;

        Ok(data.remove(&category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_upsert_replaces_existing_goal() {
        let temp_dir = TempDir::new().unwrap();
        let repo = GoalRepository::new(temp_dir.path().join("goals.json"));
        repo.load().unwrap();

        let first = BudgetGoal::new(Category::Groceries, Money::from_cents(50000));
        assert_eq!(repo.upsert(first).unwrap(), None);

        let second = BudgetGoal::new(Category::Groceries, Money::from_cents(80000));
        assert_eq!(repo.upsert(second).unwrap(), Some(first));
        assert_eq!(repo.get_all().unwrap(), vec![second]);
    }

    #[test]
    fn test_save_reload_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("goals.json");
        let repo = GoalRepository::new(path.clone());
        repo.load().unwrap();

        repo.upsert(BudgetGoal::new(Category::Leisure, Money::from_cents(20000)))
            .unwrap();
        repo.upsert(BudgetGoal::new(Category::Bills, Money::from_cents(40000)))
            .unwrap();

        let reloaded = GoalRepository::new(path);
        reloaded.load().unwrap();
        let categories: Vec<_> = reloaded
            .get_all()
            .unwrap()
            .into_iter()
            .map(|g| g.category)
            .collect();
        assert_eq!(categories, vec![Category::Leisure, Category::Bills]);

        assert!(reloaded.delete(Category::Leisure).unwrap().is_some());
        assert!(reloaded.get(Category::Leisure).unwrap().is_none());
        assert!(reloaded.delete(Category::Leisure).unwrap().is_none());
    }
}
