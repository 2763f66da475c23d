//! Recurring template repository for JSON storage
//!
//! Manages loading and saving recurring templates to templates.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::{RecurringTemplate, TemplateId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TemplateData {
    templates: Vec<RecurringTemplate>,
}

/// Repository for recurring template persistence
pub struct TemplateRepository {
    path: PathBuf,
    data: RwLock<HashMap<TemplateId, RecurringTemplate>>,
}

impl TemplateRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: TemplateData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *data = file_data
            .templates
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        Ok(())
    }

    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        self.persist(data.values())
    }

    fn persist<'a>(
        &self,
        templates: impl Iterator<Item = &'a RecurringTemplate>,
    ) -> Result<(), LedgerError> {
        let mut templates: Vec<RecurringTemplate> = templates.cloned().collect();
        templates.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        write_json_atomic(&self.path, &TemplateData { templates })
    }

    pub fn get(&self, id: TemplateId) -> Result<Option<RecurringTemplate>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all templates, sorted by description
    pub fn get_all(&self) -> Result<Vec<RecurringTemplate>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut templates: Vec<_> = data.values().cloned().collect();
        templates.sort_by(|a, b| {
            a.description
                .to_lowercase()
                .cmp(&b.description.to_lowercase())
        });
        Ok(templates)
    }

    /// Insert or update a template, persisting before memory changes
    pub fn upsert(&self, template: RecurringTemplate) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        self.persist(
            data.values()
                .filter(|t| t.id != template.id)
                .chain(std::iter::once(&template)),
        )?;

        data.insert(template.id, template);
        Ok(())
    }

    pub fn delete(&self, id: TemplateId) -> Result<Option<RecurringTemplate>, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if !data.contains_key(&id) {
            return Ok(None);
        }

        self.persist(data.values().filter(|t| t.id != id))?;
        Ok(data.remove(&id))
    }

    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TemplateRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = TemplateRepository::new(temp_dir.path().join("templates.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_upsert_save_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let template = RecurringTemplate::new("Rent", Money::from_cents(150000), Category::Housing);
        let id = template.id;
        repo.upsert(template).unwrap();

        let repo2 = TemplateRepository::new(temp_dir.path().join("templates.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 1);
        assert_eq!(repo2.get(id).unwrap().unwrap().description, "Rent");
    }

    #[test]
    fn test_get_all_sorted_by_description() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.upsert(RecurringTemplate::new("water", Money::from_cents(100), Category::Bills))
            .unwrap();
        repo.upsert(RecurringTemplate::new("Internet", Money::from_cents(100), Category::Bills))
            .unwrap();

        let names: Vec<_> = repo
            .get_all()
            .unwrap()
            .into_iter()
            .map(|t| t.description)
            .collect();
        assert_eq!(names, vec!["Internet", "water"]);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let template = RecurringTemplate::new("Gym", Money::from_cents(8000), Category::Leisure);
        let id = template.id;
        repo.upsert(template).unwrap();

        assert!(repo.delete(id).unwrap().is_some());
        assert!(repo.delete(id).unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
