//! User settings for the household ledger
//!
//! Manages display preferences, the export date format and whether
//! mutations are written to the audit log.

use std::fmt::Write;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format for terminal output (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Date format written into CSV exports
    #[serde(default = "default_export_date_format")]
    pub export_date_format: String,

    /// Whether mutations are appended to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_export_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            export_date_format: default_export_date_format(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

            let mut settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;
            settings.repair_date_formats();

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Change the display date format
    pub fn set_date_format(&mut self, format: &str) -> Result<(), LedgerError> {
        check_date_format(format)?;
        self.date_format = format.to_string();
        Ok(())
    }

    /// Change the CSV export date format
    ///
    /// The format must identify a full date, since exported files are read back.
    pub fn set_export_date_format(&mut self, format: &str) -> Result<(), LedgerError> {
        check_export_date_format(format)?;
        self.export_date_format = format.to_string();
        Ok(())
    }

    /// Replace unusable formats from a hand-edited file with the defaults
    fn repair_date_formats(&mut self) {
        if let Err(e) = check_date_format(&self.date_format) {
            log::warn!("{}; using {}", e, default_date_format());
            self.date_format = default_date_format();
        }
        if let Err(e) = check_export_date_format(&self.export_date_format) {
            log::warn!("{}; using {}", e, default_export_date_format());
            self.export_date_format = default_export_date_format();
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

fn sample_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 31).unwrap_or(NaiveDate::MIN)
}

/// Render the sample date, failing on format strings chrono cannot render
fn check_date_format(format: &str) -> Result<String, LedgerError> {
    let mut rendered = String::new();
    write!(rendered, "{}", sample_date().format(format))
        .map_err(|_| LedgerError::Config(format!("Invalid date format '{}'", format)))?;
    Ok(rendered)
}

fn check_export_date_format(format: &str) -> Result<(), LedgerError> {
    let rendered = check_date_format(format)?;
    match NaiveDate::parse_from_str(&rendered, format) {
        Ok(date) if date == sample_date() => Ok(()),
        _ => Err(LedgerError::Config(format!(
            "Export date format '{}' does not read back as a full date",
            format
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.export_date_format, "%d/%m/%Y");
        assert!(settings.audit_enabled);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_symbol = "R$ ".to_string();
        settings.audit_enabled = false;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "R$ ");
        assert!(!loaded.audit_enabled);
        assert!(paths.is_initialized());
    }

    #[test]
    fn test_rejects_unrenderable_format() {
        let mut settings = Settings::default();

        assert!(settings.set_date_format("%Q").is_err());
        assert!(settings.set_export_date_format("%Q").is_err());
        assert_eq!(settings.date_format, "%Y-%m-%d");

        settings.set_date_format("%d %b %Y").unwrap();
        assert_eq!(settings.date_format, "%d %b %Y");
    }

    #[test]
    fn test_export_format_must_read_back() {
        let mut settings = Settings::default();

        // Fine for display, but a year-less export cannot be read back
        settings.set_date_format("%d/%m").unwrap();
        assert!(settings.set_export_date_format("%d/%m").is_err());
        assert_eq!(settings.export_date_format, "%d/%m/%Y");

        settings.set_export_date_format("%Y.%m.%d").unwrap();
        assert_eq!(settings.export_date_format, "%Y.%m.%d");
    }

    #[test]
    fn test_load_repairs_bad_formats() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"date_format": "%Q", "export_date_format": "%d/%m"}"#,
        )
        .unwrap();

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.date_format, "%Y-%m-%d");
        assert_eq!(settings.export_date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "€"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.date_format, "%Y-%m-%d");
        assert_eq!(settings.schema_version, 1);
    }
}
