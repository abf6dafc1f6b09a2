//! User settings for statement-report
//!
//! Holds what used to be edited by hand before each run: the input and
//! output file names, the statement's regional format, the opening balance
//! and the categorization rule table.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::paths::ConfigPaths;
use crate::error::ReportError;
use crate::models::Money;
use crate::services::categorizer::{default_rules, CategoryRule};

/// Label used when no rule matches a description
pub const UNCATEGORIZED: &str = "Uncategorized";

/// User settings for statement-report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Statement to read when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_file: Option<PathBuf>,

    /// Workbook to write when none is given on the command line
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// CSV field delimiter
    #[serde(default = "default_delimiter")]
    pub csv_delimiter: char,

    /// Preferred date format (strftime); day/month/year by default
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Currency symbol used in terminal output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Account balance before the first statement row
    #[serde(default)]
    pub opening_balance: Money,

    /// Label for transactions no rule matches
    #[serde(default = "default_uncategorized")]
    pub uncategorized_label: String,

    /// Fall back to the bank's own category column before "Uncategorized"
    #[serde(default)]
    pub use_bank_category: bool,

    /// Number of categories shown in the expense/income pie charts
    #[serde(default = "default_top_categories")]
    pub top_categories: usize,

    /// Ordered keyword rules; first match wins
    #[serde(default = "default_rules")]
    pub rules: Vec<CategoryRule>,
}

fn default_output_file() -> PathBuf {
    PathBuf::from("my_financial_report.xlsx")
}

fn default_delimiter() -> char {
    ','
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_uncategorized() -> String {
    UNCATEGORIZED.to_string()
}

fn default_top_categories() -> usize {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_file: None,
            output_file: default_output_file(),
            csv_delimiter: default_delimiter(),
            date_format: default_date_format(),
            currency_symbol: default_currency(),
            opening_balance: Money::zero(),
            uncategorized_label: default_uncategorized(),
            use_bank_category: false,
            top_categories: default_top_categories(),
            rules: default_rules(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_default(paths: &ConfigPaths) -> Result<Self, ReportError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            debug!(path = %settings_path.display(), "loading settings");
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                ReportError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ReportError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            debug!(path = %settings_path.display(), "no settings file, using defaults");
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ConfigPaths) -> Result<(), ReportError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            ReportError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            ReportError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ReportError> {
        if !self.csv_delimiter.is_ascii() {
            return Err(ReportError::Config(format!(
                "CSV delimiter must be a single ASCII character, got '{}'",
                self.csv_delimiter
            )));
        }
        if self.top_categories == 0 {
            return Err(ReportError::Config("top_categories must be at least 1".into()));
        }
        if self.uncategorized_label.trim().is_empty() {
            return Err(ReportError::Config("uncategorized_label must not be empty".into()));
        }
        if let Some(rule) = self.rules.iter().find(|r| r.keyword.trim().is_empty()) {
            return Err(ReportError::Config(format!(
                "Rule for category '{}' has an empty keyword",
                rule.category
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.output_file, PathBuf::from("my_financial_report.xlsx"));
        assert_eq!(settings.csv_delimiter, ',');
        assert_eq!(settings.date_format, "%d/%m/%Y");
        assert_eq!(settings.top_categories, 5);
        assert!(!settings.rules.is_empty());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ConfigPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_default(&paths).unwrap();
        assert_eq!(settings.uncategorized_label, UNCATEGORIZED);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ConfigPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.csv_delimiter = ';';
        settings.opening_balance = Money::from_cents(150000);
        settings.rules = vec![CategoryRule::new("esselunga", "Groceries")];

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_default(&paths).unwrap();
        assert_eq!(loaded.csv_delimiter, ';');
        assert_eq!(loaded.opening_balance.cents(), 150000);
        assert_eq!(loaded.rules, vec![CategoryRule::new("esselunga", "Groceries")]);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ConfigPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"use_bank_category": true}"#).unwrap();

        let loaded = Settings::load_or_default(&paths).unwrap();
        assert!(loaded.use_bank_category);
        assert_eq!(loaded.top_categories, 5);
        assert_eq!(loaded.rules, default_rules());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ConfigPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"top_categories": 0}"#).unwrap();

        let err = Settings::load_or_default(&paths).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ConfigPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{ not json").unwrap();

        assert!(Settings::load_or_default(&paths).is_err());
    }
}
