//! Path management for statement-report
//!
//! ## Path Resolution Order
//!
//! 1. `STATEMENT_REPORT_CONFIG` environment variable (if set), naming the
//!    settings file itself
//! 2. The platform config directory from `directories`
//!    (`~/.config/statement-report` on Linux,
//!    `~/Library/Application Support/statement-report` on macOS,
//!    `%APPDATA%\statement-report\config` on Windows)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::ReportError;

/// Environment variable overriding the settings file location
pub const CONFIG_ENV_VAR: &str = "STATEMENT_REPORT_CONFIG";

/// Manages the paths used by statement-report
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Directory holding the settings file
    base_dir: PathBuf,
    /// Settings file name inside `base_dir`
    file_name: String,
}

impl ConfigPaths {
    /// Resolve paths from the environment and platform conventions
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, ReportError> {
        if let Ok(custom) = std::env::var(CONFIG_ENV_VAR) {
            return Ok(Self::for_file(Path::new(&custom)));
        }

        let dirs = ProjectDirs::from("", "", "statement-report").ok_or_else(|| {
            ReportError::Config("Could not determine a home directory".into())
        })?;

        Ok(Self::with_base_dir(dirs.config_dir().to_path_buf()))
    }

    /// Use an explicit settings file
    pub fn for_file(file: &Path) -> Self {
        let base_dir = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "config.json".to_string());
        Self {
            base_dir,
            file_name,
        }
    }

    /// Create ConfigPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            file_name: "config.json".to_string(),
        }
    }

    /// Get the config directory
    pub fn config_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join(&self.file_name)
    }

    /// Ensure the config directory exists
    pub fn ensure_directories(&self) -> Result<(), ReportError> {
        std::fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }
}
