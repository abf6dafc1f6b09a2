//! Configuration module for statement-report
//!
//! This module provides configuration management including:
//! - Platform-aware settings file resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::ConfigPaths;
pub use settings::Settings;
