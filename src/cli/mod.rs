//! CLI command handlers
//!
//! Bridges the clap argument parsing with the pipeline.

pub mod report;

pub use report::{handle_report_command, resolve_settings, ReportArgs};
