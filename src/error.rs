//! Custom error types for statement-report
//!
//! This module defines the error hierarchy for the pipeline using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for statement-report operations
#[derive(Error, Debug)]
pub enum ReportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Input file has an extension we cannot read
    #[error("Unsupported statement format: {0} (expected .csv, .xlsx, .xlsm, .xls or .ods)")]
    UnsupportedFormat(String),

    /// A required column is absent from the statement header
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// A statement row could not be parsed
    #[error("Row {row}: {message}")]
    Parse { row: usize, message: String },

    /// Errors raised while reading a spreadsheet statement
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Errors raised while writing the output workbook
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ReportError {
    /// Create a parse error for a given source row
    pub fn parse(row: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            row,
            message: message.into(),
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<calamine::Error> for ReportError {
    fn from(err: calamine::Error) -> Self {
        Self::Spreadsheet(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Workbook(err.to_string())
    }
}

/// Result type alias for statement-report operations
pub type ReportResult<T> = Result<T, ReportError>;
