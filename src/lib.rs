//! statement-report - bank statement to Excel report
//!
//! Reads a bank's exported statement (CSV or spreadsheet, regional number
//! and date formats), merges the separate debit and credit columns into one
//! signed ledger, categorizes each transaction with an ordered keyword rule
//! table and writes an Excel workbook with summary sheets and charts.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Settings and path management
//! - `error`: Custom error types
//! - `models`: Money, transactions and the ledger
//! - `services`: Loading, normalizing and categorizing
//! - `reports`: Monthly, category, income and statistics aggregates
//! - `export`: Excel workbook writer
//! - `display`: Terminal formatting helpers
//! - `pipeline`: The end-to-end run
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use statement_report::config::Settings;
//! use statement_report::pipeline;
//!
//! let settings = Settings::default();
//! let summary = pipeline::run("statement.csv".as_ref(), "report.xlsx".as_ref(), &settings)?;
//! println!("{} transactions", summary.transaction_count());
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod reports;
pub mod services;

pub use error::{ReportError, ReportResult};
