//! Export module for statement-report
//!
//! Renders a [`crate::reports::StatementReport`] to an Excel workbook.

pub mod xlsx;

pub use xlsx::{date_to_excel_serial, XlsxReporter};
