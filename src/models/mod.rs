//! Core data models for statement-report
//!
//! This module contains the data structures that flow through the pipeline:
//! money amounts, calendar months, transactions and the ledger.

pub mod ledger;
pub mod money;
pub mod period;
pub mod transaction;

pub use ledger::Ledger;
pub use money::{Money, MoneyParseError};
pub use period::YearMonth;
pub use transaction::{Polarity, Transaction};
