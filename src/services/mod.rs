//! Pipeline stages for statement-report
//!
//! Each stage consumes the full output of the previous one:
//! loader → normalizer → categorizer. Aggregation lives in `reports`.

pub mod categorizer;
pub mod loader;
pub mod normalizer;

pub use categorizer::{default_rules, Categorizer, CategoryRule};
pub use loader::{
    ColumnMapping, LoadedStatement, RowIssue, StatementFormat, StatementLoader, StatementRow,
};
pub use normalizer::{normalize, Normalized};
