//! Reports module for statement-report
//!
//! The aggregation stage: monthly balances, category totals, income sources
//! and headline statistics, all derived from a categorized ledger.

pub mod category;
pub mod income;
pub mod monthly;
pub mod stats;

pub use category::{BreakdownEntry, CategoryBreakdown, CategoryReport, CategoryTotal};
pub use income::IncomeSourcesReport;
pub use monthly::{MonthlyBalance, MonthlyReport};
pub use stats::{BasicStats, StatValue};

use crate::config::Settings;
use crate::models::Ledger;

/// Every aggregate the workbook needs, computed once
#[derive(Debug, Clone)]
pub struct StatementReport {
    pub ledger: Ledger,
    pub monthly: MonthlyReport,
    pub categories: CategoryReport,
    pub expenses: CategoryBreakdown,
    pub income_sources: IncomeSourcesReport,
    pub stats: BasicStats,
    /// Number of categories shown in the pie charts
    pub top_categories: usize,
    /// Label used for uncategorized transactions
    pub uncategorized_label: String,
}

impl StatementReport {
    /// Aggregate a categorized ledger
    pub fn build(ledger: Ledger, settings: &Settings) -> Self {
        let label = settings.uncategorized_label.as_str();

        Self {
            monthly: MonthlyReport::generate(&ledger, settings.opening_balance),
            categories: CategoryReport::generate(&ledger, label),
            expenses: CategoryBreakdown::expenses(&ledger, label),
            income_sources: IncomeSourcesReport::generate(&ledger, label),
            stats: BasicStats::generate(&ledger, label),
            top_categories: settings.top_categories,
            uncategorized_label: label.to_string(),
            ledger,
        }
    }
}
