//! Income Sources Report
//!
//! Where the money came from: inflows grouped by category.

use crate::models::{Ledger, Money};

use super::category::{BreakdownEntry, CategoryBreakdown};

/// Inflows by source, largest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeSourcesReport {
    breakdown: CategoryBreakdown,
}

impl IncomeSourcesReport {
    /// Generate the income sources report
    pub fn generate(ledger: &Ledger, uncategorized: &str) -> Self {
        Self {
            breakdown: CategoryBreakdown::income(ledger, uncategorized),
        }
    }

    /// Sources in descending order of total
    pub fn sources(&self) -> &[BreakdownEntry] {
        &self.breakdown.entries
    }

    /// Total income across all sources
    pub fn total(&self) -> Money {
        self.breakdown.total
    }

    /// Underlying breakdown (used for the income pie chart)
    pub fn breakdown(&self) -> &CategoryBreakdown {
        &self.breakdown
    }

    pub fn is_empty(&self) -> bool {
        self.breakdown.is_empty()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        if self.is_empty() {
            return "Income Sources\nNo income data\n".to_string();
        }
        self.breakdown.format_terminal("Income Sources")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Polarity, Transaction};
    use chrono::NaiveDate;

    fn txn(cents: i64, category: &str) -> Transaction {
        let amount = Money::from_cents(cents);
        Transaction::new(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            "test",
            amount,
            Polarity::of(amount),
            0,
        )
        .with_category(category)
    }

    #[test]
    fn test_only_inflows_are_counted() {
        let ledger = Ledger::new(vec![
            txn(250000, "Salary"),
            txn(4000, "Refunds"),
            txn(250000, "Salary"),
            txn(-9000, "Groceries"),
        ]);
        let report = IncomeSourcesReport::generate(&ledger, "Uncategorized");

        assert_eq!(report.sources().len(), 2);
        assert_eq!(report.sources()[0].category, "Salary");
        assert_eq!(report.sources()[0].total.cents(), 500000);
        assert_eq!(report.sources()[0].transaction_count, 2);
        assert_eq!(report.total().cents(), 504000);
    }

    #[test]
    fn test_no_income() {
        let ledger = Ledger::new(vec![txn(-100, "Groceries")]);
        let report = IncomeSourcesReport::generate(&ledger, "Uncategorized");
        assert!(report.is_empty());
        assert!(report.format_terminal().contains("No income data"));
    }
}
