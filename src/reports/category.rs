//! Category Report
//!
//! Per-category totals over the whole ledger, plus the expense and income
//! breakdowns that feed the pie charts.

use std::collections::BTreeMap;

use crate::display::{format_bar, format_percentage, percentage_of, separator, truncate};
use crate::models::{Ledger, Money, Transaction};

/// Totals for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    /// Category name
    pub category: String,
    /// Signed sum of the category's transactions
    pub total: Money,
    /// Number of transactions
    pub transaction_count: usize,
}

/// Signed totals for every category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    /// Ordered by total ascending (largest spending first), ties by name
    pub categories: Vec<CategoryTotal>,
    /// Sum over all categories; equals the ledger total
    pub total: Money,
}

impl CategoryReport {
    /// Generate the category report
    ///
    /// Transactions without a category are counted under `uncategorized`.
    pub fn generate(ledger: &Ledger, uncategorized: &str) -> Self {
        let mut by_category: BTreeMap<&str, (Money, usize)> = BTreeMap::new();

        for txn in ledger {
            let entry = by_category
                .entry(txn.category_or(uncategorized))
                .or_insert((Money::zero(), 0));
            entry.0 += txn.amount;
            entry.1 += 1;
        }

        let mut categories: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category, (total, transaction_count))| CategoryTotal {
                category: category.to_string(),
                total,
                transaction_count,
            })
            .collect();

        // BTreeMap already yields names in order, so a stable sort keeps ties by name
        categories.sort_by_key(|c| c.total);

        let total = categories.iter().map(|c| c.total).sum();
        Self { categories, total }
    }

    /// Look up one category
    pub fn get(&self, category: &str) -> Option<&CategoryTotal> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("{:<30} {:>13} {:>6}\n", "Category", "Total", "Txns"));
        output.push_str(&separator(51));
        output.push('\n');

        for c in &self.categories {
            output.push_str(&format!(
                "{:<30} {:>13} {:>6}\n",
                truncate(&c.category, 30),
                c.total.to_string(),
                c.transaction_count
            ));
        }

        output.push_str(&separator(51));
        output.push('\n');
        output.push_str(&format!("{:<30} {:>13}\n", "TOTAL", self.total.to_string()));

        output
    }
}

/// One line of a one-sided breakdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownEntry {
    /// Category name
    pub category: String,
    /// Absolute total
    pub total: Money,
    /// Number of transactions
    pub transaction_count: usize,
}

/// Expenses-only or income-only totals by category, largest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBreakdown {
    pub entries: Vec<BreakdownEntry>,
    /// Absolute sum of all entries
    pub total: Money,
}

impl CategoryBreakdown {
    /// Outflows by category, as positive amounts
    pub fn expenses(ledger: &Ledger, uncategorized: &str) -> Self {
        Self::collect(ledger, uncategorized, Transaction::is_expense)
    }

    /// Inflows by category
    pub fn income(ledger: &Ledger, uncategorized: &str) -> Self {
        Self::collect(ledger, uncategorized, Transaction::is_income)
    }

    fn collect<F>(ledger: &Ledger, uncategorized: &str, include: F) -> Self
    where
        F: Fn(&Transaction) -> bool,
    {
        let mut by_category: BTreeMap<&str, (Money, usize)> = BTreeMap::new();

        for txn in ledger.iter().filter(|t| include(t)) {
            let entry = by_category
                .entry(txn.category_or(uncategorized))
                .or_insert((Money::zero(), 0));
            entry.0 += txn.amount.abs();
            entry.1 += 1;
        }

        let mut entries: Vec<BreakdownEntry> = by_category
            .into_iter()
            .map(|(category, (total, transaction_count))| BreakdownEntry {
                category: category.to_string(),
                total,
                transaction_count,
            })
            .collect();

        entries.sort_by(|a, b| b.total.cmp(&a.total));

        let total = entries.iter().map(|e| e.total).sum();
        Self { entries, total }
    }

    /// The `n` largest entries
    pub fn top(&self, n: usize) -> &[BreakdownEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// The largest entry, if any
    pub fn largest(&self) -> Option<&BreakdownEntry> {
        self.entries.first()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Format the breakdown with share bars for terminal display
    pub fn format_terminal(&self, title: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", title));
        output.push_str(&separator(70));
        output.push('\n');

        let max = self.largest().map(|e| e.total.to_f64()).unwrap_or(0.0);
        for e in &self.entries {
            output.push_str(&format!(
                "{:<28} {:>12} {:>6} {}\n",
                truncate(&e.category, 28),
                e.total.to_string(),
                format_percentage(percentage_of(e.total.cents(), self.total.cents())),
                format_bar(e.total.to_f64(), max, 20)
            ));
        }

        output
    }
}
