//! Basic statistics
//!
//! Headline numbers for the statement: totals, averages, medians and the
//! biggest expense and income categories.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Ledger, Money};

use super::category::CategoryBreakdown;

/// Shown where a category would be but there is no data
pub const NOT_AVAILABLE: &str = "N/A";

/// A single statistic's value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatValue {
    Amount(Money),
    Count(usize),
    Text(String),
}

impl StatValue {
    /// Render with a currency symbol for amounts
    pub fn display(&self, currency_symbol: &str) -> String {
        match self {
            Self::Amount(m) => m.format_with_symbol(currency_symbol),
            Self::Count(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Headline statistics for a ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicStats {
    pub total_income: Money,
    /// Negative
    pub total_expenses: Money,
    pub balance: Money,
    /// Mean outflow (negative), zero when there are none
    pub average_expense: Money,
    /// Mean inflow, zero when there are none
    pub average_income: Money,
    pub median_expense: Money,
    pub median_income: Money,
    pub top_expense_category: Option<String>,
    pub top_income_category: Option<String>,
    pub total_transactions: usize,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

impl BasicStats {
    /// Compute the statistics
    pub fn generate(ledger: &Ledger, uncategorized: &str) -> Self {
        let mut expenses: Vec<i64> = Vec::new();
        let mut income: Vec<i64> = Vec::new();
        for txn in ledger {
            if txn.is_expense() {
                expenses.push(txn.amount.cents());
            } else if txn.is_income() {
                income.push(txn.amount.cents());
            }
        }

        let total_expenses = Money::from_cents(expenses.iter().sum());
        let total_income = Money::from_cents(income.iter().sum());

        Self {
            total_income,
            total_expenses,
            balance: total_income + total_expenses,
            average_expense: mean(&expenses),
            average_income: mean(&income),
            median_expense: median(&mut expenses),
            median_income: median(&mut income),
            top_expense_category: CategoryBreakdown::expenses(ledger, uncategorized)
                .largest()
                .map(|e| e.category.clone()),
            top_income_category: CategoryBreakdown::income(ledger, uncategorized)
                .largest()
                .map(|e| e.category.clone()),
            total_transactions: ledger.len(),
        }
    }

    /// Metric names with their values, in display order
    pub fn rows(&self) -> Vec<(&'static str, StatValue)> {
        let category = |c: &Option<String>| {
            StatValue::Text(c.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()))
        };

        vec![
            ("Total Income", StatValue::Amount(self.total_income)),
            ("Total Expenses", StatValue::Amount(self.total_expenses)),
            ("Balance", StatValue::Amount(self.balance)),
            ("Average Expense", StatValue::Amount(self.average_expense)),
            ("Average Income", StatValue::Amount(self.average_income)),
            ("Median Expense", StatValue::Amount(self.median_expense)),
            ("Median Income", StatValue::Amount(self.median_income)),
            ("Top Expense Category", category(&self.top_expense_category)),
            ("Top Income Category", category(&self.top_income_category)),
            ("Total Transactions", StatValue::Count(self.total_transactions)),
        ]
    }

    /// Format the statistics as a table for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let rows: Vec<StatRow> = self
            .rows()
            .into_iter()
            .map(|(metric, value)| StatRow {
                metric,
                value: value.display(currency_symbol),
            })
            .collect();

        Table::new(rows).with(Style::rounded()).to_string()
    }
}

/// Mean in cents, rounded to the nearest cent; zero for no values
fn mean(values: &[i64]) -> Money {
    if values.is_empty() {
        return Money::zero();
    }
    let sum: i64 = values.iter().sum();
    Money::from_cents((sum as f64 / values.len() as f64).round() as i64)
}

/// Median in cents, averaging the middle pair for even counts; zero for no values
fn median(values: &mut [i64]) -> Money {
    if values.is_empty() {
        return Money::zero();
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    let cents = if values.len() % 2 == 0 {
        ((values[mid - 1] + values[mid]) as f64 / 2.0).round() as i64
    } else {
        values[mid]
    };
    Money::from_cents(cents)
}
