//! Monthly Report
//!
//! Groups the ledger by calendar month and carries a running balance.

use std::collections::BTreeMap;

use crate::display::{double_separator, separator};
use crate::models::{Ledger, Money, YearMonth};

/// Totals for one month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyBalance {
    /// The month
    pub month: YearMonth,
    /// Sum of inflows
    pub income: Money,
    /// Sum of outflows (negative)
    pub expenses: Money,
    /// income + expenses
    pub net: Money,
    /// Number of transactions booked in the month
    pub transaction_count: usize,
    /// Running balance after the month's last transaction
    pub balance: Money,
}

/// Per-month summary of a ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyReport {
    /// Balance before the first transaction
    pub opening_balance: Money,
    /// Months in chronological order (only months with transactions)
    pub months: Vec<MonthlyBalance>,
}

impl MonthlyReport {
    /// Generate the monthly report
    pub fn generate(ledger: &Ledger, opening_balance: Money) -> Self {
        let mut by_month: BTreeMap<YearMonth, MonthlyBalance> = BTreeMap::new();

        for txn in ledger {
            let month = txn.month();
            let entry = by_month.entry(month).or_insert(MonthlyBalance {
                month,
                income: Money::zero(),
                expenses: Money::zero(),
                net: Money::zero(),
                transaction_count: 0,
                balance: Money::zero(),
            });

            if txn.amount.is_negative() {
                entry.expenses += txn.amount;
            } else {
                entry.income += txn.amount;
            }
            entry.net += txn.amount;
            entry.transaction_count += 1;
        }

        let mut running = opening_balance;
        let months = by_month
            .into_values()
            .map(|mut month| {
                running += month.net;
                month.balance = running;
                month
            })
            .collect();

        Self {
            opening_balance,
            months,
        }
    }

    /// Balance after the last month
    pub fn closing_balance(&self) -> Money {
        self.months
            .last()
            .map(|m| m.balance)
            .unwrap_or(self.opening_balance)
    }

    /// Look up a single month
    pub fn month(&self, month: YearMonth) -> Option<&MonthlyBalance> {
        self.months.iter().find(|m| m.month == month)
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Monthly Summary\n");
        output.push_str(&double_separator(72));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>13} {:>13} {:>13} {:>6} {:>13}\n",
            "Month", "Income", "Expenses", "Net", "Txns", "Balance"
        ));
        output.push_str(&separator(72));
        output.push('\n');

        for m in &self.months {
            output.push_str(&format!(
                "{:<10} {:>13} {:>13} {:>13} {:>6} {:>13}\n",
                m.month.to_string(),
                m.income.to_string(),
                m.expenses.to_string(),
                m.net.to_string(),
                m.transaction_count,
                m.balance.to_string()
            ));
        }

        output.push_str(&separator(72));
        output.push('\n');
        output.push_str(&format!(
            "Opening balance: {}   Closing balance: {}\n",
            self.opening_balance,
            self.closing_balance()
        ));

        output
    }
}
