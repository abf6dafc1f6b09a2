//! Transaction model
//!
//! A single ledger entry produced by merging a statement row's debit or
//! credit column into one signed amount.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::period::YearMonth;

/// Which statement column a transaction came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Outflow ("Dare")
    Debit,
    /// Inflow ("Avere")
    Credit,
}

impl Polarity {
    /// Polarity implied by the sign of an amount (zero counts as credit)
    pub fn of(amount: Money) -> Self {
        if amount.is_negative() {
            Self::Debit
        } else {
            Self::Credit
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debit => write!(f, "Debit"),
            Self::Credit => write!(f, "Credit"),
        }
    }
}

/// A normalized ledger transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Booking date
    pub date: NaiveDate,

    /// Value date, when the statement carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_date: Option<NaiveDate>,

    /// Statement description
    pub description: String,

    /// Signed amount (negative for outflow)
    pub amount: Money,

    /// Category assigned by the categorizer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Column the amount came from
    pub source: Polarity,

    /// Category supplied by the bank export, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_category: Option<String>,

    /// Free-form tag supplied by the bank export, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// 1-based row number in the source file
    pub row_number: usize,
}

impl Transaction {
    /// Create an uncategorized transaction
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
        source: Polarity,
        row_number: usize,
    ) -> Self {
        Self {
            date,
            value_date: None,
            description: description.into(),
            amount,
            category: None,
            source,
            bank_category: None,
            tag: None,
            row_number,
        }
    }

    /// Return a copy with the given category assigned
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Month the transaction was booked in
    pub fn month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }

    /// Check if this is an inflow
    pub fn is_income(&self) -> bool {
        self.amount.is_positive()
    }

    /// Check if this is an outflow
    pub fn is_expense(&self) -> bool {
        self.amount.is_negative()
    }

    /// Category label, falling back to the given default when unassigned
    pub fn category_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.category.as_deref().unwrap_or(default)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%d/%m/%Y"),
            self.description,
            self.amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
            "Pagamento POS",
            Money::from_cents(-10000),
            Polarity::Debit,
            2,
        )
    }

    #[test]
    fn test_new_transaction() {
        let txn = sample();
        assert!(txn.is_expense());
        assert!(!txn.is_income());
        assert!(txn.category.is_none());
        assert_eq!(txn.month().to_string(), "2025-03");
    }

    #[test]
    fn test_with_category() {
        let txn = sample().with_category("Card Payments");
        assert_eq!(txn.category_or("Uncategorized"), "Card Payments");
        assert_eq!(sample().category_or("Uncategorized"), "Uncategorized");
    }

    #[test]
    fn test_polarity_of_amount() {
        assert_eq!(Polarity::of(Money::from_cents(-1)), Polarity::Debit);
        assert_eq!(Polarity::of(Money::from_cents(1)), Polarity::Credit);
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "12/03/2025 Pagamento POS -100.00");
    }

    #[test]
    fn test_serialization() {
        let txn = sample();
        let json = serde_json::to_string(&txn).unwrap();
        assert!(json.contains("\"source\":\"debit\""));
        assert!(!json.contains("category"));
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(txn, back);
    }
}
