//! The ledger: every normalized transaction in chronological order

use chrono::NaiveDate;

use super::money::Money;
use super::transaction::Transaction;

/// Chronologically ordered list of transactions
///
/// Sorting is stable, so transactions booked on the same day keep the order
/// they had in the statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    /// Build a ledger, sorting by booking date
    pub fn new(mut transactions: Vec<Transaction>) -> Self {
        transactions.sort_by_key(|t| t.date);
        Self { transactions }
    }

    /// All transactions in date order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sum of every amount
    pub fn total(&self) -> Money {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    /// First and last booking dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.transactions.first(), self.transactions.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// Apply a per-transaction mapping and return the resulting ledger.
    ///
    /// Used by the categorizer; order is preserved.
    pub fn map<F>(self, f: F) -> Self
    where
        F: FnMut(Transaction) -> Transaction,
    {
        Self {
            transactions: self.transactions.into_iter().map(f).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Polarity;

    fn txn(day: u32, cents: i64, row: usize) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            format!("row {}", row),
            Money::from_cents(cents),
            Polarity::of(Money::from_cents(cents)),
            row,
        )
    }

    #[test]
    fn test_sorted_by_date_stable() {
        let ledger = Ledger::new(vec![txn(12, -100, 2), txn(11, -50, 3), txn(12, 200, 4)]);
        let rows: Vec<usize> = ledger.iter().map(|t| t.row_number).collect();
        assert_eq!(rows, vec![3, 2, 4]);
    }

    #[test]
    fn test_total_and_range() {
        let ledger = Ledger::new(vec![txn(12, -100, 2), txn(1, 250, 3)]);
        assert_eq!(ledger.total().cents(), 150);
        let (start, end) = ledger.date_range().unwrap();
        assert_eq!(start.to_string(), "2025-03-01");
        assert_eq!(end.to_string(), "2025-03-12");
    }

    #[test]
    fn test_empty() {
        let ledger = Ledger::default();
        assert!(ledger.is_empty());
        assert!(ledger.date_range().is_none());
        assert!(ledger.total().is_zero());
    }
}
