//! Normalizer
//!
//! Merges the debit and credit columns of each statement row into one
//! signed amount and builds the chronologically ordered ledger.

use tracing::{info, warn};

use crate::models::{Ledger, Money, Polarity, Transaction};

use super::loader::{RowIssue, StatementRow};

/// Output of normalization
#[derive(Debug, Clone)]
pub struct Normalized {
    /// Every row that produced exactly one signed amount, in date order
    pub ledger: Ledger,
    /// Rows dropped because their amount columns were inconsistent
    pub dropped: Vec<RowIssue>,
}

/// Merge parsed rows into a ledger
///
/// A row must have exactly one of debit or credit populated. A row with
/// both, or with neither (and no single amount column to fall back on), is
/// dropped and logged so that it never reaches any total.
pub fn normalize(rows: Vec<StatementRow>) -> Normalized {
    let mut transactions = Vec::with_capacity(rows.len());
    let mut dropped = Vec::new();

    for row in rows {
        match merge_amount(&row) {
            Ok((amount, source)) => {
                let mut txn = Transaction::new(
                    row.date,
                    row.description,
                    amount,
                    source,
                    row.row_number,
                );
                txn.value_date = row.value_date;
                txn.bank_category = row.bank_category;
                txn.tag = row.tag;
                transactions.push(txn);
            }
            Err(reason) => {
                warn!(row = row.row_number, %reason, "dropping row");
                dropped.push(RowIssue {
                    row_number: row.row_number,
                    reason,
                });
            }
        }
    }

    let ledger = Ledger::new(transactions);
    info!(
        transactions = ledger.len(),
        dropped = dropped.len(),
        "ledger built"
    );

    Normalized { ledger, dropped }
}

/// Resolve a row's signed amount and the column it came from
///
/// A literal zero counts as an empty cell: some exports fill the unused
/// column with `0,00`.
fn merge_amount(row: &StatementRow) -> Result<(Money, Polarity), String> {
    let non_zero = |m: Option<Money>| m.filter(|m| !m.is_zero());

    match (non_zero(row.debit), non_zero(row.credit)) {
        (Some(debit), Some(credit)) => Err(format!(
            "Both debit ({}) and credit ({}) populated",
            debit, credit
        )),
        (Some(debit), None) => Ok((-debit.abs(), Polarity::Debit)),
        (None, Some(credit)) => Ok((credit.abs(), Polarity::Credit)),
        (None, None) => match row.amount {
            Some(amount) if !amount.is_zero() => Ok((amount, Polarity::of(amount))),
            _ => Err("Neither debit nor credit populated".to_string()),
        },
    }
}
