//! Calendar month representation
//!
//! The aggregation stage groups the ledger by `YYYY-MM`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month (e.g., "2025-03")
///
/// Ordering is chronological, so a `BTreeMap<YearMonth, _>` iterates months
/// in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Create a month, validating the month number
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month a date falls in
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_and_display() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        let month = YearMonth::of(date);
        assert_eq!(month.to_string(), "2025-03");
        assert_eq!(month, YearMonth::new(2025, 3).unwrap());
        assert_ne!(month, YearMonth::of(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()));
        assert!(YearMonth::new(2025, 13).is_none());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let dec = YearMonth::new(2024, 12).unwrap();
        let jan = YearMonth::new(2025, 1).unwrap();
        assert!(dec < jan);
    }
}
