//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Provides safe arithmetic operations, parsing of regional statement
//! formats and formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Largest magnitude accepted from a statement: one trillion units.
///
/// Keeps ledger totals far away from `i64` overflow.
pub const MAX_ABS_CENTS: i64 = 100_000_000_000_000;

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use statement_report::models::Money;
    /// let amount = Money::from_cents(1050); // 10,50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from a floating point value, rounding to the
    /// nearest cent. Spreadsheet cells hand us numbers this way.
    ///
    /// `None` for non-finite values and anything beyond [`MAX_ABS_CENTS`].
    pub fn try_from_f64(value: f64) -> Option<Self> {
        let cents = (value * 100.0).round();
        (cents.is_finite() && cents.abs() <= MAX_ABS_CENTS as f64).then_some(Self(cents as i64))
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Amount as a float, for spreadsheet cells and charts
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Parse an amount written the way European bank exports write it.
    ///
    /// Comma is the decimal separator and dot groups thousands
    /// (`-1.234,56`). Currency symbols, spaces and accounting parentheses
    /// are tolerated. When no comma is present, a dot followed by exactly
    /// three digits in every group is read as a thousands separator
    /// (`1.234` is 1234), otherwise as a decimal point (`12.5`).
    pub fn parse_regional(s: &str) -> Result<Self, MoneyParseError> {
        let original = s;
        let cleaned: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '€' | '$' | '£' | '\''))
            .collect();
        let cleaned = cleaned
            .trim_start_matches("EUR")
            .trim_end_matches("EUR")
            .to_string();

        // Accounting format: (12,00) is negative
        let (paren_negative, inner) = match cleaned
            .strip_prefix('(')
            .and_then(|v| v.strip_suffix(')'))
        {
            Some(inner) => (true, inner),
            None => (false, cleaned.as_str()),
        };

        let (sign_negative, body) = split_sign(inner);
        // Trailing minus shows up in some exports ("100,00-")
        let (trailing_negative, body) = match body.strip_suffix('-') {
            Some(rest) => (true, rest),
            None => (false, body),
        };

        let cents = if body.contains(',') {
            decimal_to_cents(&body.replace('.', ""), ',')
        } else if is_thousands_grouped(body) {
            decimal_to_cents(&body.replace('.', ""), '.')
        } else {
            decimal_to_cents(body, '.')
        }
        .filter(|cents| *cents <= MAX_ABS_CENTS)
        .ok_or_else(|| MoneyParseError::invalid(original.trim()))?;

        let negative = paren_negative ^ sign_negative ^ trailing_negative;
        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.units().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.units(), self.cents_part())
        }
    }
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(stripped) = s.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = s.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, s)
    }
}

/// "1.234" / "12.345.678" style: every group after the first dot has three digits
fn is_thousands_grouped(s: &str) -> bool {
    let mut groups = s.split('.');
    let head = groups.next().unwrap_or("");
    let rest: Vec<&str> = groups.collect();
    !rest.is_empty()
        && !head.is_empty()
        && head.len() <= 3
        && head.chars().all(|c| c.is_ascii_digit())
        && rest
            .iter()
            .all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

/// Convert an unsigned decimal string to cents, truncating past two places
fn decimal_to_cents(s: &str, separator: char) -> Option<i64> {
    if s.is_empty() {
        return None;
    }

    let (whole, fraction) = match s.split_once(separator) {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };

    if fraction.contains(separator) {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let units: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction[..2].parse().ok()?,
    };

    units.checked_mul(100)?.checked_add(cents)
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}.{:02}", self.units().abs(), self.cents_part())
        } else {
            write!(f, "{}.{:02}", self.units(), self.cents_part())
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl MoneyParseError {
    fn invalid(s: &str) -> Self {
        Self::InvalidFormat(s.to_string())
    }
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: '{}'", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.units(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_from_f64_rounds() {
        assert_eq!(Money::try_from_f64(-11.5), Some(Money::from_cents(-1150)));
        assert_eq!(Money::try_from_f64(0.1 + 0.2), Some(Money::from_cents(30)));
    }

    #[test]
    fn test_from_f64_rejects_out_of_range() {
        assert_eq!(Money::try_from_f64(1e300), None);
        assert_eq!(Money::try_from_f64(-1e300), None);
        assert_eq!(Money::try_from_f64(f64::NAN), None);
        assert_eq!(Money::try_from_f64(f64::INFINITY), None);
        assert_eq!(Money::try_from_f64(1e12), Some(Money::from_cents(MAX_ABS_CENTS)));
        assert_eq!(Money::try_from_f64(1e12 + 1.0), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-10.50");
        assert_eq!(format!("{}", Money::from_cents(-5)), "-0.05");
        assert_eq!(Money::from_cents(-1050).format_with_symbol("€"), "-€10.50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_parse_regional() {
        assert_eq!(Money::parse_regional("-100,00").unwrap().cents(), -10000);
        assert_eq!(Money::parse_regional("-11,50").unwrap().cents(), -1150);
        assert_eq!(Money::parse_regional("1.234,56").unwrap().cents(), 123456);
        assert_eq!(Money::parse_regional("€ 2.000,5").unwrap().cents(), 200050);
        assert_eq!(Money::parse_regional("1.234").unwrap().cents(), 123400);
        assert_eq!(Money::parse_regional("12.5").unwrap().cents(), 1250);
        assert_eq!(Money::parse_regional("(12,00)").unwrap().cents(), -1200);
        assert_eq!(Money::parse_regional("100,00-").unwrap().cents(), -10000);
        assert_eq!(Money::parse_regional("+30").unwrap().cents(), 3000);
        assert_eq!(Money::parse_regional(",5").unwrap().cents(), 50);
    }

    #[test]
    fn test_parse_regional_rejects_garbage() {
        assert!(Money::parse_regional("").is_err());
        assert!(Money::parse_regional("abc").is_err());
        assert!(Money::parse_regional("1,2,3").is_err());
        assert!(Money::parse_regional("-").is_err());
        assert!(Money::parse_regional("92.233.720.368.547.758,07").is_err());
        assert!(Money::parse_regional("1.000.000.000.001,00").is_err());
    }

    #[test]
    fn test_comparison() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert!(a > b);
        assert!(b < a);
        assert_eq!(a, Money::from_cents(1000));
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_cents(100),
            Money::from_cents(200),
            Money::from_cents(-300),
        ];
        let by_ref: Money = amounts.iter().sum();
        let total: Money = amounts.into_iter().sum();
        assert_eq!(total.cents(), 0);
        assert_eq!(by_ref, total);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
