//! Money type for representing currency amounts
//!
//! Internally stores amounts in minor units (i64 hundredths) so that every
//! ledger sum is exact. Text input goes through [`Money::parse`] and
//! serialized amounts are plain integers, so floats never enter the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as hundredths of the currency unit
///
/// An i64 of hundredths carries 18 significant digits, enough for totals in
/// high-denomination currencies such as VND or IDR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest amount accepted for a single expense, budget or cost
    ///
    /// Ten trillion whole units. Ledger sums of capped amounts stay far below
    /// `i64::MAX`; additions saturate rather than wrap if they ever reach it.
    pub const MAX: Money = Money(1_000_000_000_000_000);

    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use travel_ledger::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.major(), 10);
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole currency units
    ///
    /// # Examples
    /// ```
    /// use travel_ledger::models::Money;
    /// let amount = Money::from_major(1_800_000);
    /// assert_eq!(amount.cents(), 180_000_000);
    /// ```
    pub const fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    /// Create a Money amount from whole units and hundredths
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        Self(major * 100 + minor)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole-unit portion (truncated toward zero)
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Get the hundredths portion (0-99)
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Floor the amount at zero
    pub const fn clamp_zero(&self) -> Self {
        if self.0 < 0 {
            Self(0)
        } else {
            Self(self.0)
        }
    }

    /// Share of `total` this amount represents, in percent
    ///
    /// Returns 0 when `total` is zero.
    pub fn percentage_of(&self, total: Money) -> f64 {
        if total.is_zero() {
            0.0
        } else {
            (self.0 as f64 / total.0 as f64) * 100.0
        }
    }

    /// Take a whole-percent share of this amount, truncating toward zero
    pub fn percent(&self, pct: u32) -> Self {
        Self(((self.0 as i128 * pct as i128) / 100) as i64)
    }

    /// Split this amount evenly over a number of days
    ///
    /// Returns zero when `days` is not positive.
    pub fn div_days(&self, days: i64) -> Self {
        if days <= 0 {
            Self::zero()
        } else {
            Self(self.0 / days)
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "10", "1,800,000", "1_800_000.5".
    /// Only one leading sign is allowed and both parts must be plain digits.
    /// Digits past the second decimal place are truncated. Amounts beyond
    /// [`Money::MAX`] are rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();
        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let (negative, rest) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let cleaned: String = rest.chars().filter(|c| *c != ',' && *c != '_').collect();

        let (major_str, minor_str) = match cleaned.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (cleaned.as_str(), ""),
        };
        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (major_str.is_empty() && minor_str.is_empty())
            || !is_digits(major_str)
            || !is_digits(minor_str)
        {
            return Err(invalid());
        }

        let out_of_range = || MoneyParseError::OutOfRange(s.to_string());
        let major: i64 = if major_str.is_empty() {
            0
        } else {
            major_str.parse().map_err(|_| out_of_range())?
        };

        let minor: i64 = match minor_str.get(..2).unwrap_or(minor_str) {
            "" => 0,
            digits if digits.len() == 1 => digits.parse::<i64>().map_err(|_| invalid())? * 10,
            digits => digits.parse().map_err(|_| invalid())?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|m| m.checked_add(minor))
            .filter(|cents| *cents <= Self::MAX.0)
            .ok_or_else(out_of_range)?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a trailing currency code, e.g. "1,800,000.00 VND"
    pub fn format_with_currency(&self, currency: &str) -> String {
        format!("{} {}", self, currency)
    }
}

/// Insert thousands separators into a non-negative integer
fn group_thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02}",
            sign,
            group_thousands(self.major()),
            self.minor_part()
        )
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
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
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Money amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
