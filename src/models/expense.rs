//! Expense model
//!
//! An expense is an immutable ledger entry. Editing one means removing it
//! from the ledger and recording a replacement.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::ExpenseCategory;
use super::money::Money;
use crate::error::{TravelError, TravelResult};

/// Default currency code for expenses created without one
pub const DEFAULT_CURRENCY: &str = "VND";

/// A single amount of money actually spent during a trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExpenseRecord")]
pub struct Expense {
    amount: Money,
    category: ExpenseCategory,
    date: DateTime<Utc>,
    description: String,
    currency: String,
}

/// Unvalidated wire form, checked on the way in
#[derive(Deserialize)]
struct ExpenseRecord {
    amount: Money,
    category: ExpenseCategory,
    date: DateTime<Utc>,
    #[serde(default)]
    description: String,
    #[serde(default = "default_currency")]
    currency: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl TryFrom<ExpenseRecord> for Expense {
    type Error = TravelError;

    fn try_from(record: ExpenseRecord) -> Result<Self, Self::Error> {
        Expense::new(
            record.amount,
            record.category,
            record.date,
            record.description,
            record.currency,
        )
    }
}

impl Expense {
    /// Create a new expense
    ///
    /// Fails with [`TravelError::InvalidAmount`] when `amount` is negative.
    pub fn new(
        amount: Money,
        category: ExpenseCategory,
        date: DateTime<Utc>,
        description: impl Into<String>,
        currency: impl Into<String>,
    ) -> TravelResult<Self> {
        if amount.is_negative() {
            return Err(TravelError::InvalidAmount(amount));
        }
        if amount > Money::MAX {
            return Err(TravelError::AmountOutOfRange(amount));
        }

        let currency = currency.into();
        let currency = if currency.trim().is_empty() {
            default_currency()
        } else {
            currency.trim().to_ascii_uppercase()
        };

        Ok(Self {
            amount,
            category,
            date,
            description: description.into(),
            currency,
        })
    }

    /// Create an expense dated now in the default currency
    pub fn now(
        amount: Money,
        category: ExpenseCategory,
        description: impl Into<String>,
    ) -> TravelResult<Self> {
        Self::new(amount, category, Utc::now(), description, DEFAULT_CURRENCY)
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn category(&self) -> ExpenseCategory {
        self.category
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Calendar day the expense falls on, used for daily grouping
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] {}",
            self.day(),
            self.amount.format_with_currency(&self.currency),
            self.category,
            self.description
        )
    }
}
