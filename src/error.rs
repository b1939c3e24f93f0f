//! Custom error types for travel-ledger
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::Money;

/// The main error type for travel-ledger operations
#[derive(Error, Debug)]
pub enum TravelError {
    /// An expense amount was negative
    #[error("Invalid amount: {0} (amounts cannot be negative)")]
    InvalidAmount(Money),

    /// An amount was larger than `Money::MAX`
    #[error("Amount out of range: {0} (maximum is {max})", max = Money::MAX)]
    AmountOutOfRange(Money),

    /// A budget total was zero or negative
    #[error("Invalid budget: total must be positive, got {0}")]
    InvalidBudget(Money),

    /// Explicit category allocations add up to more than the budget total
    #[error("Category allocations ({allocated}) exceed budget total ({total})")]
    AllocationExceedsTotal { allocated: Money, total: Money },

    /// A trip ends on or before the day it starts
    #[error("Invalid date range: end date {end} must be after start date {start}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Command-line input that could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

impl TravelError {
    /// Create a "not found" error for activities
    pub fn activity_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Activity",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::InvalidAmount(_)
                | Self::AmountOutOfRange(_)
                | Self::InvalidBudget(_)
                | Self::AllocationExceedsTotal { .. }
                | Self::InvalidDateRange { .. }
        )
    }
}

impl From<std::io::Error> for TravelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TravelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for travel-ledger operations
pub type TravelResult<T> = Result<T, TravelError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_error_display() {
        let err = TravelError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = TravelError::activity_not_found("act-1234");
        assert_eq!(err.to_string(), "Activity not found: act-1234");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_allocation_error_display() {
        let err = TravelError::AllocationExceedsTotal {
            allocated: Money::from_major(600),
            total: Money::from_major(500),
        };
        assert_eq!(
            err.to_string(),
            "Category allocations (600.00) exceed budget total (500.00)"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_amount_out_of_range_display() {
        let err = TravelError::AmountOutOfRange(Money::from_major(20_000_000_000_000));
        assert_eq!(
            err.to_string(),
            "Amount out of range: 20,000,000,000,000.00 (maximum is 10,000,000,000,000.00)"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_date_range_error_display() {
        let err = TravelError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        };
        assert!(err.to_string().contains("2024-01-15"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let travel_err: TravelError = io_err.into();
        assert!(matches!(travel_err, TravelError::Io(_)));
    }
}
