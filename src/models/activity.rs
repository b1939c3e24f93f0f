//! Activity model
//!
//! An activity is a planned or booked trip item (a flight, a hotel stay, a
//! museum visit) with optional estimated and actual costs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::category::ExpenseCategory;
use super::expense::DEFAULT_CURRENCY;
use super::ids::{ActivityId, TripId, UserId};
use super::money::Money;

/// Kind of activity, which decides the expense category its cost lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Flight,
    Accommodation,
    Restaurant,
    Sightseeing,
    Transportation,
    Shopping,
    Entertainment,
    Tour,
    Meeting,
    #[default]
    Other,
}

impl ActivityType {
    /// Expense category an actual cost of this activity type is recorded under
    pub const fn expense_category(&self) -> ExpenseCategory {
        match self {
            Self::Flight => ExpenseCategory::Flight,
            Self::Accommodation => ExpenseCategory::Accommodation,
            Self::Restaurant => ExpenseCategory::FoodBeverage,
            Self::Transportation => ExpenseCategory::Transportation,
            Self::Sightseeing | Self::Entertainment | Self::Tour => ExpenseCategory::Activities,
            Self::Shopping => ExpenseCategory::Shopping,
            Self::Meeting | Self::Other => ExpenseCategory::Miscellaneous,
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flight => write!(f, "Flight"),
            Self::Accommodation => write!(f, "Accommodation"),
            Self::Restaurant => write!(f, "Restaurant"),
            Self::Sightseeing => write!(f, "Sightseeing"),
            Self::Transportation => write!(f, "Transportation"),
            Self::Shopping => write!(f, "Shopping"),
            Self::Entertainment => write!(f, "Entertainment"),
            Self::Tour => write!(f, "Tour"),
            Self::Meeting => write!(f, "Meeting"),
            Self::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for ActivityType {
    type Err = ActivityValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flight" => Ok(Self::Flight),
            "accommodation" | "hotel" => Ok(Self::Accommodation),
            "restaurant" | "dining" => Ok(Self::Restaurant),
            "sightseeing" => Ok(Self::Sightseeing),
            "transportation" | "transport" => Ok(Self::Transportation),
            "shopping" => Ok(Self::Shopping),
            "entertainment" => Ok(Self::Entertainment),
            "tour" => Ok(Self::Tour),
            "meeting" => Ok(Self::Meeting),
            "other" => Ok(Self::Other),
            _ => Err(ActivityValidationError::UnknownType(s.to_string())),
        }
    }
}

/// Lifecycle state of an activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    #[default]
    Planned,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planned => write!(f, "Planned"),
            Self::Confirmed => write!(f, "Confirmed"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Completed => write!(f, "Completed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Estimated and actual cost attached to an activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityBudget {
    #[serde(default)]
    pub estimated_cost: Money,

    /// Set once money has actually been spent; mirrored into the expense ledger
    #[serde(default)]
    pub actual_cost: Option<Money>,

    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl ActivityBudget {
    pub fn estimated(estimated_cost: Money, currency: impl Into<String>) -> Self {
        Self {
            estimated_cost,
            actual_cost: None,
            currency: currency.into(),
        }
    }

    pub fn with_actual(mut self, actual_cost: Money) -> Self {
        self.actual_cost = Some(actual_cost);
        self
    }

    /// Actual minus estimated, when an actual cost is known
    pub fn variance(&self) -> Option<Money> {
        self.actual_cost.map(|actual| actual - self.estimated_cost)
    }
}

/// A planned or booked trip item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub activity_type: ActivityType,

    #[serde(default)]
    pub status: ActivityStatus,

    #[serde(default)]
    pub priority: ActivityPriority,

    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub budget: Option<ActivityBudget>,

    pub created_by: UserId,
    pub trip_id: TripId,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    /// Create a new planned activity
    pub fn new(
        title: impl Into<String>,
        activity_type: ActivityType,
        trip_id: TripId,
        created_by: UserId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ActivityId::new(),
            title: title.into(),
            description: String::new(),
            activity_type,
            status: ActivityStatus::default(),
            priority: ActivityPriority::default(),
            start_date: None,
            end_date: None,
            location: None,
            budget: None,
            created_by,
            trip_id,
            tags: Vec::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The actual cost, if the activity has a budget carrying one
    pub fn actual_cost(&self) -> Option<Money> {
        self.budget.as_ref().and_then(|b| b.actual_cost)
    }

    pub fn estimated_cost(&self) -> Money {
        self.budget
            .as_ref()
            .map(|b| b.estimated_cost)
            .unwrap_or_default()
    }

    pub fn currency(&self) -> &str {
        self.budget
            .as_ref()
            .map(|b| b.currency.as_str())
            .unwrap_or(DEFAULT_CURRENCY)
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ActivityStatus::Cancelled
    }

    /// Whether this activity's scheduled window overlaps `[start, end)`
    ///
    /// An activity without an end is treated as instantaneous at its start.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        match self.start_date {
            Some(own_start) => {
                let own_end = self.end_date.unwrap_or(own_start);
                if own_start == own_end {
                    own_start >= start && own_start < end
                } else {
                    own_start < end && start < own_end
                }
            }
            None => false,
        }
    }

    /// Validate the activity
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        if self.title.trim().is_empty() {
            return Err(ActivityValidationError::EmptyTitle);
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(ActivityValidationError::EndBeforeStart);
            }
        }

        if let Some(budget) = &self.budget {
            let costs = std::iter::once(budget.estimated_cost).chain(budget.actual_cost);
            for cost in costs {
                if cost.is_negative() {
                    return Err(ActivityValidationError::NegativeCost(cost));
                }
                if cost > Money::MAX {
                    return Err(ActivityValidationError::CostOutOfRange(cost));
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.title, self.activity_type, self.status)
    }
}

/// Validation errors for activities
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    EmptyTitle,
    EndBeforeStart,
    NegativeCost(Money),
    CostOutOfRange(Money),
    UnknownType(String),
}

impl fmt::Display for ActivityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Activity title cannot be empty"),
            Self::EndBeforeStart => write!(f, "Activity cannot end before it starts"),
            Self::NegativeCost(amount) => write!(f, "Activity cost cannot be negative: {}", amount),
            Self::CostOutOfRange(amount) => {
                write!(f, "Activity cost exceeds {}: {}", Money::MAX, amount)
            }
            Self::UnknownType(s) => write!(f, "Unknown activity type: {}", s),
        }
    }
}

impl std::error::Error for ActivityValidationError {}
