//! Core data models for travel-ledger
//!
//! This module contains the value types of the trip budgeting domain:
//! money, trips, budgets, expenses and activities.

pub mod activity;
pub mod budget;
pub mod category;
pub mod expense;
pub mod ids;
pub mod money;
pub mod trip;

pub use activity::{
    Activity, ActivityBudget, ActivityPriority, ActivityStatus, ActivityType,
    ActivityValidationError,
};
pub use budget::{Budget, BudgetDefinition, CategoryBudget};
pub use category::{CategoryParseError, ExpenseCategory};
pub use expense::{Expense, DEFAULT_CURRENCY};
pub use ids::{ActivityId, ExpenseId, TripId, UserId};
pub use money::{Money, MoneyParseError};
pub use trip::Trip;
