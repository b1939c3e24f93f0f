//! Display formatting for terminal output
//!
//! Provides utilities for formatting budgets, expenses and activities as
//! plain-text tables.

pub mod activity;
pub mod budget;
pub mod expense;

pub use activity::{format_activity_list, format_activity_summary};
pub use budget::{format_budget_status, format_category_table};
pub use expense::format_expense_register;
