//! Service layer for travel-ledger
//!
//! The service layer owns the in-memory ledgers and keeps activity costs and
//! expense records consistent with each other.

pub mod activity_manager;
pub mod analytics;
pub mod expense_manager;
pub mod integrated;

pub use activity_manager::{ActivityManager, ActivityUpdate, NewActivity};
pub use analytics::{Analytics, SpendingTrend};
pub use expense_manager::{
    BudgetStatus, BurnRateStatus, CategoryHealth, CategoryStatus, ExpenseManager, LedgerEntry,
    DEFAULT_WARNING_THRESHOLD,
};
pub use integrated::{
    ActivityExpenseRow, ActivityExpenseSummary, IntegratedTravelManager, SharedTravelManager,
};
