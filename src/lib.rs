//! travel-ledger - trip budgeting with reconciled activity costs
//!
//! This library tracks a trip's budget, its expenses and its planned
//! activities. Recording what an activity actually cost records a matching
//! expense, so the budget always reflects activity spending.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: Value types (money, trips, budgets, expenses, activities)
//! - `services`: Expense ledger, analytics, activity store and the
//!   integrated manager that reconciles them
//! - `storage`: JSON persistence of a planning session
//! - `config`: Configuration and path management
//! - `export`: CSV, JSON and YAML export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use travel_ledger::models::{Budget, ExpenseCategory, Money, Trip};
//! use travel_ledger::services::IntegratedTravelManager;
//!
//! let trip = Trip::new(start, end)?;
//! let budget = Budget::new(Money::from_major(5_000_000), None, None)?;
//! let mut manager = IntegratedTravelManager::with_plan(trip, budget);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{TravelError, TravelResult};

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing
///
/// Defaults to `travel_ledger=info` unless `RUST_LOG` says otherwise. Logs go
/// to stderr so command output stays clean.
pub fn init() {
    INIT_TRACING.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "travel_ledger=info".parse() {
            filter = filter.add_directive(directive);
        }
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        tracing::debug!("travel-ledger tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_init_is_idempotent() {
        super::init();
        super::init();
    }
}
