//! Expense manager
//!
//! Owns the trip, its budget and the authoritative expense ledger. Every
//! change to spending goes through here so that each category's running
//! `spent_amount` always equals the sum of the ledger entries in that
//! category.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{TravelError, TravelResult};
use crate::export::json::{LedgerExport, EXPORT_SCHEMA_VERSION};
use crate::models::trip::today;
use crate::models::{Budget, Expense, ExpenseCategory, ExpenseId, Money, Trip};
use crate::services::analytics::{Analytics, SpendingTrend};

/// Percentage of an allocation above which a category is flagged
pub const DEFAULT_WARNING_THRESHOLD: f64 = 80.0;

/// An expense together with the handle it was stored under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: ExpenseId,
    pub expense: Expense,
}

/// Spending pace relative to the share of the trip already elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BurnRateStatus {
    /// Spending within 110% of the expected share
    OnTrack,
    /// Spending above 110% of the expected share
    ModerateBurn,
    /// Spending above 120% of the expected share
    HighBurn,
    /// No trip days remain
    Completed,
}

impl BurnRateStatus {
    /// Classify spending pace
    ///
    /// `percentage_used` is the share of the budget spent so far, in percent.
    pub fn classify(percentage_used: f64, days_total: i64, days_remaining: i64) -> Self {
        if days_remaining <= 0 || days_total <= 0 {
            return Self::Completed;
        }

        let expected_pct = (days_total - days_remaining) as f64 / days_total as f64 * 100.0;
        if percentage_used > expected_pct * 1.2 {
            Self::HighBurn
        } else if percentage_used > expected_pct * 1.1 {
            Self::ModerateBurn
        } else {
            Self::OnTrack
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::OnTrack => "ON_TRACK",
            Self::ModerateBurn => "MODERATE_BURN",
            Self::HighBurn => "HIGH_BURN",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for BurnRateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Snapshot of overall budget health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub total_budget: Money,
    pub total_spent: Money,
    pub remaining_budget: Money,
    pub percentage_used: f64,
    pub days_total: i64,
    pub days_elapsed: i64,
    pub days_remaining: i64,
    pub daily_limit: Option<Money>,
    pub average_daily_spending: Money,
    pub recommended_daily_spending: Money,
    pub over_budget_categories: Vec<ExpenseCategory>,
    pub burn_rate_status: BurnRateStatus,
    pub spending_trend: SpendingTrend,
}

impl BudgetStatus {
    /// Whether today's average spend is above the configured daily limit
    pub fn exceeds_daily_limit(&self) -> bool {
        self.daily_limit
            .map(|limit| self.average_daily_spending > limit)
            .unwrap_or(false)
    }
}

/// Health label for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryHealth {
    Ok,
    Warning,
    OverBudget,
}

impl fmt::Display for CategoryHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Warning => write!(f, "WARNING"),
            Self::OverBudget => write!(f, "OVER_BUDGET"),
        }
    }
}

/// Allocation, spending and health for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStatus {
    pub allocated: Money,
    pub spent: Money,
    pub remaining: Money,
    pub percentage_used: f64,
    pub status: CategoryHealth,
}

/// Authoritative owner of a trip's expense ledger
#[derive(Debug)]
pub struct ExpenseManager {
    trip: Option<Trip>,
    budget: Option<Budget>,
    entries: Vec<LedgerEntry>,
    analytics: Analytics,
    warning_threshold: f64,
}

impl ExpenseManager {
    /// Create a manager with no trip or budget configured
    pub fn new() -> Self {
        Self {
            trip: None,
            budget: None,
            entries: Vec::new(),
            analytics: Analytics::new(),
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
        }
    }

    /// Create a manager planned against `trip` and `budget`
    pub fn with_plan(trip: Trip, budget: Budget) -> Self {
        let mut manager = Self::new();
        manager.trip = Some(trip);
        manager.budget = Some(budget);
        manager
    }

    pub fn trip(&self) -> Option<&Trip> {
        self.trip.as_ref()
    }

    pub fn budget(&self) -> Option<&Budget> {
        self.budget.as_ref()
    }

    pub fn set_trip(&mut self, trip: Trip) {
        tracing::info!(trip = %trip, "trip configured");
        self.trip = Some(trip);
        self.analytics.invalidate_cache();
    }

    /// Replace the budget, re-deriving every category total from the ledger
    pub fn set_budget(&mut self, mut budget: Budget) {
        budget.reset_spending();
        for entry in &self.entries {
            budget
                .category_entry(entry.expense.category())
                .record_spending(entry.expense.amount());
        }
        tracing::info!(budget = %budget, "budget configured");
        self.budget = Some(budget);
        self.analytics.invalidate_cache();
    }

    pub fn warning_threshold(&self) -> f64 {
        self.warning_threshold
    }

    /// Set the usage percentage above which a category reports `WARNING`
    pub fn set_warning_threshold(&mut self, threshold: f64) -> TravelResult<()> {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(TravelError::Validation(format!(
                "Warning threshold must be between 0 and 100, got {}",
                threshold
            )));
        }
        self.warning_threshold = threshold;
        Ok(())
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    /// Ledger entries in insertion order
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Expenses in insertion order
    pub fn expenses(&self) -> impl Iterator<Item = &Expense> + Clone {
        self.entries.iter().map(|entry| &entry.expense)
    }

    pub fn expense_count(&self) -> usize {
        self.entries.len()
    }

    pub fn get_expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.expense)
    }

    pub fn contains_expense(&self, id: ExpenseId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Record an expense and return the handle it is stored under
    pub fn add_expense(&mut self, expense: Expense) -> ExpenseId {
        let id = ExpenseId::new();
        self.insert_entry(self.entries.len(), LedgerEntry { id, expense });
        id
    }

    /// Remove the entry stored under `id` and record `expense` in its place
    ///
    /// The old amount is released from its category before the new one is
    /// recorded, so a replacement never double-counts. Returns the replaced
    /// expense, or `None` if `id` is not in the ledger.
    pub(crate) fn replace_expense(&mut self, id: ExpenseId, expense: Expense) -> Option<Expense> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        let old = self.remove_at(index);
        self.insert_entry(index, LedgerEntry { id, expense });
        Some(old.expense)
    }

    fn insert_entry(&mut self, index: usize, entry: LedgerEntry) {
        if let Some(budget) = self.budget.as_mut() {
            budget
                .category_entry(entry.expense.category())
                .record_spending(entry.expense.amount());
        }

        tracing::debug!(
            expense_id = %entry.id,
            category = %entry.expense.category(),
            amount = %entry.expense.amount(),
            "expense added"
        );

        self.entries.insert(index, entry);
        self.analytics.invalidate_cache();
        debug_assert!(self.ledger_is_consistent());
    }

    /// Remove the first ledger entry equal to `expense`
    pub fn remove_expense(&mut self, expense: &Expense) -> bool {
        match self.entries.iter().position(|entry| &entry.expense == expense) {
            Some(index) => {
                self.remove_at(index);
                true
            }
            None => false,
        }
    }

    /// Remove the entry stored under `id`
    pub fn remove_by_id(&mut self, id: ExpenseId) -> bool {
        match self.entries.iter().position(|entry| entry.id == id) {
            Some(index) => {
                self.remove_at(index);
                true
            }
            None => false,
        }
    }

    fn remove_at(&mut self, index: usize) -> LedgerEntry {
        let entry = self.entries.remove(index);

        if let Some(budget) = self.budget.as_mut() {
            if let Some(category_budget) = budget.category_mut(entry.expense.category()) {
                if category_budget.release_spending(entry.expense.amount()) {
                    tracing::warn!(
                        category = %entry.expense.category(),
                        "category spending clamped at zero"
                    );
                }
            }
        }

        tracing::debug!(
            expense_id = %entry.id,
            category = %entry.expense.category(),
            amount = %entry.expense.amount(),
            "expense removed"
        );

        self.analytics.invalidate_cache();
        debug_assert!(self.ledger_is_consistent());
        entry
    }

    pub fn get_total_spent(&self) -> Money {
        self.expenses().map(|e| e.amount()).sum()
    }

    pub fn get_category_spending(&self, category: ExpenseCategory) -> Money {
        self.expenses()
            .filter(|e| e.category() == category)
            .map(|e| e.amount())
            .sum()
    }

    /// Whether every category's running total matches the ledger
    pub fn ledger_is_consistent(&self) -> bool {
        let Some(budget) = &self.budget else {
            return true;
        };

        let totals = ledger_totals(&self.entries);
        let tracked_match = budget.categories().all(|(category, cb)| {
            cb.spent_amount == totals.get(&category).copied().unwrap_or_default()
        });
        let ledger_covered = totals.iter().all(|(category, amount)| {
            budget.get_category_budget(*category).spent_amount == *amount
        });

        tracked_match && ledger_covered
    }

    pub fn get_budget_status(&self) -> Option<BudgetStatus> {
        self.get_budget_status_on(today())
    }

    /// Overall budget health as of `today`; `None` without a trip and budget
    pub fn get_budget_status_on(&self, today: NaiveDate) -> Option<BudgetStatus> {
        let trip = self.trip.as_ref()?;
        let budget = self.budget.as_ref()?;

        let total_budget = budget.total();
        let total_spent = self.get_total_spent();
        let remaining_budget = total_budget - total_spent;
        let percentage_used = total_spent.percentage_of(total_budget);

        let days_total = trip.total_days();
        let days_elapsed = trip.days_elapsed_on(today);
        let days_remaining = trip.days_remaining_on(today);

        let recommended_daily_spending = if days_remaining > 0 {
            remaining_budget.clamp_zero().div_days(days_remaining.max(1))
        } else {
            Money::zero()
        };

        let over_budget_categories = budget
            .categories()
            .filter(|(_, cb)| cb.is_over_budget())
            .map(|(category, _)| category)
            .collect();

        Some(BudgetStatus {
            total_budget,
            total_spent,
            remaining_budget,
            percentage_used,
            days_total,
            days_elapsed,
            days_remaining,
            daily_limit: budget.daily_limit(),
            average_daily_spending: self.analytics.get_average_daily_spending_on(
                self.expenses(),
                trip,
                today,
            ),
            recommended_daily_spending,
            over_budget_categories,
            burn_rate_status: BurnRateStatus::classify(percentage_used, days_total, days_remaining),
            spending_trend: self.analytics.get_spending_trends_on(self.expenses(), trip, today),
        })
    }

    /// Allocation and health per tracked category; empty without a budget
    pub fn get_category_status(&self) -> BTreeMap<ExpenseCategory, CategoryStatus> {
        let Some(budget) = &self.budget else {
            return BTreeMap::new();
        };

        budget
            .categories()
            .map(|(category, cb)| {
                let percentage_used = cb.percentage_used();
                let status = if cb.is_over_budget() {
                    CategoryHealth::OverBudget
                } else if percentage_used > self.warning_threshold {
                    CategoryHealth::Warning
                } else {
                    CategoryHealth::Ok
                };

                (
                    category,
                    CategoryStatus {
                        allocated: cb.allocated_amount,
                        spent: cb.spent_amount,
                        remaining: cb.remaining(),
                        percentage_used,
                        status,
                    },
                )
            })
            .collect()
    }

    /// Snapshot of the trip, budget inputs and ledger
    pub fn export_data(&self) -> LedgerExport {
        LedgerExport {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            trip: self.trip,
            budget: self.budget.as_ref().map(Budget::definition),
            expenses: self.entries.clone(),
        }
    }

    /// Rebuild a manager from an export, re-deriving all running totals
    pub fn from_export(export: &LedgerExport) -> TravelResult<Self> {
        let mut manager = Self::new();
        manager.trip = export.trip;
        if let Some(definition) = &export.budget {
            manager.budget = Some(definition.build()?);
        }

        for entry in &export.expenses {
            if manager.contains_expense(entry.id) {
                return Err(TravelError::Validation(format!(
                    "Duplicate expense id in export: {}",
                    entry.id
                )));
            }
            manager.insert_entry(manager.entries.len(), entry.clone());
        }

        tracing::info!(
            expenses = manager.expense_count(),
            "expense ledger restored from export"
        );
        Ok(manager)
    }
}

impl Default for ExpenseManager {
    fn default() -> Self {
        Self::new()
    }
}

fn ledger_totals(entries: &[LedgerEntry]) -> BTreeMap<ExpenseCategory, Money> {
    let mut totals: BTreeMap<ExpenseCategory, Money> = BTreeMap::new();
    for entry in entries {
        *totals.entry(entry.expense.category()).or_default() += entry.expense.amount();
    }
    totals
}
