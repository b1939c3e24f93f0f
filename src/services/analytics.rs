//! Spending analytics
//!
//! Read-only aggregation over an expense list supplied by the caller. The
//! per-category and per-day totals are memoized; whoever owns the list must
//! call [`Analytics::invalidate_cache`] after every change to it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use crate::models::{Expense, ExpenseCategory, Money, Trip};

/// Number of most recent spending days compared against the trip average
const TREND_WINDOW_DAYS: usize = 3;

/// Direction of recent spending relative to the trip-wide daily average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpendingTrend {
    /// Fewer than two distinct spending days
    InsufficientData,
    /// Recent days average above 120% of the trip average
    Increasing,
    /// Recent days average below 80% of the trip average
    Decreasing,
    Stable,
}

impl SpendingTrend {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InsufficientData => "INSUFFICIENT_DATA",
            Self::Increasing => "INCREASING",
            Self::Decreasing => "DECREASING",
            Self::Stable => "STABLE",
        }
    }
}

impl fmt::Display for SpendingTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Default)]
struct AnalyticsCache {
    category_totals: Option<BTreeMap<ExpenseCategory, Money>>,
    daily_totals: Option<BTreeMap<NaiveDate, Money>>,
}

/// Aggregation engine with memoized totals
#[derive(Debug, Default)]
pub struct Analytics {
    cache: RwLock<AnalyticsCache>,
}

impl Analytics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all memoized results
    pub fn invalidate_cache(&self) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *cache = AnalyticsCache::default();
    }

    /// Whether any memoized result is currently held
    pub fn has_cached_results(&self) -> bool {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache.category_totals.is_some() || cache.daily_totals.is_some()
    }

    /// Group expenses by category, keeping insertion order within each group
    pub fn get_expenses_by_category<'a>(
        &self,
        expenses: impl IntoIterator<Item = &'a Expense>,
    ) -> BTreeMap<ExpenseCategory, Vec<Expense>> {
        let mut grouped: BTreeMap<ExpenseCategory, Vec<Expense>> = BTreeMap::new();
        for expense in expenses {
            grouped
                .entry(expense.category())
                .or_default()
                .push(expense.clone());
        }
        grouped
    }

    /// Group expenses by calendar day, keeping insertion order within each group
    pub fn get_expenses_by_date<'a>(
        &self,
        expenses: impl IntoIterator<Item = &'a Expense>,
    ) -> BTreeMap<NaiveDate, Vec<Expense>> {
        let mut grouped: BTreeMap<NaiveDate, Vec<Expense>> = BTreeMap::new();
        for expense in expenses {
            grouped.entry(expense.day()).or_default().push(expense.clone());
        }
        grouped
    }

    /// Total spent per category (memoized)
    pub fn get_category_totals<'a>(
        &self,
        expenses: impl IntoIterator<Item = &'a Expense>,
    ) -> BTreeMap<ExpenseCategory, Money> {
        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .category_totals
            .clone();
        if let Some(totals) = cached {
            return totals;
        }

        let mut totals: BTreeMap<ExpenseCategory, Money> = BTreeMap::new();
        for expense in expenses {
            *totals.entry(expense.category()).or_default() += expense.amount();
        }

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .category_totals = Some(totals.clone());
        totals
    }

    /// Total spent per calendar day (memoized)
    pub fn get_daily_totals<'a>(
        &self,
        expenses: impl IntoIterator<Item = &'a Expense>,
    ) -> BTreeMap<NaiveDate, Money> {
        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .daily_totals
            .clone();
        if let Some(totals) = cached {
            return totals;
        }

        let mut totals: BTreeMap<NaiveDate, Money> = BTreeMap::new();
        for expense in expenses {
            *totals.entry(expense.day()).or_default() += expense.amount();
        }

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .daily_totals = Some(totals.clone());
        totals
    }

    /// Total spent divided by the days of the trip elapsed as of `today`
    ///
    /// Zero before the trip has started.
    pub fn get_average_daily_spending_on<'a>(
        &self,
        expenses: impl IntoIterator<Item = &'a Expense>,
        trip: &Trip,
        today: NaiveDate,
    ) -> Money {
        let days_elapsed = trip.days_elapsed_on(today);
        if days_elapsed == 0 {
            return Money::zero();
        }
        let total: Money = expenses.into_iter().map(|e| e.amount()).sum();
        total.div_days(days_elapsed.max(1))
    }

    pub fn get_average_daily_spending<'a>(
        &self,
        expenses: impl IntoIterator<Item = &'a Expense>,
        trip: &Trip,
    ) -> Money {
        self.get_average_daily_spending_on(expenses, trip, crate::models::trip::today())
    }

    /// Compare the most recent spending days against the trip-wide daily average
    pub fn get_spending_trends_on<'a>(
        &self,
        expenses: impl IntoIterator<Item = &'a Expense> + Clone,
        trip: &Trip,
        today: NaiveDate,
    ) -> SpendingTrend {
        let daily = self.get_daily_totals(expenses.clone());
        if daily.len() < 2 {
            return SpendingTrend::InsufficientData;
        }

        let recent: Vec<Money> = daily.values().rev().take(TREND_WINDOW_DAYS).copied().collect();
        let recent_total: Money = recent.iter().sum();
        let recent_average = recent_total.div_days(recent.len() as i64);
        let overall_average = self.get_average_daily_spending_on(expenses, trip, today);

        // Compare in tenths so the 1.2x / 0.8x thresholds stay in integer math
        let recent_scaled = recent_average.cents() as i128 * 10;
        let overall = overall_average.cents() as i128;

        if recent_scaled > overall * 12 {
            SpendingTrend::Increasing
        } else if recent_scaled < overall * 8 {
            SpendingTrend::Decreasing
        } else {
            SpendingTrend::Stable
        }
    }

    pub fn get_spending_trends<'a>(
        &self,
        expenses: impl IntoIterator<Item = &'a Expense> + Clone,
        trip: &Trip,
    ) -> SpendingTrend {
        self.get_spending_trends_on(expenses, trip, crate::models::trip::today())
    }
}
