//! Integrated travel manager
//!
//! Composes an [`ActivityManager`] with an [`ExpenseManager`] and keeps
//! each activity's actual cost mirrored by exactly one ledger expense. The
//! activity-to-expense mapping has an entry for an activity exactly when
//! that activity carries an actual cost, and the mapped expense always
//! matches that cost.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{TravelError, TravelResult};
use crate::models::trip::today;
use crate::models::{
    Activity, ActivityBudget, ActivityId, ActivityStatus, ActivityType, Budget, Expense,
    ExpenseCategory, ExpenseId, Money, Trip, TripId, DEFAULT_CURRENCY,
};
use crate::services::activity_manager::{ActivityManager, ActivityUpdate, NewActivity};
use crate::services::expense_manager::{BudgetStatus, CategoryStatus, ExpenseManager};

/// Cost reconciliation detail for one activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityExpenseRow {
    pub activity_id: ActivityId,
    pub title: String,
    pub activity_type: ActivityType,
    pub status: ActivityStatus,
    pub estimated_cost: Money,
    pub actual_cost: Option<Money>,
    pub variance: Option<Money>,
    pub currency: String,
    pub expense_id: Option<ExpenseId>,
    pub synced: bool,
}

/// Aggregate view of planned vs. recorded activity costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityExpenseSummary {
    pub total_activities: usize,
    pub synced_activities: usize,
    pub unsynced_activities: usize,
    pub total_estimated_cost: Money,
    pub total_actual_cost: Money,
    /// Actual minus estimated across all activities
    pub cost_variance: Money,
    pub activities: Vec<ActivityExpenseRow>,
    pub budget_status: Option<BudgetStatus>,
    pub category_status: BTreeMap<ExpenseCategory, CategoryStatus>,
}

/// Activities and expenses of one trip, kept in lockstep
#[derive(Debug, Default)]
pub struct IntegratedTravelManager {
    activities: ActivityManager,
    expenses: ExpenseManager,
    activity_expenses: HashMap<ActivityId, ExpenseId>,
}

impl IntegratedTravelManager {
    /// Create a manager around an existing expense ledger
    pub fn new(expenses: ExpenseManager) -> Self {
        Self {
            activities: ActivityManager::new(),
            expenses,
            activity_expenses: HashMap::new(),
        }
    }

    pub fn with_plan(trip: Trip, budget: Budget) -> Self {
        Self::new(ExpenseManager::with_plan(trip, budget))
    }

    /// Reassemble a manager from stored parts, checking the mapping
    pub fn from_parts(
        activities: ActivityManager,
        expenses: ExpenseManager,
        activity_expenses: HashMap<ActivityId, ExpenseId>,
    ) -> TravelResult<Self> {
        let manager = Self {
            activities,
            expenses,
            activity_expenses,
        };

        if !manager.mapping_is_consistent() {
            return Err(TravelError::Validation(
                "Activity to expense mapping does not match the ledger".into(),
            ));
        }

        Ok(manager)
    }

    pub fn activities(&self) -> &ActivityManager {
        &self.activities
    }

    pub fn expenses(&self) -> &ExpenseManager {
        &self.expenses
    }

    pub fn mapping(&self) -> &HashMap<ActivityId, ExpenseId> {
        &self.activity_expenses
    }

    /// The expense mirroring `activity_id`, if any
    pub fn mapped_expense(&self, activity_id: ActivityId) -> Option<ExpenseId> {
        self.activity_expenses.get(&activity_id).copied()
    }

    /// The activity mirrored by `expense_id`, if any
    pub fn activity_for_expense(&self, expense_id: ExpenseId) -> Option<ActivityId> {
        self.activity_expenses
            .iter()
            .find(|(_, mapped)| **mapped == expense_id)
            .map(|(activity_id, _)| *activity_id)
    }

    pub fn set_trip(&mut self, trip: Trip) {
        self.expenses.set_trip(trip);
    }

    pub fn set_budget(&mut self, budget: Budget) {
        self.expenses.set_budget(budget);
    }

    pub fn set_warning_threshold(&mut self, threshold: f64) -> TravelResult<()> {
        self.expenses.set_warning_threshold(threshold)
    }

    /// Record an expense that is not tied to any activity
    pub fn add_expense(&mut self, expense: Expense) -> ExpenseId {
        self.expenses.add_expense(expense)
    }

    /// Remove a standalone expense
    ///
    /// Expenses mirroring an activity are owned by that activity and must be
    /// changed through its cost instead.
    pub fn remove_expense(&mut self, expense_id: ExpenseId) -> TravelResult<bool> {
        if let Some(activity_id) = self.activity_for_expense(expense_id) {
            return Err(TravelError::Validation(format!(
                "Expense {} mirrors activity {}; clear the activity cost instead",
                expense_id, activity_id
            )));
        }
        Ok(self.expenses.remove_by_id(expense_id))
    }

    /// Create an activity, mirroring its actual cost if one is supplied
    pub fn create_activity_with_expense(&mut self, input: NewActivity) -> TravelResult<Activity> {
        let activity = self.activities.create_activity(input)?;
        if activity.actual_cost().is_some() {
            self.sync_activity_to_expense(activity.id)?;
        }
        Ok(activity)
    }

    /// Bring the mirrored expense of `activity_id` in line with its actual cost
    ///
    /// Does nothing and returns `None` if the activity is unknown or has no
    /// actual cost. An already mirrored activity has its expense replaced
    /// under the same handle, releasing the old amount first.
    pub fn sync_activity_to_expense(
        &mut self,
        activity_id: ActivityId,
    ) -> TravelResult<Option<ExpenseId>> {
        let Some(activity) = self.activities.get_activity(activity_id) else {
            return Ok(None);
        };
        let Some(actual_cost) = activity.actual_cost() else {
            return Ok(None);
        };

        let mapped = self.mapped_expense(activity_id);
        let date = activity
            .start_date
            .or_else(|| {
                mapped
                    .and_then(|id| self.expenses.get_expense(id))
                    .map(Expense::date)
            })
            .unwrap_or_else(Utc::now);
        let expense = mirrored_expense(activity, actual_cost, date)?;

        let expense_id = match mapped {
            Some(expense_id) => {
                if self.expenses.replace_expense(expense_id, expense.clone()).is_some() {
                    expense_id
                } else {
                    self.report_missing_expense(activity_id, expense_id);
                    self.expenses.add_expense(expense)
                }
            }
            None => self.expenses.add_expense(expense),
        };

        self.activity_expenses.insert(activity_id, expense_id);
        tracing::debug!(
            activity_id = %activity_id,
            expense_id = %expense_id,
            amount = %actual_cost,
            "activity cost synced"
        );
        debug_assert!(self.mapping_is_consistent());
        Ok(Some(expense_id))
    }

    /// Drop the mirrored expense of `activity_id`
    ///
    /// Returns whether a mapping existed.
    pub fn remove_activity_expense(&mut self, activity_id: ActivityId) -> bool {
        let Some(expense_id) = self.activity_expenses.remove(&activity_id) else {
            return false;
        };

        if !self.expenses.remove_by_id(expense_id) {
            self.report_missing_expense(activity_id, expense_id);
        }

        tracing::debug!(
            activity_id = %activity_id,
            expense_id = %expense_id,
            "activity expense removed"
        );
        true
    }

    /// Update an activity and re-sync its mirrored expense
    ///
    /// Returns `Ok(None)` if the activity does not exist.
    pub fn update_activity_with_expense_sync(
        &mut self,
        activity_id: ActivityId,
        update: ActivityUpdate,
    ) -> TravelResult<Option<Activity>> {
        let Some(updated) = self.activities.update_activity(activity_id, update)? else {
            return Ok(None);
        };

        self.reconcile(&updated)?;
        Ok(Some(updated))
    }

    /// Reschedule an activity, moving its mirrored expense to the new date
    pub fn schedule_activity(
        &mut self,
        activity_id: ActivityId,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> TravelResult<Option<Activity>> {
        let Some(updated) = self.activities.schedule_activity(activity_id, start, end)? else {
            return Ok(None);
        };

        self.reconcile(&updated)?;
        Ok(Some(updated))
    }

    /// Delete an activity together with its mirrored expense
    pub fn delete_activity_with_expense_sync(&mut self, activity_id: ActivityId) -> bool {
        if self.activities.get_activity(activity_id).is_none() {
            return false;
        }

        self.remove_activity_expense(activity_id);
        self.activities.delete_activity(activity_id).is_some()
    }

    /// Record what an activity actually cost
    ///
    /// Returns `Ok(false)` if the activity does not exist. An activity
    /// without a cost budget gets one whose estimate equals `amount`.
    pub fn set_activity_actual_cost(
        &mut self,
        activity_id: ActivityId,
        amount: Money,
        currency: Option<&str>,
    ) -> TravelResult<bool> {
        if amount.is_negative() {
            return Err(TravelError::InvalidAmount(amount));
        }
        if amount > Money::MAX {
            return Err(TravelError::AmountOutOfRange(amount));
        }

        let Some(activity) = self.activities.get_activity_mut(activity_id) else {
            return Ok(false);
        };

        let budget = activity.budget.get_or_insert_with(|| {
            ActivityBudget::estimated(amount, currency.unwrap_or(DEFAULT_CURRENCY))
        });
        budget.actual_cost = Some(amount);
        if let Some(currency) = currency {
            budget.currency = currency.to_string();
        }
        activity.updated_at = Utc::now();

        self.sync_activity_to_expense(activity_id)?;
        Ok(true)
    }

    /// Clear an activity's actual cost and its mirrored expense
    pub fn clear_activity_actual_cost(&mut self, activity_id: ActivityId) -> bool {
        let Some(activity) = self.activities.get_activity_mut(activity_id) else {
            return false;
        };

        if let Some(budget) = activity.budget.as_mut() {
            budget.actual_cost = None;
        }
        activity.updated_at = Utc::now();

        self.remove_activity_expense(activity_id);
        true
    }

    pub fn get_activity_expense_summary(&self, trip_id: Option<TripId>) -> ActivityExpenseSummary {
        self.get_activity_expense_summary_on(trip_id, today())
    }

    /// Planned vs. recorded costs, optionally limited to one trip
    pub fn get_activity_expense_summary_on(
        &self,
        trip_id: Option<TripId>,
        today: NaiveDate,
    ) -> ActivityExpenseSummary {
        let activities = match trip_id {
            Some(trip_id) => self.activities.get_activities_by_trip(trip_id),
            None => self.activities.list_activities(),
        };

        let rows: Vec<ActivityExpenseRow> = activities
            .into_iter()
            .map(|activity| {
                let expense_id = self.mapped_expense(activity.id);
                ActivityExpenseRow {
                    activity_id: activity.id,
                    title: activity.title.clone(),
                    activity_type: activity.activity_type,
                    status: activity.status,
                    estimated_cost: activity.estimated_cost(),
                    actual_cost: activity.actual_cost(),
                    variance: activity.budget.as_ref().and_then(ActivityBudget::variance),
                    currency: activity.currency().to_string(),
                    expense_id,
                    synced: expense_id.is_some(),
                }
            })
            .collect();

        let synced_activities = rows.iter().filter(|row| row.synced).count();
        let total_estimated_cost: Money = rows.iter().map(|row| row.estimated_cost).sum();
        let total_actual_cost: Money = rows.iter().filter_map(|row| row.actual_cost).sum();

        ActivityExpenseSummary {
            total_activities: rows.len(),
            synced_activities,
            unsynced_activities: rows.len() - synced_activities,
            total_estimated_cost,
            total_actual_cost,
            cost_variance: total_actual_cost - total_estimated_cost,
            activities: rows,
            budget_status: self.expenses.get_budget_status_on(today),
            category_status: self.expenses.get_category_status(),
        }
    }

    /// Whether the mapping, the activities and the ledger agree
    pub fn mapping_is_consistent(&self) -> bool {
        let mapped_ok = self.activity_expenses.iter().all(|(activity_id, expense_id)| {
            let actual = self
                .activities
                .get_activity(*activity_id)
                .and_then(Activity::actual_cost);
            let recorded = self.expenses.get_expense(*expense_id).map(Expense::amount);
            actual.is_some() && actual == recorded
        });

        let costed_mapped = self
            .activities
            .list_activities()
            .iter()
            .filter(|activity| activity.actual_cost().is_some())
            .all(|activity| self.activity_expenses.contains_key(&activity.id));

        mapped_ok && costed_mapped && self.expenses.ledger_is_consistent()
    }

    fn reconcile(&mut self, activity: &Activity) -> TravelResult<()> {
        if activity.actual_cost().is_some() {
            self.sync_activity_to_expense(activity.id)?;
        } else {
            self.remove_activity_expense(activity.id);
        }
        Ok(())
    }

    fn report_missing_expense(&self, activity_id: ActivityId, expense_id: ExpenseId) {
        tracing::error!(
            activity_id = %activity_id,
            expense_id = %expense_id,
            "mapped expense missing from ledger"
        );
        if cfg!(debug_assertions) {
            panic!("activity {activity_id} mapped to missing expense {expense_id}");
        }
    }
}

fn mirrored_expense(
    activity: &Activity,
    amount: Money,
    date: DateTime<Utc>,
) -> TravelResult<Expense> {
    Expense::new(
        amount,
        activity.activity_type.expense_category(),
        date,
        format!("Activity: {}", activity.title),
        activity.currency(),
    )
}

/// A travel manager shared between callers
///
/// Every operation runs under one lock, so read-then-write sequences such
/// as a cost sync are atomic with respect to other holders.
#[derive(Debug, Clone, Default)]
pub struct SharedTravelManager {
    inner: Arc<Mutex<IntegratedTravelManager>>,
}

impl SharedTravelManager {
    pub fn new(manager: IntegratedTravelManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// Run a read-only operation under the lock
    pub fn with<R>(&self, f: impl FnOnce(&IntegratedTravelManager) -> R) -> R {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run a mutating operation under the lock
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut IntegratedTravelManager) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
