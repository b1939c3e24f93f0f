//! Activity manager
//!
//! In-memory store of trip activities with CRUD, scheduling and conflict
//! queries. Lookup misses return `None` rather than an error; validation
//! failures are reported as `TravelError::Validation` and leave the stored
//! activity untouched.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::error::{TravelError, TravelResult};
use crate::models::{
    Activity, ActivityBudget, ActivityId, ActivityPriority, ActivityStatus, ActivityType, TripId,
    UserId,
};

/// Input for creating an activity
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub title: String,
    pub description: String,
    pub activity_type: ActivityType,
    pub trip_id: TripId,
    pub created_by: UserId,
    pub priority: ActivityPriority,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub budget: Option<ActivityBudget>,
    pub tags: Vec<String>,
    pub notes: String,
}

impl NewActivity {
    pub fn new(
        title: impl Into<String>,
        activity_type: ActivityType,
        trip_id: TripId,
        created_by: UserId,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            activity_type,
            trip_id,
            created_by,
            priority: ActivityPriority::default(),
            start_date: None,
            end_date: None,
            location: None,
            budget: None,
            tags: Vec::new(),
            notes: String::new(),
        }
    }

    pub fn with_budget(mut self, budget: ActivityBudget) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn scheduled(mut self, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        self.start_date = Some(start);
        self.end_date = end;
        self
    }
}

/// Partial update of an activity
///
/// `None` leaves a field unchanged. For clearable fields the inner option
/// distinguishes "set" (`Some(Some(_))`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct ActivityUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub activity_type: Option<ActivityType>,
    pub status: Option<ActivityStatus>,
    pub priority: Option<ActivityPriority>,
    pub start_date: Option<Option<DateTime<Utc>>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub location: Option<Option<String>>,
    pub budget: Option<Option<ActivityBudget>>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl ActivityUpdate {
    fn apply(self, activity: &mut Activity) {
        if let Some(title) = self.title {
            activity.title = title;
        }
        if let Some(description) = self.description {
            activity.description = description;
        }
        if let Some(activity_type) = self.activity_type {
            activity.activity_type = activity_type;
        }
        if let Some(status) = self.status {
            activity.status = status;
        }
        if let Some(priority) = self.priority {
            activity.priority = priority;
        }
        if let Some(start_date) = self.start_date {
            activity.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            activity.end_date = end_date;
        }
        if let Some(location) = self.location {
            activity.location = location;
        }
        if let Some(budget) = self.budget {
            activity.budget = budget;
        }
        if let Some(tags) = self.tags {
            activity.tags = tags;
        }
        if let Some(notes) = self.notes {
            activity.notes = notes;
        }
    }
}

/// Store of activities keyed by id
#[derive(Debug, Default)]
pub struct ActivityManager {
    activities: HashMap<ActivityId, Activity>,
}

impl ActivityManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from previously saved activities
    pub fn from_activities(activities: impl IntoIterator<Item = Activity>) -> TravelResult<Self> {
        let mut manager = Self::new();
        for activity in activities {
            activity
                .validate()
                .map_err(|e| TravelError::Validation(e.to_string()))?;
            if manager.activities.contains_key(&activity.id) {
                return Err(TravelError::Validation(format!(
                    "Duplicate activity id: {}",
                    activity.id
                )));
            }
            manager.activities.insert(activity.id, activity);
        }
        Ok(manager)
    }

    /// Create and store a new activity
    pub fn create_activity(&mut self, input: NewActivity) -> TravelResult<Activity> {
        let mut activity = Activity::new(
            input.title.trim(),
            input.activity_type,
            input.trip_id,
            input.created_by,
        );
        activity.description = input.description;
        activity.priority = input.priority;
        activity.start_date = input.start_date;
        activity.end_date = input.end_date;
        activity.location = input.location;
        activity.budget = input.budget;
        activity.tags = input.tags;
        activity.notes = input.notes;

        activity
            .validate()
            .map_err(|e| TravelError::Validation(e.to_string()))?;

        tracing::debug!(activity_id = %activity.id, title = %activity.title, "activity created");
        self.activities.insert(activity.id, activity.clone());
        Ok(activity)
    }

    pub fn get_activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.get(&id)
    }

    /// Find an activity by full id or by a unique id prefix
    pub fn find_activity(&self, identifier: &str) -> Option<&Activity> {
        if let Ok(id) = identifier.parse::<ActivityId>() {
            return self.activities.get(&id);
        }

        let mut matches = self
            .activities
            .values()
            .filter(|a| a.id.matches_prefix(identifier));
        match (matches.next(), matches.next()) {
            (Some(activity), None) => Some(activity),
            _ => None,
        }
    }

    pub fn get_activities_by_trip(&self, trip_id: TripId) -> Vec<&Activity> {
        self.collect_sorted(|a| a.trip_id == trip_id)
    }

    pub fn get_activities_by_user(&self, user_id: UserId) -> Vec<&Activity> {
        self.collect_sorted(|a| a.created_by == user_id)
    }

    pub fn get_activities_by_status(&self, status: ActivityStatus) -> Vec<&Activity> {
        self.collect_sorted(|a| a.status == status)
    }

    /// All activities ordered by start time, unscheduled last
    pub fn list_activities(&self) -> Vec<&Activity> {
        self.collect_sorted(|_| true)
    }

    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    /// Apply `update` to an activity
    ///
    /// Returns `Ok(None)` if the activity does not exist.
    pub fn update_activity(
        &mut self,
        id: ActivityId,
        update: ActivityUpdate,
    ) -> TravelResult<Option<Activity>> {
        let Some(existing) = self.activities.get(&id) else {
            return Ok(None);
        };

        let mut updated = existing.clone();
        update.apply(&mut updated);
        updated
            .validate()
            .map_err(|e| TravelError::Validation(e.to_string()))?;
        updated.updated_at = Utc::now();

        tracing::debug!(activity_id = %id, "activity updated");
        self.activities.insert(id, updated.clone());
        Ok(Some(updated))
    }

    /// Set an activity's scheduled window
    pub fn schedule_activity(
        &mut self,
        id: ActivityId,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> TravelResult<Option<Activity>> {
        self.update_activity(
            id,
            ActivityUpdate {
                start_date: Some(Some(start)),
                end_date: Some(end),
                ..Default::default()
            },
        )
    }

    /// Remove an activity, returning it if it existed
    pub fn delete_activity(&mut self, id: ActivityId) -> Option<Activity> {
        let removed = self.activities.remove(&id);
        if removed.is_some() {
            tracing::debug!(activity_id = %id, "activity deleted");
        }
        removed
    }

    /// Non-cancelled activities in `trip_id` whose schedule overlaps `[start, end)`
    pub fn check_schedule_conflicts(
        &self,
        trip_id: TripId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<ActivityId>,
    ) -> Vec<&Activity> {
        self.collect_sorted(|a| {
            a.trip_id == trip_id
                && Some(a.id) != exclude
                && !a.is_cancelled()
                && a.overlaps(start, end)
        })
    }

    pub(crate) fn get_activity_mut(&mut self, id: ActivityId) -> Option<&mut Activity> {
        self.activities.get_mut(&id)
    }

    fn collect_sorted(&self, predicate: impl Fn(&Activity) -> bool) -> Vec<&Activity> {
        let mut found: Vec<&Activity> = self.activities.values().filter(|a| predicate(a)).collect();
        found.sort_by(|a, b| {
            let a_start = (a.start_date.is_none(), a.start_date);
            let b_start = (b.start_date.is_none(), b.start_date);
            a_start
                .cmp(&b_start)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        found
    }
}
