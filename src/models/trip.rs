//! Trip model
//!
//! A trip is an inclusive date range. Day counts relative to "today" are
//! derived on demand; every derivation has an `_on` form that takes the
//! reference date explicitly.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TravelError, TravelResult};

/// The date range a budget is planned against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TripRecord")]
pub struct Trip {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

#[derive(Deserialize)]
struct TripRecord {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl TryFrom<TripRecord> for Trip {
    type Error = TravelError;

    fn try_from(record: TripRecord) -> Result<Self, Self::Error> {
        Trip::new(record.start_date, record.end_date)
    }
}

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl Trip {
    /// Create a trip
    ///
    /// Fails with [`TravelError::InvalidDateRange`] unless `end_date` is after `start_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> TravelResult<Self> {
        if end_date <= start_date {
            return Err(TravelError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Number of calendar days in the trip, both ends included
    pub fn total_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Days of the trip already behind `today`, clamped to `0..=total_days`
    pub fn days_elapsed_on(&self, today: NaiveDate) -> i64 {
        (today - self.start_date)
            .num_days()
            .clamp(0, self.total_days())
    }

    /// Days of the trip still ahead of `today`, including `today` itself
    pub fn days_remaining_on(&self, today: NaiveDate) -> i64 {
        self.total_days() - self.days_elapsed_on(today)
    }

    /// Whether `today` falls inside the trip
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.contains(today)
    }

    pub fn days_elapsed(&self) -> i64 {
        self.days_elapsed_on(today())
    }

    pub fn days_remaining(&self) -> i64 {
        self.days_remaining_on(today())
    }

    pub fn is_active(&self) -> bool {
        self.is_active_on(today())
    }

    /// Whether `date` lies within the inclusive range
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {} ({} days)",
            self.start_date,
            self.end_date,
            self.total_days()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_trip() -> Trip {
        Trip::new(date(2024, 1, 15), date(2024, 1, 20)).unwrap()
    }

    #[test]
    fn test_total_days_inclusive() {
        assert_eq!(sample_trip().total_days(), 6);
    }

    #[test]
    fn test_invalid_range() {
        let same_day = Trip::new(date(2024, 1, 15), date(2024, 1, 15));
        assert!(matches!(same_day, Err(TravelError::InvalidDateRange { .. })));

        let reversed = Trip::new(date(2024, 1, 20), date(2024, 1, 15));
        assert!(reversed.is_err());
    }

    #[test]
    fn test_before_trip() {
        let trip = sample_trip();
        let today = date(2024, 1, 10);
        assert_eq!(trip.days_elapsed_on(today), 0);
        assert_eq!(trip.days_remaining_on(today), 6);
        assert!(!trip.is_active_on(today));
    }

    #[test]
    fn test_during_trip() {
        let trip = sample_trip();

        assert_eq!(trip.days_elapsed_on(date(2024, 1, 15)), 0);
        assert!(trip.is_active_on(date(2024, 1, 15)));

        let today = date(2024, 1, 18);
        assert_eq!(trip.days_elapsed_on(today), 3);
        assert_eq!(trip.days_remaining_on(today), 3);
        assert!(trip.is_active_on(today));

        assert_eq!(trip.days_remaining_on(date(2024, 1, 20)), 1);
    }

    #[test]
    fn test_after_trip() {
        let trip = sample_trip();
        let today = date(2024, 2, 1);
        assert_eq!(trip.days_elapsed_on(today), 6);
        assert_eq!(trip.days_remaining_on(today), 0);
        assert!(!trip.is_active_on(today));
    }

    #[test]
    fn test_serialization_validates() {
        let trip = sample_trip();
        let json = serde_json::to_string(&trip).unwrap();
        assert_eq!(serde_json::from_str::<Trip>(&json).unwrap(), trip);

        let bad = r#"{"start_date":"2024-01-20","end_date":"2024-01-15"}"#;
        assert!(serde_json::from_str::<Trip>(bad).is_err());
    }
}
