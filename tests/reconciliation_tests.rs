use chrono::{NaiveDate, TimeZone, Utc};

use travel_ledger::models::{
    ActivityBudget, ActivityType, Budget, Expense, ExpenseCategory, Money, Trip, TripId, UserId,
};
use travel_ledger::services::{
    ActivityUpdate, BurnRateStatus, CategoryHealth, IntegratedTravelManager, NewActivity,
};
use travel_ledger::storage::{Session, SessionStore};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn six_day_manager() -> IntegratedTravelManager {
    let trip = Trip::new(date(2024, 1, 15), date(2024, 1, 20)).unwrap();
    let budget = Budget::with_defaults(Money::from_major(10_000_000)).unwrap();
    IntegratedTravelManager::with_plan(trip, budget)
}

fn dinner(trip_id: TripId, user_id: UserId, actual: Option<Money>) -> NewActivity {
    let mut cost = ActivityBudget::estimated(Money::from_major(600_000), "VND");
    cost.actual_cost = actual;
    NewActivity::new("Seafood dinner", ActivityType::Restaurant, trip_id, user_id)
        .scheduled(Utc.with_ymd_and_hms(2024, 1, 16, 19, 0, 0).unwrap(), None)
        .with_budget(cost)
}

#[test]
fn test_actual_cost_change_moves_category_spending() {
    let mut manager = six_day_manager();
    let trip_id = TripId::new();
    let user_id = UserId::new();

    let activity = manager
        .create_activity_with_expense(dinner(trip_id, user_id, Some(Money::from_major(650_000))))
        .unwrap();
    let expense_id = manager.mapped_expense(activity.id).unwrap();
    assert_eq!(
        manager
            .expenses()
            .get_category_spending(ExpenseCategory::FoodBeverage),
        Money::from_major(650_000)
    );

    manager
        .set_activity_actual_cost(activity.id, Money::from_major(700_000), None)
        .unwrap();

    let expenses = manager.expenses();
    assert_eq!(
        expenses.get_category_spending(ExpenseCategory::FoodBeverage),
        Money::from_major(700_000)
    );
    assert_eq!(expenses.get_total_spent(), Money::from_major(700_000));
    assert_eq!(expenses.expense_count(), 1);
    assert_eq!(manager.mapped_expense(activity.id), Some(expense_id));
    assert!(manager.mapping_is_consistent());
}

#[test]
fn test_sync_is_idempotent() {
    let mut manager = six_day_manager();
    let activity = manager
        .create_activity_with_expense(dinner(
            TripId::new(),
            UserId::new(),
            Some(Money::from_major(650_000)),
        ))
        .unwrap();

    let first = manager.sync_activity_to_expense(activity.id).unwrap();
    let second = manager.sync_activity_to_expense(activity.id).unwrap();

    assert_eq!(first, second);
    assert_eq!(manager.expenses().expense_count(), 1);
    assert_eq!(
        manager.expenses().get_total_spent(),
        Money::from_major(650_000)
    );
}

#[test]
fn test_activity_without_actual_cost_has_no_expense() {
    let mut manager = six_day_manager();
    let activity = manager
        .create_activity_with_expense(dinner(TripId::new(), UserId::new(), None))
        .unwrap();

    assert!(manager.mapped_expense(activity.id).is_none());
    assert_eq!(
        manager.sync_activity_to_expense(activity.id).unwrap(),
        None
    );
    assert_eq!(manager.expenses().expense_count(), 0);
}

#[test]
fn test_type_change_moves_expense_between_categories() {
    let mut manager = six_day_manager();
    let activity = manager
        .create_activity_with_expense(dinner(
            TripId::new(),
            UserId::new(),
            Some(Money::from_major(400_000)),
        ))
        .unwrap();

    let update = ActivityUpdate {
        activity_type: Some(ActivityType::Tour),
        ..Default::default()
    };
    manager
        .update_activity_with_expense_sync(activity.id, update)
        .unwrap()
        .unwrap();

    let expenses = manager.expenses();
    assert_eq!(
        expenses.get_category_spending(ExpenseCategory::FoodBeverage),
        Money::zero()
    );
    assert_eq!(
        expenses.get_category_spending(ExpenseCategory::Activities),
        Money::from_major(400_000)
    );
    assert!(manager.mapping_is_consistent());
}

#[test]
fn test_clearing_and_deleting_release_spending() {
    let mut manager = six_day_manager();
    let trip_id = TripId::new();
    let user_id = UserId::new();

    let kept = manager
        .create_activity_with_expense(dinner(trip_id, user_id, Some(Money::from_major(300_000))))
        .unwrap();
    let deleted = manager
        .create_activity_with_expense(dinner(trip_id, user_id, Some(Money::from_major(200_000))))
        .unwrap();
    manager.add_expense(
        Expense::now(Money::from_major(50_000), ExpenseCategory::Shopping, "Postcards").unwrap(),
    );

    assert!(manager.delete_activity_with_expense_sync(deleted.id));
    assert_eq!(
        manager.expenses().get_total_spent(),
        Money::from_major(350_000)
    );

    assert!(manager.clear_activity_actual_cost(kept.id));
    assert!(manager.mapped_expense(kept.id).is_none());
    assert_eq!(
        manager.expenses().get_total_spent(),
        Money::from_major(50_000)
    );
    assert_eq!(manager.mapping().len(), 0);
    assert!(manager.mapping_is_consistent());
}

#[test]
fn test_mirrored_expense_cannot_be_removed_directly() {
    let mut manager = six_day_manager();
    let activity = manager
        .create_activity_with_expense(dinner(
            TripId::new(),
            UserId::new(),
            Some(Money::from_major(650_000)),
        ))
        .unwrap();
    let expense_id = manager.mapped_expense(activity.id).unwrap();

    assert!(manager.remove_expense(expense_id).is_err());
    assert!(manager.expenses().contains_expense(expense_id));
}

#[test]
fn test_budget_status_for_six_day_trip() {
    let mut manager = six_day_manager();
    manager.add_expense(
        Expense::new(
            Money::from_major(3_000_000),
            ExpenseCategory::Accommodation,
            Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap(),
            "Hotel, 3 nights",
            "VND",
        )
        .unwrap(),
    );

    let status = manager
        .expenses()
        .get_budget_status_on(date(2024, 1, 17))
        .unwrap();
    assert_eq!(status.days_total, 6);
    assert_eq!(status.total_spent, Money::from_major(3_000_000));
    assert_eq!(status.remaining_budget, Money::from_major(7_000_000));
    assert!((status.percentage_used - 30.0).abs() < 1e-9);

    let after = manager
        .expenses()
        .get_budget_status_on(date(2024, 1, 25))
        .unwrap();
    assert_eq!(after.days_remaining, 0);
    assert_eq!(after.burn_rate_status, BurnRateStatus::Completed);
    assert_eq!(after.recommended_daily_spending, Money::zero());

    let categories = manager.expenses().get_category_status();
    let accommodation = &categories[&ExpenseCategory::Accommodation];
    assert_eq!(accommodation.allocated, Money::from_major(3_000_000));
    assert_eq!(accommodation.status, CategoryHealth::Warning);
}

#[test]
fn test_session_survives_save_and_load() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let store = SessionStore::with_path(temp_dir.path().join("session.json"));

    let mut session = Session::new(six_day_manager());
    let activity = session
        .manager
        .create_activity_with_expense(dinner(
            session.trip_id,
            session.user_id,
            Some(Money::from_major(650_000)),
        ))
        .unwrap();
    store.save(&session).unwrap();

    let mut loaded = store.load().unwrap();
    assert_eq!(loaded.trip_id, session.trip_id);
    assert_eq!(
        loaded.manager.mapped_expense(activity.id),
        session.manager.mapped_expense(activity.id)
    );
    assert_eq!(
        loaded.manager.expenses().get_total_spent(),
        Money::from_major(650_000)
    );

    loaded
        .manager
        .set_activity_actual_cost(activity.id, Money::from_major(700_000), None)
        .unwrap();
    assert_eq!(loaded.manager.expenses().expense_count(), 1);
    assert_eq!(
        loaded.manager.expenses().get_total_spent(),
        Money::from_major(700_000)
    );
}
