//! Trip-level CLI commands
//!
//! `init` plans a trip and its budget; `status`, `categories` and `summary`
//! report on the saved session.

use chrono::{Days, NaiveDate};
use clap::Args;
use std::collections::BTreeMap;

use super::{load_session, parse_category, parse_date, parse_money};
use crate::config::settings::Settings;
use crate::display::{format_activity_summary, format_budget_status, format_category_table};
use crate::error::{TravelError, TravelResult};
use crate::models::trip::today;
use crate::models::{Budget, ExpenseCategory, Money, Trip};
use crate::services::integrated::IntegratedTravelManager;
use crate::storage::{Session, SessionStore};

/// Arguments for `init`
#[derive(Args, Debug)]
pub struct InitArgs {
    /// First day of the trip (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: String,

    /// Last day of the trip (YYYY-MM-DD); defaults to the configured trip length
    #[arg(short, long)]
    pub end: Option<String>,

    /// Total budget, e.g. 5,000,000
    #[arg(short, long)]
    pub budget: String,

    /// Optional daily spending limit
    #[arg(long)]
    pub daily_limit: Option<String>,

    /// Explicit category allocation as CATEGORY=AMOUNT (repeatable)
    #[arg(short, long = "allocate", value_name = "CATEGORY=AMOUNT")]
    pub allocations: Vec<String>,

    /// Replace an existing trip
    #[arg(long)]
    pub force: bool,
}

/// Handle `init`
pub fn handle_init_command(
    store: &SessionStore,
    settings: &Settings,
    args: InitArgs,
) -> TravelResult<()> {
    if store.exists() && !args.force {
        return Err(TravelError::Config(
            "A trip is already planned. Use --force to replace it.".into(),
        ));
    }

    let start = parse_date(&args.start)?;
    let end = match &args.end {
        Some(end) => parse_date(end)?,
        None => default_end(start, settings.default_trip_days)?,
    };
    let trip = Trip::new(start, end)?;

    let total = parse_money(&args.budget)?;
    let daily_limit = args.daily_limit.as_deref().map(parse_money).transpose()?;
    let allocations = parse_allocations(&args.allocations)?;
    let budget = Budget::new(total, daily_limit, allocations)?;

    let mut manager = IntegratedTravelManager::with_plan(trip, budget);
    manager.set_warning_threshold(settings.warning_threshold)?;
    let session = Session::new(manager);
    store.save(&session)?;

    println!("Planned trip {} ({} days)", trip, trip.total_days());
    println!(
        "Budget: {}",
        total.format_with_currency(&settings.default_currency)
    );
    println!();
    println!("Run 'travel-ledger categories' to see the allocation per category.");
    Ok(())
}

fn default_end(start: NaiveDate, trip_days: u32) -> TravelResult<NaiveDate> {
    start
        .checked_add_days(Days::new(u64::from(trip_days.saturating_sub(1))))
        .ok_or_else(|| TravelError::Parse("Trip end date out of range".into()))
}

fn parse_allocations(raw: &[String]) -> TravelResult<Option<BTreeMap<ExpenseCategory, Money>>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let mut allocations = BTreeMap::new();
    for item in raw {
        let (category, amount) = item.split_once('=').ok_or_else(|| {
            TravelError::Parse(format!("Invalid allocation '{}', expected CATEGORY=AMOUNT", item))
        })?;
        allocations.insert(parse_category(category)?, parse_money(amount)?);
    }
    Ok(Some(allocations))
}

/// Handle `status`
pub fn handle_status_command(
    store: &SessionStore,
    settings: &Settings,
    on: Option<String>,
    json: bool,
) -> TravelResult<()> {
    let session = load_session(store, settings)?;
    let expenses = session.manager.expenses();
    let date = on.as_deref().map(parse_date).transpose()?.unwrap_or_else(today);

    let (Some(status), Some(trip)) = (expenses.get_budget_status_on(date), expenses.trip()) else {
        println!("No budget configured.");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print!(
            "{}",
            format_budget_status(&status, trip, &settings.default_currency)
        );
    }
    Ok(())
}

/// Handle `categories`
pub fn handle_categories_command(
    store: &SessionStore,
    settings: &Settings,
    json: bool,
) -> TravelResult<()> {
    let session = load_session(store, settings)?;
    let statuses = session.manager.expenses().get_category_status();

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
    } else {
        print!("{}", format_category_table(&statuses));
    }
    Ok(())
}

/// Handle `summary`
pub fn handle_summary_command(
    store: &SessionStore,
    settings: &Settings,
    on: Option<String>,
    json: bool,
) -> TravelResult<()> {
    let session = load_session(store, settings)?;
    let date = on.as_deref().map(parse_date).transpose()?.unwrap_or_else(today);
    let summary = session
        .manager
        .get_activity_expense_summary_on(Some(session.trip_id), date);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", format_activity_summary(&summary));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_end() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            default_end(start, 7).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 21).unwrap()
        );
    }

    #[test]
    fn test_parse_allocations() {
        assert!(parse_allocations(&[]).unwrap().is_none());

        let parsed = parse_allocations(&["hotel=2,000,000".into(), "food=500000".into()])
            .unwrap()
            .unwrap();
        assert_eq!(
            parsed[&ExpenseCategory::Accommodation],
            Money::from_major(2_000_000)
        );
        assert_eq!(parsed[&ExpenseCategory::FoodBeverage], Money::from_major(500_000));

        assert!(parse_allocations(&["hotel".into()]).is_err());
    }
}
