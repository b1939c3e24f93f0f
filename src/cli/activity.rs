//! Activity CLI commands
//!
//! Activities are planned trip items. Recording an actual cost on an
//! activity records a matching expense in the ledger; changing or clearing
//! the cost updates or removes that expense.

use clap::Subcommand;

use super::{load_session, parse_datetime, parse_money, resolve_activity};
use crate::config::settings::Settings;
use crate::display::format_activity_list;
use crate::error::{TravelError, TravelResult};
use crate::models::{
    ActivityBudget, ActivityPriority, ActivityStatus, ActivityType, ActivityValidationError,
};
use crate::services::activity_manager::NewActivity;
use crate::storage::SessionStore;

/// Activity subcommands
#[derive(Subcommand, Debug)]
pub enum ActivityCommands {
    /// Plan a new activity
    Add {
        /// Activity title
        title: String,
        /// Activity type (flight, accommodation, restaurant, sightseeing, transportation,
        /// shopping, entertainment, tour, meeting, other)
        #[arg(short = 't', long = "type", default_value = "other")]
        activity_type: String,
        /// Start time (YYYY-MM-DD [HH:MM])
        #[arg(short, long)]
        start: Option<String>,
        /// End time (YYYY-MM-DD [HH:MM])
        #[arg(short, long)]
        end: Option<String>,
        /// Estimated cost
        #[arg(long)]
        estimate: Option<String>,
        /// Actual cost, recorded as an expense immediately
        #[arg(long)]
        actual: Option<String>,
        /// Currency code; defaults to the configured currency
        #[arg(long)]
        currency: Option<String>,
        /// Where it takes place
        #[arg(short, long)]
        location: Option<String>,
        /// Mark as high priority
        #[arg(long)]
        important: bool,
    },
    /// List activities of the current trip
    List {
        /// Only show activities with this status (planned, confirmed, in_progress, completed, cancelled)
        #[arg(long)]
        status: Option<String>,
    },
    /// Record what an activity actually cost
    Cost {
        /// Activity ID or ID prefix
        activity: String,
        /// Actual amount
        amount: String,
        /// Currency code
        #[arg(long)]
        currency: Option<String>,
    },
    /// Clear an activity's actual cost and its expense
    ClearCost {
        /// Activity ID or ID prefix
        activity: String,
    },
    /// Move an activity to a new time
    Schedule {
        /// Activity ID or ID prefix
        activity: String,
        /// New start time (YYYY-MM-DD [HH:MM])
        start: String,
        /// New end time (YYYY-MM-DD [HH:MM])
        #[arg(short, long)]
        end: Option<String>,
    },
    /// Delete an activity and its expense
    Delete {
        /// Activity ID or ID prefix
        activity: String,
    },
}

fn parse_status(s: &str) -> TravelResult<ActivityStatus> {
    match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
        "planned" => Ok(ActivityStatus::Planned),
        "confirmed" => Ok(ActivityStatus::Confirmed),
        "in_progress" => Ok(ActivityStatus::InProgress),
        "completed" => Ok(ActivityStatus::Completed),
        "cancelled" | "canceled" => Ok(ActivityStatus::Cancelled),
        _ => Err(TravelError::Parse(format!("Unknown activity status: {}", s))),
    }
}

/// Handle an activity command
pub fn handle_activity_command(
    store: &SessionStore,
    settings: &Settings,
    cmd: ActivityCommands,
) -> TravelResult<()> {
    let mut session = load_session(store, settings)?;
    let trip_id = session.trip_id;
    let manager = &mut session.manager;

    match cmd {
        ActivityCommands::Add {
            title,
            activity_type,
            start,
            end,
            estimate,
            actual,
            currency,
            location,
            important,
        } => {
            let activity_type: ActivityType = activity_type
                .parse()
                .map_err(|e: ActivityValidationError| TravelError::Parse(e.to_string()))?;
            let currency = currency.unwrap_or_else(|| settings.default_currency.clone());

            let mut input = NewActivity::new(title, activity_type, trip_id, session.user_id);
            input.start_date = start.as_deref().map(parse_datetime).transpose()?;
            input.end_date = end.as_deref().map(parse_datetime).transpose()?;
            input.location = location;
            if important {
                input.priority = ActivityPriority::High;
            }

            let estimate = estimate.as_deref().map(parse_money).transpose()?;
            let actual = actual.as_deref().map(parse_money).transpose()?;
            if estimate.is_some() || actual.is_some() {
                let mut budget =
                    ActivityBudget::estimated(estimate.or(actual).unwrap_or_default(), currency);
                budget.actual_cost = actual;
                input.budget = Some(budget);
            }

            if let (Some(start), Some(end)) = (input.start_date, input.end_date) {
                let conflicts = manager
                    .activities()
                    .check_schedule_conflicts(trip_id, start, end, None);
                for other in conflicts {
                    println!("Warning: overlaps with {} ({})", other.title, other.id);
                }
            }

            let activity = manager.create_activity_with_expense(input)?;
            store.save(&session)?;

            println!("Planned activity {}: {}", activity.id, activity);
            if let Some(cost) = activity.actual_cost() {
                println!(
                    "Recorded actual cost {}",
                    cost.format_with_currency(activity.currency())
                );
            }
        }

        ActivityCommands::List { status } => {
            let activities = match status {
                Some(status) => {
                    let status = parse_status(&status)?;
                    manager
                        .activities()
                        .get_activities_by_trip(trip_id)
                        .into_iter()
                        .filter(|a| a.status == status)
                        .collect()
                }
                None => manager.activities().get_activities_by_trip(trip_id),
            };
            print!("{}", format_activity_list(&activities));
        }

        ActivityCommands::Cost {
            activity,
            amount,
            currency,
        } => {
            let id = resolve_activity(manager, &activity)?;
            let amount = parse_money(&amount)?;
            manager.set_activity_actual_cost(id, amount, currency.as_deref())?;
            store.save(&session)?;

            println!("Recorded actual cost {} for activity {}", amount, id);
        }

        ActivityCommands::ClearCost { activity } => {
            let id = resolve_activity(manager, &activity)?;
            manager.clear_activity_actual_cost(id);
            store.save(&session)?;

            println!("Cleared actual cost for activity {}", id);
        }

        ActivityCommands::Schedule {
            activity,
            start,
            end,
        } => {
            let id = resolve_activity(manager, &activity)?;
            let start = parse_datetime(&start)?;
            let end = end.as_deref().map(parse_datetime).transpose()?;

            let window_end = end.unwrap_or(start + chrono::Duration::minutes(1));
            let conflicts: Vec<String> = manager
                .activities()
                .check_schedule_conflicts(trip_id, start, window_end, Some(id))
                .into_iter()
                .map(|a| format!("{} ({})", a.title, a.id))
                .collect();

            manager
                .schedule_activity(id, start, end)?
                .ok_or_else(|| TravelError::activity_not_found(id.to_string()))?;
            store.save(&session)?;

            println!("Scheduled activity {} at {}", id, start.format("%Y-%m-%d %H:%M"));
            for conflict in conflicts {
                println!("Warning: overlaps with {}", conflict);
            }
        }

        ActivityCommands::Delete { activity } => {
            let id = resolve_activity(manager, &activity)?;
            manager.delete_activity_with_expense_sync(id);
            store.save(&session)?;

            println!("Deleted activity {}", id);
        }
    }

    Ok(())
}
