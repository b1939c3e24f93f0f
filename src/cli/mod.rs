//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod activity;
pub mod config;
pub mod expense;
pub mod export;
pub mod trip;

pub use activity::{handle_activity_command, ActivityCommands};
pub use config::{handle_config_command, ConfigCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportFormat};
pub use trip::{
    handle_categories_command, handle_init_command, handle_status_command, handle_summary_command,
    InitArgs,
};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::config::settings::Settings;
use crate::error::{TravelError, TravelResult};
use crate::models::{ActivityId, ExpenseCategory, ExpenseId, Money};
use crate::services::integrated::IntegratedTravelManager;
use crate::storage::{Session, SessionStore};

/// Load the saved session, failing with a hint if none exists
///
/// The configured warning threshold replaces the one saved with the session.
pub(crate) fn load_session(store: &SessionStore, settings: &Settings) -> TravelResult<Session> {
    if !store.exists() {
        return Err(TravelError::Config(
            "No trip planned yet. Run 'travel-ledger init' first.".into(),
        ));
    }
    let mut session = store.load()?;
    session
        .manager
        .set_warning_threshold(settings.warning_threshold)?;
    Ok(session)
}

pub(crate) fn parse_money(s: &str) -> TravelResult<Money> {
    Money::parse(s).map_err(|e| TravelError::Parse(e.to_string()))
}

pub(crate) fn parse_category(s: &str) -> TravelResult<ExpenseCategory> {
    s.parse().map_err(|e: crate::models::CategoryParseError| TravelError::Parse(e.to_string()))
}

pub(crate) fn parse_date(s: &str) -> TravelResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| TravelError::Parse(format!("Invalid date '{}', expected YYYY-MM-DD", s)))
}

/// Parse a timestamp as UTC
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM`, `YYYY-MM-DDTHH:MM` or a bare date
/// (midnight).
pub(crate) fn parse_datetime(s: &str) -> TravelResult<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    parse_date(s)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| {
            TravelError::Parse(format!(
                "Invalid date/time '{}', expected YYYY-MM-DD [HH:MM]",
                s
            ))
        })
}

/// Resolve an activity by full id or unique prefix
pub(crate) fn resolve_activity(
    manager: &IntegratedTravelManager,
    identifier: &str,
) -> TravelResult<ActivityId> {
    manager
        .activities()
        .find_activity(identifier)
        .map(|a| a.id)
        .ok_or_else(|| TravelError::activity_not_found(identifier))
}

/// Resolve an expense by full id or unique prefix
pub(crate) fn resolve_expense(
    manager: &IntegratedTravelManager,
    identifier: &str,
) -> TravelResult<ExpenseId> {
    if let Ok(id) = identifier.parse::<ExpenseId>() {
        if manager.expenses().contains_expense(id) {
            return Ok(id);
        }
    }

    let mut matches = manager
        .expenses()
        .entries()
        .iter()
        .filter(|entry| entry.id.matches_prefix(identifier));
    match (matches.next(), matches.next()) {
        (Some(entry), None) => Ok(entry.id),
        _ => Err(TravelError::expense_not_found(identifier)),
    }
}
