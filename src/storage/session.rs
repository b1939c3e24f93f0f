//! Session persistence
//!
//! Saves a [`Session`] (an [`IntegratedTravelManager`] plus the trip and
//! user it acts for) to `session.json` and restores it. Only inputs are
//! stored (trip, budget definition, ledger, activities and the
//! activity-expense mapping); category totals are re-derived from the
//! ledger on restore.
//!
//! Saves go through `session.json.tmp` and a rename, so an interrupted save
//! leaves the previous session intact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::paths::TravelPaths;
use crate::error::{TravelError, TravelResult};
use crate::export::json::{LedgerExport, EXPORT_SCHEMA_VERSION};
use crate::models::{Activity, ActivityId, BudgetDefinition, ExpenseId, Trip, TripId, UserId};
use crate::services::activity_manager::ActivityManager;
use crate::services::expense_manager::{ExpenseManager, LedgerEntry, DEFAULT_WARNING_THRESHOLD};
use crate::services::integrated::IntegratedTravelManager;

/// Current session file schema version
pub const SESSION_SCHEMA_VERSION: u32 = 1;

fn default_warning_threshold() -> f64 {
    DEFAULT_WARNING_THRESHOLD
}

/// A travel manager together with the trip and user it acts for
#[derive(Debug)]
pub struct Session {
    pub trip_id: TripId,
    pub user_id: UserId,
    pub manager: IntegratedTravelManager,
}

impl Session {
    /// Start a session with fresh trip and user ids
    pub fn new(manager: IntegratedTravelManager) -> Self {
        Self {
            trip_id: TripId::new(),
            user_id: UserId::new(),
            manager,
        }
    }
}

/// Serializable state of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    pub trip_id: TripId,
    pub user_id: UserId,

    #[serde(default)]
    pub trip: Option<Trip>,

    #[serde(default)]
    pub budget: Option<BudgetDefinition>,

    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: f64,

    #[serde(default)]
    pub expenses: Vec<LedgerEntry>,

    #[serde(default)]
    pub activities: Vec<Activity>,

    #[serde(default)]
    pub activity_expenses: BTreeMap<ActivityId, ExpenseId>,
}

impl SessionSnapshot {
    /// Capture the current state of `session`
    pub fn capture(session: &Session) -> Self {
        let manager = &session.manager;
        let expenses = manager.expenses();
        Self {
            schema_version: SESSION_SCHEMA_VERSION,
            saved_at: Utc::now(),
            trip_id: session.trip_id,
            user_id: session.user_id,
            trip: expenses.trip().copied(),
            budget: expenses.budget().map(|b| b.definition()),
            warning_threshold: expenses.warning_threshold(),
            expenses: expenses.entries().to_vec(),
            activities: manager
                .activities()
                .list_activities()
                .into_iter()
                .cloned()
                .collect(),
            activity_expenses: manager
                .mapping()
                .iter()
                .map(|(activity_id, expense_id)| (*activity_id, *expense_id))
                .collect(),
        }
    }

    /// Rebuild the session, re-deriving every running total
    pub fn restore(self) -> TravelResult<Session> {
        if self.schema_version != SESSION_SCHEMA_VERSION {
            return Err(TravelError::Storage(format!(
                "Unsupported session schema version {} (expected {})",
                self.schema_version, SESSION_SCHEMA_VERSION
            )));
        }

        let ledger = LedgerExport {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: self.saved_at,
            trip: self.trip,
            budget: self.budget,
            expenses: self.expenses,
        };
        let mut expenses = ExpenseManager::from_export(&ledger)?;
        expenses.set_warning_threshold(self.warning_threshold)?;

        let activities = ActivityManager::from_activities(self.activities)?;

        let manager = IntegratedTravelManager::from_parts(
            activities,
            expenses,
            self.activity_expenses.into_iter().collect(),
        )?;

        Ok(Session {
            trip_id: self.trip_id,
            user_id: self.user_id,
            manager,
        })
    }
}

/// File-backed store for one session
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(paths: &TravelPaths) -> Self {
        Self::with_path(paths.session_file())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load and restore the saved session
    pub fn load(&self) -> TravelResult<Session> {
        let session = self.read_snapshot()?.restore()?;

        tracing::info!(
            path = %self.path.display(),
            expenses = session.manager.expenses().expense_count(),
            activities = session.manager.activities().activity_count(),
            "session loaded"
        );
        Ok(session)
    }

    /// Save `session` atomically
    pub fn save(&self, session: &Session) -> TravelResult<()> {
        self.write_snapshot(&SessionSnapshot::capture(session))?;
        tracing::info!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    fn storage_error(&self, action: &str, err: impl std::fmt::Display) -> TravelError {
        TravelError::Storage(format!(
            "Failed to {} session file {}: {}",
            action,
            self.path.display(),
            err
        ))
    }

    fn read_snapshot(&self) -> TravelResult<SessionSnapshot> {
        let file = File::open(&self.path).map_err(|e| self.storage_error("open", e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            TravelError::Storage(format!(
                "Session file {} is not a valid schema {} session: {}",
                self.path.display(),
                SESSION_SCHEMA_VERSION,
                e
            ))
        })
    }

    fn write_snapshot(&self, snapshot: &SessionSnapshot) -> TravelResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.storage_error("create directory for", e))?;
        }

        let temp_path = self.temp_path();
        let file = File::create(&temp_path).map_err(|e| self.storage_error("stage", e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, snapshot)
            .map_err(|e| self.storage_error("serialize", e))?;
        writer.flush().map_err(|e| self.storage_error("flush", e))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| self.storage_error("sync", e))?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            self.storage_error("replace", e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityBudget, ActivityType, Budget, Expense, ExpenseCategory, Money};
    use crate::services::activity_manager::NewActivity;
    use chrono::{NaiveDate, TimeZone};
    use tempfile::TempDir;

    fn populated_session() -> Session {
        let trip = Trip::new(
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        )
        .unwrap();
        let mut manager = IntegratedTravelManager::with_plan(
            trip,
            Budget::with_defaults(Money::from_major(5_000_000)).unwrap(),
        );
        manager.set_warning_threshold(70.0).unwrap();
        let mut session = Session::new(manager);
        let manager = &mut session.manager;
        let trip_id = session.trip_id;

        let budget = ActivityBudget::estimated(Money::from_major(600_000), "VND")
            .with_actual(Money::from_major(650_000));
        manager
            .create_activity_with_expense(
                NewActivity::new("Hotel", ActivityType::Accommodation, trip_id, session.user_id)
                    .with_budget(budget),
            )
            .unwrap();
        manager.add_expense(
            Expense::new(
                Money::from_major(90_000),
                ExpenseCategory::FoodBeverage,
                Utc.with_ymd_and_hms(2024, 1, 16, 12, 0, 0).unwrap(),
                "Lunch",
                "VND",
            )
            .unwrap(),
        );
        session
    }

    #[test]
    fn test_save_and_load_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_path(temp_dir.path().join("session.json"));
        let session = populated_session();
        let manager = &session.manager;

        assert!(!store.exists());
        store.save(&session).unwrap();
        assert!(store.exists());

        let loaded_session = store.load().unwrap();
        assert_eq!(loaded_session.trip_id, session.trip_id);
        assert_eq!(loaded_session.user_id, session.user_id);
        let loaded = &loaded_session.manager;
        assert_eq!(loaded.mapping(), manager.mapping());
        assert_eq!(loaded.expenses().entries(), manager.expenses().entries());
        assert_eq!(loaded.activities().activity_count(), 1);
        assert_eq!(loaded.expenses().warning_threshold(), 70.0);
        assert_eq!(
            loaded.expenses().get_category_status(),
            manager.expenses().get_category_status()
        );
        assert!(loaded.mapping_is_consistent());
    }

    #[test]
    fn test_load_missing_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_path(temp_dir.path().join("session.json"));
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("session.json"));
    }

    #[test]
    fn test_save_creates_directories_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_path(temp_dir.path().join("data").join("session.json"));

        store.save(&populated_session()).unwrap();
        assert!(store.exists());
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_load_malformed_session_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_path(temp_dir.path().join("session.json"));
        std::fs::write(store.path(), "{ not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, TravelError::Storage(_)));
        assert!(err.to_string().contains("schema 1"));
    }

    #[test]
    fn test_restore_rejects_tampered_mapping() {
        let mut snapshot = SessionSnapshot::capture(&populated_session());
        snapshot.activity_expenses.clear();
        assert!(snapshot.restore().is_err());
    }

    #[test]
    fn test_restore_rejects_unknown_schema() {
        let mut snapshot = SessionSnapshot::capture(&populated_session());
        snapshot.schema_version = 99;
        assert!(snapshot.restore().is_err());
    }
}
