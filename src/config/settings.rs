//! User settings for travel-ledger
//!
//! Manages user preferences such as the default currency, the date format
//! used for display, and the category warning threshold.

use serde::{Deserialize, Serialize};

use super::paths::TravelPaths;
use crate::error::TravelError;
use crate::models::DEFAULT_CURRENCY;
use crate::services::expense_manager::DEFAULT_WARNING_THRESHOLD;

/// User settings for travel-ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency code applied when none is given
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Usage percentage above which a category is flagged `WARNING`
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: f64,

    /// Trip length used by `init` when no end date is given
    #[serde(default = "default_trip_days")]
    pub default_trip_days: u32,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_warning_threshold() -> f64 {
    DEFAULT_WARNING_THRESHOLD
}

fn default_trip_days() -> u32 {
    7
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_currency: default_currency(),
            date_format: default_date_format(),
            warning_threshold: default_warning_threshold(),
            default_trip_days: default_trip_days(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &TravelPaths) -> Result<Self, TravelError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| TravelError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| TravelError::Config(format!("Failed to parse settings file: {}", e)))?;
        settings.validate()?;

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TravelPaths) -> Result<(), TravelError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TravelError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TravelError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), TravelError> {
        if !(0.0..=100.0).contains(&self.warning_threshold) {
            return Err(TravelError::Config(format!(
                "warning_threshold must be between 0 and 100, got {}",
                self.warning_threshold
            )));
        }
        if self.default_trip_days < 2 {
            return Err(TravelError::Config(
                "default_trip_days must be at least 2".into(),
            ));
        }
        if self.default_currency.trim().is_empty() {
            return Err(TravelError::Config("default_currency cannot be empty".into()));
        }
        Ok(())
    }

    /// Set one setting by name from its string form
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), TravelError> {
        let parse_err = |e: &dyn std::fmt::Display| {
            TravelError::Config(format!("Invalid value '{}' for {}: {}", value, key, e))
        };

        let mut updated = self.clone();
        match key {
            "default_currency" => updated.default_currency = value.trim().to_uppercase(),
            "date_format" => updated.date_format = value.to_string(),
            "warning_threshold" => {
                updated.warning_threshold = value.parse().map_err(|e| parse_err(&e))?
            }
            "default_trip_days" => {
                updated.default_trip_days = value.parse().map_err(|e| parse_err(&e))?
            }
            _ => return Err(TravelError::Config(format!("Unknown setting: {}", key))),
        }
        updated.validate()?;

        *self = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_currency, "VND");
        assert_eq!(settings.date_format, "%Y-%m-%d");
        assert_eq!(settings.warning_threshold, 80.0);
        assert_eq!(settings.default_trip_days, 7);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TravelPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.default_currency = "USD".into();
        settings.warning_threshold = 75.0;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"default_currency": "EUR"}"#).unwrap();
        assert_eq!(settings.default_currency, "EUR");
        assert_eq!(settings.warning_threshold, 80.0);
        assert_eq!(settings.schema_version, 1);
    }

    #[test]
    fn test_set_value() {
        let mut settings = Settings::default();
        settings.set_value("warning_threshold", "90").unwrap();
        settings.set_value("default_currency", "usd").unwrap();
        assert_eq!(settings.warning_threshold, 90.0);
        assert_eq!(settings.default_currency, "USD");

        assert!(settings.set_value("warning_threshold", "120").is_err());
        assert!(settings.set_value("warning_threshold", "lots").is_err());
        assert!(settings.set_value("colour", "blue").is_err());
        assert_eq!(settings.warning_threshold, 90.0);
    }
}
