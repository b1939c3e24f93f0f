//! Path management for travel-ledger
//!
//! ## Path Resolution Order
//!
//! 1. `TRAVEL_LEDGER_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory for `travel-ledger`
//!    (`~/.config/travel-ledger` on Linux, `%APPDATA%\travel-ledger` on Windows)

use directories::ProjectDirs;
use std::path::PathBuf;

use crate::error::TravelError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "TRAVEL_LEDGER_DATA_DIR";

/// Manages all paths used by travel-ledger
#[derive(Debug, Clone)]
pub struct TravelPaths {
    /// Base directory for all travel-ledger data
    base_dir: PathBuf,
}

impl TravelPaths {
    /// Create a new TravelPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no platform configuration directory can be found
    /// and no override is set.
    pub fn new() -> Result<Self, TravelError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            ProjectDirs::from("", "", "travel-ledger")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    TravelError::Config("Could not determine a configuration directory".into())
                })?
        };

        Ok(Self { base_dir })
    }

    /// Create TravelPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the export directory (`<base>/exports/`)
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the persisted session (trip, budget, ledger, activities)
    pub fn session_file(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), TravelError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TravelError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| TravelError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check whether a session has been initialized
    pub fn is_initialized(&self) -> bool {
        self.session_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TravelPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.export_dir(), temp_dir.path().join("exports"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var(DATA_DIR_ENV, custom_path);
        let paths = TravelPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());
        env::remove_var(DATA_DIR_ENV);
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TravelPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();
        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TravelPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.session_file(),
            temp_dir.path().join("data").join("session.json")
        );
    }
}
