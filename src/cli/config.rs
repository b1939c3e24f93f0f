//! Config CLI command
//!
//! Shows paths and settings, or changes a single setting.

use clap::Subcommand;

use crate::config::paths::TravelPaths;
use crate::config::settings::Settings;
use crate::error::TravelResult;

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show paths and current settings
    Show,
    /// Change a setting (default_currency, date_format, warning_threshold, default_trip_days)
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
}

/// Handle a config command
pub fn handle_config_command(
    paths: &TravelPaths,
    settings: &mut Settings,
    cmd: Option<ConfigCommands>,
) -> TravelResult<()> {
    match cmd.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => {
            println!("travel-ledger Configuration");
            println!("===========================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Session file:     {}", paths.session_file().display());
            println!();
            println!("Settings:");
            println!("  default_currency:  {}", settings.default_currency);
            println!("  date_format:       {}", settings.date_format);
            println!("  warning_threshold: {}", settings.warning_threshold);
            println!("  default_trip_days: {}", settings.default_trip_days);
        }
        ConfigCommands::Set { key, value } => {
            settings.set_value(&key, &value)?;
            settings.save(paths)?;
            println!("Set {} = {}", key, value);
        }
    }

    Ok(())
}
