//! CLI command for data export
//!
//! Writes the ledger to a file, or to stdout when no file is given.

use clap::ValueEnum;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use super::load_session;
use crate::config::settings::Settings;
use crate::error::{TravelError, TravelResult};
use crate::export::{csv, json, yaml};
use crate::storage::SessionStore;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (expenses, or category status with --categories)
    Csv,
    /// JSON format (trip, budget and expenses)
    Json,
    /// YAML format (trip, budget and expenses, human-readable)
    Yaml,
}

/// Handle `export`
pub fn handle_export_command(
    store: &SessionStore,
    settings: &Settings,
    format: ExportFormat,
    output: Option<PathBuf>,
    pretty: bool,
    categories: bool,
) -> TravelResult<()> {
    let session = load_session(store, settings)?;
    let expenses = session.manager.expenses();

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                TravelError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    match format {
        ExportFormat::Csv if categories => csv::export_category_status_csv(expenses, &mut writer)?,
        ExportFormat::Csv => csv::export_expenses_csv(expenses, &mut writer)?,
        ExportFormat::Json => json::export_ledger_json(expenses, &mut writer, pretty)?,
        ExportFormat::Yaml => yaml::export_ledger_yaml(expenses, &mut writer)?,
    }
    writer
        .flush()
        .map_err(|e| TravelError::Export(e.to_string()))?;
    drop(writer);

    if let Some(path) = output {
        eprintln!(
            "Exported {} expenses to: {}",
            expenses.expense_count(),
            path.display()
        );
    } else if matches!(format, ExportFormat::Json) {
        println!();
    }

    Ok(())
}
