use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use travel_ledger::cli::{
    handle_activity_command, handle_categories_command, handle_config_command,
    handle_expense_command, handle_export_command, handle_init_command, handle_status_command,
    handle_summary_command, ActivityCommands, ConfigCommands, ExpenseCommands, ExportFormat,
    InitArgs,
};
use travel_ledger::config::{paths::TravelPaths, settings::Settings};
use travel_ledger::storage::SessionStore;

#[derive(Parser)]
#[command(
    name = "travel-ledger",
    version,
    about = "Trip budgeting with reconciled activity costs",
    long_about = "travel-ledger plans a trip budget, records expenses and keeps \
                  activity costs in step with the expense ledger, so the budget \
                  always reflects what activities actually cost."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a trip and its budget
    Init(InitArgs),

    /// Expense commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Activity commands
    #[command(subcommand, alias = "act")]
    Activity(ActivityCommands),

    /// Show overall budget status
    Status {
        /// Evaluate as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        on: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show per-category allocation and spending
    Categories {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show activity costs against recorded expenses
    Summary {
        /// Evaluate as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        on: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the expense ledger
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Output file; defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
        /// Export category status instead of expenses (CSV only)
        #[arg(long)]
        categories: bool,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

fn main() -> Result<()> {
    travel_ledger::init();
    let cli = Cli::parse();

    let paths = TravelPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let store = SessionStore::new(&paths);

    match cli.command {
        Commands::Init(args) => handle_init_command(&store, &settings, args)?,
        Commands::Expense(cmd) => handle_expense_command(&store, &settings, cmd)?,
        Commands::Activity(cmd) => handle_activity_command(&store, &settings, cmd)?,
        Commands::Status { on, json } => handle_status_command(&store, &settings, on, json)?,
        Commands::Categories { json } => handle_categories_command(&store, &settings, json)?,
        Commands::Summary { on, json } => handle_summary_command(&store, &settings, on, json)?,
        Commands::Export {
            format,
            output,
            pretty,
            categories,
        } => handle_export_command(&store, &settings, format, output, pretty, categories)?,
        Commands::Config { command } => handle_config_command(&paths, &mut settings, command)?,
    }

    Ok(())
}
