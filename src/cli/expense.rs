//! Expense CLI commands
//!
//! Implements CLI commands for standalone expenses. Expenses recorded from
//! an activity's cost are managed through `activity cost` instead.

use chrono::Utc;
use clap::Subcommand;

use super::{load_session, parse_category, parse_datetime, parse_money, resolve_expense};
use crate::config::settings::Settings;
use crate::display::format_expense_register;
use crate::error::TravelResult;
use crate::models::Expense;
use crate::services::expense_manager::LedgerEntry;
use crate::storage::SessionStore;

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Amount, e.g. 150,000
        amount: String,
        /// Category (flight, accommodation, food, transportation, activities, shopping, emergency, misc)
        category: String,
        /// What the money was spent on
        #[arg(short, long, default_value = "")]
        description: String,
        /// When it was spent (YYYY-MM-DD [HH:MM]); defaults to now
        #[arg(long)]
        date: Option<String>,
        /// Currency code; defaults to the configured currency
        #[arg(long)]
        currency: Option<String>,
    },
    /// List recorded expenses
    List {
        /// Only show one category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Remove a standalone expense
    Remove {
        /// Expense ID or ID prefix
        expense: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    store: &SessionStore,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> TravelResult<()> {
    let mut session = load_session(store, settings)?;
    let manager = &mut session.manager;

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            description,
            date,
            currency,
        } => {
            let date = match date {
                Some(d) => parse_datetime(&d)?,
                None => Utc::now(),
            };
            let expense = Expense::new(
                parse_money(&amount)?,
                parse_category(&category)?,
                date,
                description,
                currency.unwrap_or_else(|| settings.default_currency.clone()),
            )?;

            let summary = expense.to_string();
            let id = manager.add_expense(expense);
            store.save(&session)?;

            println!("Recorded expense {}: {}", id, summary);
        }

        ExpenseCommands::List { category } => {
            let filter = category.as_deref().map(parse_category).transpose()?;
            let entries: Vec<LedgerEntry> = manager
                .expenses()
                .entries()
                .iter()
                .filter(|entry| filter.map_or(true, |c| entry.expense.category() == c))
                .cloned()
                .collect();

            print!(
                "{}",
                format_expense_register(&entries, |entry| manager
                    .activity_for_expense(entry.id)
                    .is_some())
            );
        }

        ExpenseCommands::Remove { expense } => {
            let id = resolve_expense(manager, &expense)?;
            manager.remove_expense(id)?;
            store.save(&session)?;

            println!("Removed expense {}", id);
        }
    }

    Ok(())
}
