use antidoto_core::error::{CoreError, ValidationError};
use antidoto_core::journal::DayEntry;
use antidoto_core::storage::{Config, Database};
use antidoto_core::{auth, Event};
use chrono::{Datelike, Local, NaiveDate, Utc};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum CheckinAction {
    /// Print the edit buffer for a date (stored entry or defaults)
    Show {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Save the day: replaces any previous entry for the date entirely
    Save {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Trabalho produtivo?
        #[arg(long)]
        work_good: bool,
        /// O dia foi bom?
        #[arg(long)]
        day_good: bool,
        /// Dormiu bem?
        #[arg(long)]
        sleep_good: bool,
        /// Cumpriu promessas?
        #[arg(long)]
        tasks_done: bool,
        /// Diário (free text)
        #[arg(long, default_value = "")]
        notes: String,
    },
}

fn selected_date(date: Option<NaiveDate>, config: &Config) -> Result<NaiveDate, CoreError> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    // The form only offers dates inside the tracked year.
    if date.year() != config.year {
        return Err(ValidationError::DateOutOfYear {
            date,
            year: config.year,
        }
        .into());
    }
    Ok(date)
}

pub fn run(action: CheckinAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let session = auth::require_session(&db)?;
    let config = Config::load_or_default();

    match action {
        CheckinAction::Show { date } => {
            let date = selected_date(date, &config)?;
            // The edit buffer starts from the stored entry, or all-false
            // defaults when the day has not been written yet.
            let entry = db
                .get_entry(&session.user.id, date)?
                .unwrap_or_else(|| DayEntry::empty(date));
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        CheckinAction::Save {
            date,
            work_good,
            day_good,
            sleep_good,
            tasks_done,
            notes,
        } => {
            let date = selected_date(date, &config)?;
            let entry = DayEntry {
                date,
                work_good,
                day_good,
                sleep_good,
                tasks_done,
                notes,
            };
            db.upsert_entry(&session.user.id, &entry)?;
            let event = Event::EntrySaved {
                date,
                at: Utc::now(),
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
            println!("✓ Salvo.");
        }
    }
    Ok(())
}
