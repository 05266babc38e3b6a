use antidoto_core::storage::{Config, Database};
use antidoto_core::{auth, Heatmap};
use chrono::NaiveDate;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum HeatmapAction {
    /// Render the year grid
    Show {
        /// Year to render, defaults to the tracked year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Detail view for a recorded day
    Day {
        /// Date (YYYY-MM-DD)
        date: NaiveDate,
    },
    /// Next recorded day after the given date
    Next { date: NaiveDate },
    /// Previous recorded day before the given date
    Prev { date: NaiveDate },
}

pub fn run(action: HeatmapAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let session = auth::require_session(&db)?;
    let config = Config::load_or_default();

    let year = match &action {
        HeatmapAction::Show { year } => (*year).unwrap_or(config.year),
        HeatmapAction::Day { date }
        | HeatmapAction::Next { date }
        | HeatmapAction::Prev { date } => chrono::Datelike::year(date),
    };

    // Reads degrade to the empty view.
    let entries = db.list_entries(&session.user.id).unwrap_or_default();
    let map = Heatmap::build(year, &entries);

    match action {
        HeatmapAction::Show { .. } => {
            print!("{}", map.render_ascii());
        }
        HeatmapAction::Day { date } => {
            // Only recorded days open a detail view.
            let Some(cell) = map.detail(date) else {
                println!("Sem registros");
                return Ok(());
            };
            println!("{}", cell.tooltip());
            if let Some(entry) = db.get_entry(&session.user.id, date)? {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            }
            match map.prev_active(date) {
                Some(prev) => println!("anterior: {prev}"),
                None => println!("anterior: indisponível"),
            }
            match map.next_active(date) {
                Some(next) => println!("próximo: {next}"),
                None => println!("próximo: indisponível"),
            }
        }
        HeatmapAction::Next { date } => match map.next_active(date) {
            Some(next) => println!("{next}"),
            None => println!("próximo: indisponível"),
        },
        HeatmapAction::Prev { date } => match map.prev_active(date) {
            Some(prev) => println!("{prev}"),
            None => println!("anterior: indisponível"),
        },
    }
    Ok(())
}
