use antidoto_core::storage::{Config, Database};
use antidoto_core::{auth, quote_of_day, trajectory_days, Heatmap};
use chrono::Local;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let session = auth::require_session(&db)?;
    let config = Config::load_or_default();

    // A failed read renders the empty view, never an error state.
    let entries = db.list_entries(&session.user.id).unwrap_or_default();
    let map = Heatmap::build(config.year, &entries);

    println!("Olá, {}", session.display_name());
    println!("Faça o hoje valer a pena.\n");
    print!("{}", map.render_ascii());
    println!("Trajetória: {} dias", trajectory_days(&entries));

    let quote = quote_of_day(Local::now().date_naive());
    println!("\n\"{}\" — {}", quote.text, quote.author);
    Ok(())
}
