use antidoto_core::storage::Database;
use antidoto_core::{auth, meditation_stats, trajectory_days};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Meditation journey: total minutes and distinct days
    Meditation,
    /// Diary trajectory: recorded day count
    Diary,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let session = auth::require_session(&db)?;

    match action {
        StatsAction::Meditation => {
            let records = db.list_meditations(&session.user.id)?;
            let stats = meditation_stats(&records);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Diary => {
            let entries = db.list_entries(&session.user.id)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "days": trajectory_days(&entries),
                }))?
            );
        }
    }
    Ok(())
}
