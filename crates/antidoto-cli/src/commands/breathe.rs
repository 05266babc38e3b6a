use antidoto_core::storage::{Config, Database};
use antidoto_core::BreathingCycle;
use clap::Subcommand;

const CYCLE_KEY: &str = "breathing_cycle";

#[derive(Subcommand)]
pub enum BreatheAction {
    /// Begin the inhale/hold/exhale loop
    Start,
    /// Return to the ready state
    Stop,
    /// Print the current phase (advances by elapsed wall-clock time)
    Status,
}

fn load_cycle(db: &Database, config: &Config) -> BreathingCycle {
    if let Ok(Some(json)) = db.kv_get(CYCLE_KEY) {
        if let Ok(cycle) = serde_json::from_str::<BreathingCycle>(&json) {
            return cycle;
        }
    }
    BreathingCycle::new(config.breathing.durations())
}

fn save_cycle(db: &Database, cycle: &BreathingCycle) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(cycle)?;
    db.kv_set(CYCLE_KEY, &json)?;
    Ok(())
}

pub fn run(action: BreatheAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let mut cycle = load_cycle(&db, &config);

    match action {
        BreatheAction::Start => {
            match cycle.start() {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => println!("{}", serde_json::to_string_pretty(&cycle.snapshot())?),
            }
        }
        BreatheAction::Stop => {
            cycle.stop();
            println!("{}", serde_json::to_string_pretty(&cycle.snapshot())?);
        }
        BreatheAction::Status => {
            cycle.tick();
            println!("{}", serde_json::to_string_pretty(&cycle.snapshot())?);
        }
    }

    save_cycle(&db, &cycle)?;
    Ok(())
}
