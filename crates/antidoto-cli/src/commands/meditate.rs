use antidoto_core::error::ValidationError;
use antidoto_core::remote::RemoteClient;
use antidoto_core::storage::{Config, Database};
use antidoto_core::{auth, Event, MeditationTimer};
use chrono::{Local, Utc};
use clap::Subcommand;

const ENGINE_KEY: &str = "meditation_timer";

#[derive(Subcommand)]
pub enum MeditateAction {
    /// Start a session of the given length
    Start {
        /// Session length in minutes (presets: 1, 5, 10, 15, 30)
        minutes: u64,
    },
    /// Pause the running session
    Pause,
    /// Resume a paused session
    Resume,
    /// Discard the session and return to idle
    Reset,
    /// Print the timer state; records the session when the countdown ends
    Status,
    /// Print the preset session lengths
    Presets,
}

fn load_engine(db: &Database) -> Option<MeditationTimer> {
    let json = db.kv_get(ENGINE_KEY).ok()??;
    serde_json::from_str(&json).ok()
}

fn save_engine(db: &Database, engine: &MeditationTimer) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

/// The terminal bell stands in for the completion chime.
fn play_cue(config: &Config) {
    if config.notifications.enabled {
        print!("\x07");
        println!("PLIM! ✨ Sessão finalizada com sucesso. Seus dados foram salvos.");
    }
}

fn handle_completion(
    db: &Database,
    config: &Config,
    duration_min: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = auth::require_session(db)?;
    let today = Local::now().date_naive();
    db.record_meditation(&session.user.id, duration_min, today, Utc::now())?;

    let event = Event::SessionRecorded {
        duration_min,
        date: today,
        at: Utc::now(),
    };
    println!("{}", serde_json::to_string_pretty(&event)?);
    play_cue(config);

    // Mirror the append to the remote store when one is configured. The
    // local record is already durable; a remote failure is reported, not
    // fatal.
    if config.remote.enabled {
        let client = RemoteClient::from_config(&config.remote)?;
        let runtime = tokio::runtime::Runtime::new()?;
        if let Err(e) =
            runtime.block_on(client.insert_meditation(&session.user.id, duration_min, today))
        {
            eprintln!("aviso: falha ao enviar sessão ao servidor: {e}");
        }
    }
    Ok(())
}

pub fn run(action: MeditateAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();

    match action {
        MeditateAction::Start { minutes } => {
            auth::require_session(&db)?;
            if minutes == 0 {
                return Err(antidoto_core::CoreError::from(ValidationError::InvalidValue {
                    field: "minutes".to_string(),
                    message: "session length must be at least one minute".to_string(),
                })
                .into());
            }
            let mut engine = MeditationTimer::new(minutes);
            if let Some(event) = engine.start() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            save_engine(&db, &engine)?;
        }
        MeditateAction::Pause => {
            let Some(mut engine) = load_engine(&db) else {
                println!("nenhuma sessão em andamento");
                return Ok(());
            };
            match engine.pause() {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => println!("{}", serde_json::to_string_pretty(&engine.snapshot())?),
            }
            save_engine(&db, &engine)?;
        }
        MeditateAction::Resume => {
            let Some(mut engine) = load_engine(&db) else {
                println!("nenhuma sessão em andamento");
                return Ok(());
            };
            match engine.resume() {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => println!("{}", serde_json::to_string_pretty(&engine.snapshot())?),
            }
            save_engine(&db, &engine)?;
        }
        MeditateAction::Reset => {
            let Some(mut engine) = load_engine(&db) else {
                println!("nenhuma sessão em andamento");
                return Ok(());
            };
            if let Some(event) = engine.reset() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            save_engine(&db, &engine)?;
        }
        MeditateAction::Status => {
            let Some(mut engine) = load_engine(&db) else {
                println!("nenhuma sessão em andamento");
                return Ok(());
            };
            let completed = engine.tick();
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
            save_engine(&db, &engine)?;
            if let Some(Event::TimerCompleted { duration_min, .. }) = completed {
                handle_completion(&db, &config, duration_min)?;
            }
        }
        MeditateAction::Presets => {
            println!("{}", serde_json::to_string(&config.timer.preset_minutes)?);
        }
    }
    Ok(())
}
