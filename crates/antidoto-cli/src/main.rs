use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "antidoto-cli", version, about = "Antidoto CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign out, allow-list management
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Daily check-in (checklist + diary note)
    Checkin {
        #[command(subcommand)]
        action: commands::checkin::CheckinAction,
    },
    /// Greeting, year heatmap, trajectory and daily quote
    Dashboard,
    /// Year heatmap and recorded-day details
    Heatmap {
        #[command(subcommand)]
        action: commands::heatmap::HeatmapAction,
    },
    /// Meditation timer
    Meditate {
        #[command(subcommand)]
        action: commands::meditate::MeditateAction,
    },
    /// Breathing exercise
    Breathe {
        #[command(subcommand)]
        action: commands::breathe::BreatheAction,
    },
    /// Aggregated statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Remote row-store synchronization
    Sync {
        #[command(subcommand)]
        action: commands::sync::SyncAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Checkin { action } => commands::checkin::run(action),
        Commands::Dashboard => commands::dashboard::run(),
        Commands::Heatmap { action } => commands::heatmap::run(action),
        Commands::Meditate { action } => commands::meditate::run(action),
        Commands::Breathe { action } => commands::breathe::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Sync { action } => commands::sync::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
