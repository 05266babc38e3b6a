//! # Antidoto Core Library
//!
//! This library provides the core logic for Antidoto, a personal daily
//! habit tracker. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary; any GUI would be
//! a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Calendar/Journal**: the tracked year's day sequence, day entries
//!   and the summary derivation behind the heatmap tooltips
//! - **Heatmap**: year grid with detail navigation over recorded days
//! - **Timers**: wall-clock meditation countdown and breathing phase
//!   cycle, both driven by caller `tick()` calls
//! - **Storage**: SQLite row store with versioned migrations plus
//!   TOML-based configuration
//! - **Auth**: allow-list email sign-in with a persisted pseudo-session
//! - **Remote**: thin async client for the hosted row store
//!
//! ## Key Components
//!
//! - [`Heatmap`]: year heatmap model
//! - [`MeditationTimer`] / [`BreathingCycle`]: timer state machines
//! - [`Database`]: entry, session and allow-list persistence
//! - [`Config`]: application configuration management

pub mod auth;
pub mod calendar;
pub mod error;
pub mod events;
pub mod heatmap;
pub mod journal;
pub mod quotes;
pub mod remote;
pub mod stats;
pub mod storage;
pub mod timer;

pub use auth::{Session, User};
pub use error::{AuthError, ConfigError, CoreError, DatabaseError, RemoteError, ValidationError};
pub use events::Event;
pub use heatmap::{Heatmap, HeatmapCell};
pub use journal::DayEntry;
pub use quotes::{quote_of_day, Quote};
pub use remote::RemoteClient;
pub use stats::{meditation_stats, trajectory_days, MeditationStats};
pub use storage::{Config, Database, MeditationRecord};
pub use timer::{BreathPhase, BreathingCycle, MeditationTimer, TimerState, PRESET_MINUTES};
