use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{BreathPhase, TimerState};

/// Every state change in the system produces an Event.
/// The CLI prints events as JSON; nothing is logged out-of-band.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        duration_min: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        duration_min: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    TimerSnapshot {
        state: TimerState,
        duration_min: u64,
        remaining_ms: u64,
        total_ms: u64,
        at: DateTime<Utc>,
    },
    /// Breathing cycle moved to a new phase.
    PhaseChanged {
        phase: BreathPhase,
        at: DateTime<Utc>,
    },
    BreathSnapshot {
        phase: BreathPhase,
        label: String,
        phase_remaining_ms: u64,
        cycles_completed: u64,
        at: DateTime<Utc>,
    },
    /// A completed meditation session was persisted.
    SessionRecorded {
        duration_min: u64,
        date: NaiveDate,
        at: DateTime<Utc>,
    },
    /// A day entry was written (insert or full replace).
    EntrySaved {
        date: NaiveDate,
        at: DateTime<Utc>,
    },
    SignedIn {
        email: String,
        at: DateTime<Utc>,
    },
    SignedOut {
        at: DateTime<Utc>,
    },
}
