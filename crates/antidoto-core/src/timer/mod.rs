mod breathing;
mod engine;

pub use breathing::{BreathPhase, BreathingCycle, PhaseDurations};
pub use engine::{MeditationTimer, TimerState, PRESET_MINUTES};

/// Milliseconds since the Unix epoch, used by the wall-clock engines.
pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
