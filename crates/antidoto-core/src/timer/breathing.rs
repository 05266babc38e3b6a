//! Breathing exercise phase cycle.
//!
//! Fixed loop once started: Inhale -> Hold -> Exhale -> Inhale -> ...
//! Wall-clock based like the meditation engine; `tick()` advances through
//! however many phase boundaries the elapsed time crossed.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::now_ms;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathPhase {
    Ready,
    Inhale,
    Hold,
    Exhale,
}

impl BreathPhase {
    /// On-screen instruction for the phase.
    pub fn label(&self) -> &'static str {
        match self {
            BreathPhase::Ready => "Tocar para Iniciar",
            BreathPhase::Inhale => "Inspire",
            BreathPhase::Hold => "Segure",
            BreathPhase::Exhale => "Expire",
        }
    }

    fn next(&self) -> BreathPhase {
        match self {
            BreathPhase::Ready => BreathPhase::Inhale,
            BreathPhase::Inhale => BreathPhase::Hold,
            BreathPhase::Hold => BreathPhase::Exhale,
            BreathPhase::Exhale => BreathPhase::Inhale,
        }
    }
}

/// Phase lengths in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub inhale_ms: u64,
    pub hold_ms: u64,
    pub exhale_ms: u64,
}

impl Default for PhaseDurations {
    /// Inhale 4s, hold 1s, exhale 4s.
    fn default() -> Self {
        Self {
            inhale_ms: 4_000,
            hold_ms: 1_000,
            exhale_ms: 4_000,
        }
    }
}

impl PhaseDurations {
    pub fn from_secs(inhale_secs: u64, hold_secs: u64, exhale_secs: u64) -> Self {
        Self {
            inhale_ms: inhale_secs.saturating_mul(1000),
            hold_ms: hold_secs.saturating_mul(1000),
            exhale_ms: exhale_secs.saturating_mul(1000),
        }
    }

    fn for_phase(&self, phase: BreathPhase) -> u64 {
        match phase {
            BreathPhase::Ready => 0,
            BreathPhase::Inhale => self.inhale_ms,
            BreathPhase::Hold => self.hold_ms,
            BreathPhase::Exhale => self.exhale_ms,
        }
    }
}

/// The breathing-circle state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathingCycle {
    durations: PhaseDurations,
    phase: BreathPhase,
    /// Remaining time in the current phase, milliseconds.
    phase_remaining_ms: u64,
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
    /// Full inhale-hold-exhale loops finished since start.
    #[serde(default)]
    cycles_completed: u64,
}

impl BreathingCycle {
    pub fn new(durations: PhaseDurations) -> Self {
        Self {
            durations,
            phase: BreathPhase::Ready,
            phase_remaining_ms: 0,
            last_tick_epoch_ms: None,
            cycles_completed: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    pub fn phase_remaining_ms(&self) -> u64 {
        self.phase_remaining_ms
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn is_running(&self) -> bool {
        self.phase != BreathPhase::Ready
    }

    pub fn snapshot(&self) -> Event {
        Event::BreathSnapshot {
            phase: self.phase,
            label: self.phase.label().to_string(),
            phase_remaining_ms: self.phase_remaining_ms,
            cycles_completed: self.cycles_completed,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the cycle: Ready -> Inhale. No-op while running.
    pub fn start(&mut self) -> Option<Event> {
        if self.is_running() {
            return None;
        }
        self.enter_phase(BreathPhase::Inhale);
        self.last_tick_epoch_ms = Some(now_ms());
        Some(Event::PhaseChanged {
            phase: self.phase,
            at: Utc::now(),
        })
    }

    /// Stop and return to Ready.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.phase = BreathPhase::Ready;
        self.phase_remaining_ms = 0;
        self.last_tick_epoch_ms = None;
        self.cycles_completed = 0;
        Some(Event::PhaseChanged {
            phase: self.phase,
            at: Utc::now(),
        })
    }

    /// Advance the cycle by the elapsed wall-clock time. Returns the
    /// phase-change event for the last boundary crossed, if any.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        // A cycle of zero total length cannot make progress.
        if self.durations.inhale_ms + self.durations.hold_ms + self.durations.exhale_ms == 0 {
            return None;
        }
        let now = now_ms();
        let mut elapsed = now.saturating_sub(self.last_tick_epoch_ms.unwrap_or(now));
        self.last_tick_epoch_ms = Some(now);

        let mut changed = false;
        while elapsed >= self.phase_remaining_ms {
            elapsed -= self.phase_remaining_ms;
            if self.phase == BreathPhase::Exhale {
                self.cycles_completed += 1;
            }
            self.enter_phase(self.phase.next());
            changed = true;
        }
        self.phase_remaining_ms -= elapsed;

        if changed {
            Some(Event::PhaseChanged {
                phase: self.phase,
                at: Utc::now(),
            })
        } else {
            None
        }
    }

    fn enter_phase(&mut self, phase: BreathPhase) {
        self.phase = phase;
        self.phase_remaining_ms = self.durations.for_phase(phase);
    }
}
