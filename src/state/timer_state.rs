//! Published timer state and display formatting

use serde::{Deserialize, Serialize};

/// Lifecycle phase of the countdown controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for digits or a start
    #[default]
    Idle,
    Running,
    Paused,
    /// Reached zero; digits start a fresh entry
    Finished,
}

impl Phase {
    /// A countdown has been started and not yet finished
    pub fn is_started(self) -> bool {
        matches!(self, Phase::Running | Phase::Paused)
    }

    pub fn is_paused(self) -> bool {
        self == Phase::Paused
    }
}

/// Immutable snapshot of the controller, published on every change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub started: bool,
    pub paused: bool,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    /// Remaining share of the configured duration, 0-100
    pub progress: f32,
    pub duration_ms: u64,
    pub remaining_ms: u64,
    /// Digits typed into the keypad so far
    pub digits: String,
    /// Whether a start intent would do anything right now
    pub can_start: bool,
}

impl TimerSnapshot {
    /// Project controller state into the published form
    pub fn new(phase: Phase, duration_ms: u64, remaining_ms: u64, digits: &str) -> Self {
        let (hours, minutes, seconds) = display_fields(remaining_ms);
        Self {
            phase,
            started: phase.is_started(),
            paused: phase.is_paused(),
            hours,
            minutes,
            seconds,
            progress: progress(remaining_ms, duration_ms),
            duration_ms,
            remaining_ms,
            digits: digits.to_string(),
            can_start: phase == Phase::Idle && duration_ms > 0,
        }
    }

    /// The `HH:MM:SS` form of the display fields
    pub fn clock(&self) -> String {
        format!("{}:{}:{}", self.hours, self.minutes, self.seconds)
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::new(Phase::Idle, 0, 0, "")
    }
}

/// Split milliseconds into zero-padded hours, minutes and seconds.
///
/// Hours are not wrapped, so values past 99 keep all their digits.
pub fn display_fields(ms: u64) -> (String, String, String) {
    let total_secs = ms / 1000;
    (
        pad2(total_secs / 3600),
        pad2((total_secs / 60) % 60),
        pad2(total_secs % 60),
    )
}

/// Zero-pad to two characters without truncating wider values
pub fn pad2(value: u64) -> String {
    format!("{:02}", value)
}

/// Remaining time as a percentage of the duration; 0 for an empty duration
pub fn progress(remaining_ms: u64, duration_ms: u64) -> f32 {
    if duration_ms == 0 {
        return 0.0;
    }
    let pct = remaining_ms as f64 * 100.0 / duration_ms as f64;
    pct.clamp(0.0, 100.0) as f32
}
