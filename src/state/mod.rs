//! State management module
//! 
//! This module contains the countdown state machine, the keypad entry it
//! folds digits with, and the shared application state around them.

pub mod digit_entry;
pub mod timer_state;
pub mod controller;
pub mod app_state;

// Re-export main types
pub use digit_entry::{DigitEntry, MAX_DURATION_MS};
pub use timer_state::{Phase, TimerSnapshot};
pub use controller::{Countdown, CountdownController, CountdownId, TickScheduler};
pub use app_state::AppState;
