//! Countdown Pad - A state-managed HTTP server for a keypad-driven countdown timer
//! 
//! A duration is keyed in digit by digit (HHMMSS read from the right), then
//! started, paused, resumed or restarted. The countdown reports its remaining
//! time once per second to anyone watching its published snapshots.

pub mod error;
pub mod config;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::{AppState, CountdownController, Phase, TimerSnapshot};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
