//! Error types for the countdown core

use thiserror::Error;

/// Errors surfaced by the digit entry and the shared application state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// A keypad input outside 0-9
    #[error("invalid digit: {0} (expected 0-9)")]
    InvalidDigit(u8),
    /// A non-numeric character in a digit string
    #[error("not a digit: {0:?}")]
    NotADigit(char),
    /// A lock around the controller was poisoned by a panicking holder
    #[error("failed to lock timer state: {0}")]
    StatePoisoned(String),
}

impl<T> From<std::sync::PoisonError<T>> for TimerError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        TimerError::StatePoisoned(err.to_string())
    }
}
