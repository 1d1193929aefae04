//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::info;

use super::{CountdownController, TimerSnapshot};
use crate::{
    error::TimerError,
    tasks::{TickEvent, TokioTickScheduler},
};

/// Shared state behind the HTTP handlers and the countdown driver task
#[derive(Debug)]
pub struct AppState {
    /// The countdown state machine; the lock serializes intents and ticks
    pub controller: Mutex<CountdownController<TokioTickScheduler>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create the state together with the tick event stream for the driver task
    pub fn new(
        port: u16,
        host: String,
        tick_interval_ms: u64,
    ) -> (Self, mpsc::UnboundedReceiver<TickEvent>) {
        let (scheduler, events_rx) = TokioTickScheduler::new();
        let state = Self {
            controller: Mutex::new(CountdownController::with_interval(scheduler, tick_interval_ms)),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        };
        (state, events_rx)
    }

    fn lock(&self) -> Result<MutexGuard<'_, CountdownController<TokioTickScheduler>>, TimerError> {
        Ok(self.controller.lock()?)
    }

    /// Run an intent against the controller and record it as the last action
    fn apply<T, F>(&self, action: &str, intent: F) -> Result<(T, TimerSnapshot), TimerError>
    where
        F: FnOnce(&mut CountdownController<TokioTickScheduler>) -> Result<T, TimerError>,
    {
        let mut controller = self.lock()?;
        let outcome = intent(&mut controller)?;
        let snapshot = controller.snapshot();
        drop(controller); // Release the lock early

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok((outcome, snapshot))
    }

    /// Feed a keypad digit; returns the configured duration in milliseconds
    pub fn add_digit(&self, digit: u8) -> Result<(u64, TimerSnapshot), TimerError> {
        self.apply("digit", |c| c.add_digit(digit))
    }

    /// Start the armed countdown; the flag tells whether anything changed
    pub fn start(&self) -> Result<(bool, TimerSnapshot), TimerError> {
        self.apply("start", |c| Ok(c.start()))
    }

    pub fn pause(&self) -> Result<(bool, TimerSnapshot), TimerError> {
        self.apply("pause", |c| Ok(c.pause()))
    }

    pub fn resume(&self) -> Result<(bool, TimerSnapshot), TimerError> {
        self.apply("resume", |c| Ok(c.resume()))
    }

    pub fn restart(&self) -> Result<(bool, TimerSnapshot), TimerError> {
        self.apply("restart", |c| Ok(c.restart()))
    }

    /// Route a scheduler event to the controller; returns false for stale events
    pub fn apply_tick_event(&self, event: TickEvent) -> Result<bool, TimerError> {
        let mut controller = self.lock()?;
        Ok(match event {
            TickEvent::Tick { id, remaining_ms } => controller.on_tick(id, remaining_ms),
            TickEvent::Complete { id } => controller.on_complete(id),
        })
    }

    /// Pre-enter a digit string, as typed on the keypad
    pub fn preset(&self, digits: &str) -> Result<TimerSnapshot, TimerError> {
        let parsed = digits
            .chars()
            .map(|c| c.to_digit(10).map(|d| d as u8).ok_or(TimerError::NotADigit(c)))
            .collect::<Result<Vec<u8>, TimerError>>()?;

        let mut controller = self.lock()?;
        for digit in parsed {
            controller.add_digit(digit)?;
        }
        info!("Preset duration {}ms from '{}'", controller.duration_ms(), digits);
        Ok(controller.snapshot())
    }

    /// Get current timer snapshot
    pub fn snapshot(&self) -> Result<TimerSnapshot, TimerError> {
        Ok(self.lock()?.snapshot())
    }

    /// Watch every snapshot published after this call
    pub fn subscribe(&self) -> Result<watch::Receiver<TimerSnapshot>, TimerError> {
        Ok(self.lock()?.subscribe())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
