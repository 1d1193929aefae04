//! Background tasks module
//! 
//! This module contains the ticking primitive and the task that drives the
//! countdown controller alongside the HTTP server.

pub mod countdown_ticker;

// Re-export main items
pub use countdown_ticker::{countdown_driver_task, TickEvent, TokioTickScheduler};
