//! Tokio-backed ticking primitive and the task that feeds it back into the controller

use std::{
    collections::HashMap,
    sync::Arc,
    time::Duration,
};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::{debug, error, warn};

use crate::state::{AppState, Countdown, CountdownId, TickScheduler};

/// Event emitted by a running countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    Tick { id: CountdownId, remaining_ms: u64 },
    Complete { id: CountdownId },
}

/// Runs each scheduled countdown as its own tokio task
#[derive(Debug)]
pub struct TokioTickScheduler {
    events_tx: mpsc::UnboundedSender<TickEvent>,
    tasks: HashMap<CountdownId, JoinHandle<()>>,
}

impl TokioTickScheduler {
    /// Create a scheduler and the receiving end of its event stream
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TickEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            events_tx,
            tasks: HashMap::new(),
        };
        (scheduler, events_rx)
    }

    /// Number of countdown tasks still alive
    pub fn active_tasks(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl TickScheduler for TokioTickScheduler {
    fn schedule(&mut self, countdown: Countdown) {
        self.tasks.retain(|_, task| !task.is_finished());

        debug!("Scheduling countdown {:?} for {}ms", countdown.id, countdown.duration_ms);
        let events_tx = self.events_tx.clone();
        let task = tokio::spawn(run_countdown(countdown, events_tx));
        self.tasks.insert(countdown.id, task);
    }

    fn cancel(&mut self, id: CountdownId) {
        if let Some(task) = self.tasks.remove(&id) {
            debug!("Cancelling countdown {:?}", id);
            task.abort();
        }
    }
}

impl Drop for TokioTickScheduler {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            task.abort();
        }
    }
}

/// Tick every `interval_ms` against absolute deadlines, then complete once
async fn run_countdown(countdown: Countdown, events_tx: mpsc::UnboundedSender<TickEvent>) {
    let Countdown { id, duration_ms, interval_ms } = countdown;
    let started = Instant::now();
    let mut elapsed_ms = 0u64;

    while elapsed_ms < duration_ms {
        elapsed_ms = (elapsed_ms + interval_ms).min(duration_ms);
        sleep_until(started + Duration::from_millis(elapsed_ms)).await;

        let remaining_ms = duration_ms - elapsed_ms;
        if remaining_ms == 0 {
            break;
        }
        if events_tx.send(TickEvent::Tick { id, remaining_ms }).is_err() {
            warn!("Tick receiver dropped, stopping countdown {:?}", id);
            return;
        }
    }

    if events_tx.send(TickEvent::Complete { id }).is_err() {
        warn!("Tick receiver dropped before countdown {:?} completed", id);
    }
}

/// Background task that applies tick events to the shared controller
pub async fn countdown_driver_task(
    state: Arc<AppState>,
    mut events_rx: mpsc::UnboundedReceiver<TickEvent>,
) {
    debug!("Starting countdown driver task");

    while let Some(event) = events_rx.recv().await {
        if let Err(e) = state.apply_tick_event(event) {
            error!("Failed to apply tick event {:?}: {}", event, e);
        }
    }

    debug!("Countdown driver task stopped");
}
