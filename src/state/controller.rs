//! Countdown state machine
//!
//! The controller keeps its durable state (duration, remaining time, phase)
//! apart from the disposable ticking primitive. Every arm allocates a fresh
//! [`CountdownId`]; tick and completion events carrying any other id are
//! dropped, so a cancelled countdown can never move the state.

use tokio::sync::watch;
use tracing::{debug, info};

use super::{DigitEntry, Phase, TimerSnapshot};
use crate::error::TimerError;

/// Default tick cadence
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Generation number of an armed countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountdownId(pub u64);

/// A countdown handed to the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub id: CountdownId,
    pub duration_ms: u64,
    pub interval_ms: u64,
}

/// Host service that turns a [`Countdown`] into tick and completion events.
///
/// Implementations report back through [`CountdownController::on_tick`] and
/// [`CountdownController::on_complete`] with the countdown's id. `cancel`
/// must stop the countdown before returning; events already in flight are
/// filtered by id on the controller side.
pub trait TickScheduler {
    fn schedule(&mut self, countdown: Countdown);
    fn cancel(&mut self, id: CountdownId);
}

/// Owns the timer lifecycle and publishes a [`TimerSnapshot`] on every change
#[derive(Debug)]
pub struct CountdownController<S: TickScheduler> {
    entry: DigitEntry,
    phase: Phase,
    /// Baseline of the current countdown, used for restart and progress
    duration_ms: u64,
    remaining_ms: u64,
    /// Countdown armed for the next start, or the one currently ticking
    armed: Option<Countdown>,
    scheduled: bool,
    last_id: u64,
    interval_ms: u64,
    scheduler: S,
    snapshot_tx: watch::Sender<TimerSnapshot>,
}

impl<S: TickScheduler> CountdownController<S> {
    /// Create an idle controller ticking at the default one second cadence
    pub fn new(scheduler: S) -> Self {
        Self::with_interval(scheduler, TICK_INTERVAL_MS)
    }

    /// Create an idle controller ticking every `interval_ms` (at least 1)
    pub fn with_interval(scheduler: S, interval_ms: u64) -> Self {
        let (snapshot_tx, _) = watch::channel(TimerSnapshot::default());
        Self {
            entry: DigitEntry::new(),
            phase: Phase::Idle,
            duration_ms: 0,
            remaining_ms: 0,
            armed: None,
            scheduled: false,
            last_id: 0,
            interval_ms: interval_ms.max(1),
            scheduler,
            snapshot_tx,
        }
    }

    /// Feed one keypad digit; returns the duration now configured.
    ///
    /// Ignored while running. From Paused or Finished the entry starts over
    /// from an empty buffer and the previous countdown is abandoned.
    pub fn add_digit(&mut self, digit: u8) -> Result<u64, TimerError> {
        if self.phase == Phase::Running {
            debug!("Ignoring digit {} while running", digit);
            return Ok(self.duration_ms);
        }
        if matches!(self.phase, Phase::Paused | Phase::Finished) {
            self.entry.clear();
        }

        let duration_ms = self.entry.add_digit(digit)?;
        self.retire();
        self.duration_ms = duration_ms;
        self.remaining_ms = duration_ms;
        self.phase = Phase::Idle;
        self.arm(duration_ms);

        debug!("Digits '{}' set duration to {}ms", self.entry.digits(), duration_ms);
        self.publish();
        Ok(duration_ms)
    }

    /// Idle -> Running; does nothing for an empty duration or any other phase
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle || self.duration_ms == 0 {
            debug!("Start ignored in phase {:?} with duration {}ms", self.phase, self.duration_ms);
            return false;
        }
        let countdown = match self.armed {
            Some(countdown) => countdown,
            None => self.arm(self.duration_ms),
        };

        info!("Starting countdown of {}ms", countdown.duration_ms);
        self.entry.clear();
        self.run(countdown);
        self.publish();
        true
    }

    /// Running -> Paused, keeping the last ticked remaining time
    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Running {
            debug!("Pause ignored in phase {:?}", self.phase);
            return false;
        }
        self.retire();
        self.phase = Phase::Paused;

        info!("Paused with {}ms remaining", self.remaining_ms);
        self.publish();
        true
    }

    /// Paused -> Running from the remaining time captured at pause
    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            debug!("Resume ignored in phase {:?}", self.phase);
            return false;
        }
        let countdown = self.arm(self.remaining_ms);

        info!("Resuming with {}ms remaining", self.remaining_ms);
        self.run(countdown);
        self.publish();
        true
    }

    /// Paused -> Running from the full original duration
    pub fn restart(&mut self) -> bool {
        if self.phase != Phase::Paused {
            debug!("Restart ignored in phase {:?}", self.phase);
            return false;
        }
        let countdown = self.arm(self.duration_ms);
        self.remaining_ms = self.duration_ms;

        info!("Restarting countdown of {}ms", self.duration_ms);
        self.run(countdown);
        self.publish();
        true
    }

    /// Tick from the scheduler; returns false when the event is stale
    pub fn on_tick(&mut self, id: CountdownId, remaining_ms: u64) -> bool {
        if !self.is_live(id) {
            debug!("Dropping stale tick from countdown {:?}", id);
            return false;
        }
        self.remaining_ms = remaining_ms.min(self.duration_ms);
        self.publish();
        true
    }

    /// Completion from the scheduler; returns false when the event is stale
    pub fn on_complete(&mut self, id: CountdownId) -> bool {
        if !self.is_live(id) {
            debug!("Dropping stale completion from countdown {:?}", id);
            return false;
        }
        self.armed = None;
        self.scheduled = false;
        self.remaining_ms = 0;
        self.duration_ms = 0;
        self.entry.clear();
        self.phase = Phase::Finished;

        info!("Countdown finished");
        self.publish();
        true
    }

    /// Current published state
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn is_live(&self, id: CountdownId) -> bool {
        self.phase == Phase::Running
            && self.scheduled
            && self.armed.map(|c| c.id) == Some(id)
    }

    /// Allocate a new generation for `duration_ms`, retiring the previous one
    fn arm(&mut self, duration_ms: u64) -> Countdown {
        self.retire();
        self.last_id += 1;
        let countdown = Countdown {
            id: CountdownId(self.last_id),
            duration_ms,
            interval_ms: self.interval_ms,
        };
        self.armed = Some(countdown);
        countdown
    }

    fn run(&mut self, countdown: Countdown) {
        self.scheduler.schedule(countdown);
        self.scheduled = true;
        self.phase = Phase::Running;
    }

    fn retire(&mut self) {
        if let Some(countdown) = self.armed.take() {
            if self.scheduled {
                self.scheduler.cancel(countdown.id);
            }
        }
        self.scheduled = false;
    }

    fn publish(&self) {
        let snapshot = TimerSnapshot::new(
            self.phase,
            self.duration_ms,
            self.remaining_ms,
            self.entry.digits(),
        );
        self.snapshot_tx.send_replace(snapshot);
    }
}
