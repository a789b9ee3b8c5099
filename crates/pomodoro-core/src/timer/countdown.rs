//! Countdown timer.
//!
//! Whole-second countdown driven by scheduler ticks. The timer knows nothing
//! about work or break; it only counts down and reports when it hits zero.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --(pause | reset | zero)--> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = CountdownTimer::new(scheduler, 1500);
//! timer.start(None);
//! // For every token the scheduler fires:
//! timer.tick(token); // Returns Some(Event::TimerCompleted) at zero
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::clock::format_countdown;
use crate::events::Event;
use crate::scheduler::{Scheduler, TickToken, TICK_INTERVAL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
}

/// Core countdown.
///
/// Holds at most one live [`TickToken`]. Ticks carrying any other token are
/// stale and ignored, which is what keeps completion from firing twice.
#[derive(Debug)]
pub struct CountdownTimer<S: Scheduler> {
    scheduler: S,
    total_secs: u64,
    remaining_secs: u64,
    active: Option<TickToken>,
}

impl<S: Scheduler> CountdownTimer<S> {
    /// Create an idle countdown of `total_secs`.
    pub fn new(scheduler: S, total_secs: u64) -> Self {
        Self {
            scheduler,
            total_secs,
            remaining_secs: total_secs,
            active: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        if self.active.is_some() {
            TimerState::Running
        } else {
            TimerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// Token of the live tick schedule, if running.
    pub fn active_token(&self) -> Option<TickToken> {
        self.active
    }

    /// 0.0 .. 1.0 fraction elapsed.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / self.total_secs as f64)
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_countdown(self.remaining_secs)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start ticking. With `Some(seconds)` the countdown is first set to that
    /// length. Starting a running timer restarts its tick interval.
    pub fn start(&mut self, seconds: Option<u64>) -> Event {
        if let Some(secs) = seconds {
            self.set_duration(secs);
        }
        self.stop_ticking();
        self.active = Some(self.scheduler.schedule(TICK_INTERVAL));
        tracing::debug!(
            remaining = self.remaining_secs,
            total = self.total_secs,
            "countdown started"
        );
        Event::TimerStarted {
            total_secs: self.total_secs,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Stop ticking, keeping the remaining time. `None` when already idle.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.stop_ticking() {
            return None;
        }
        tracing::debug!(remaining = self.remaining_secs, "countdown paused");
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop ticking and rewind. With `Some(seconds)` the countdown becomes
    /// that length, otherwise it rewinds to the current total.
    pub fn reset(&mut self, seconds: Option<u64>) -> Event {
        self.stop_ticking();
        match seconds {
            Some(secs) => self.set_duration(secs),
            None => self.remaining_secs = self.total_secs,
        }
        tracing::debug!(total = self.total_secs, "countdown reset");
        Event::TimerReset {
            total_secs: self.total_secs,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Advance by one second.
    ///
    /// Returns `None` for a stale token, `Event::Tick` for an ordinary
    /// decrement, and `Event::TimerCompleted` on the tick that reaches zero.
    /// Completion stops the schedule before it is reported.
    pub fn tick(&mut self, token: TickToken) -> Option<Event> {
        if self.active != Some(token) {
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return Some(Event::Tick {
                remaining_secs: self.remaining_secs,
                total_secs: self.total_secs,
            });
        }

        self.stop_ticking();
        tracing::debug!(total = self.total_secs, "countdown completed");
        Some(Event::TimerCompleted {
            total_secs: self.total_secs,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn set_duration(&mut self, secs: u64) {
        self.total_secs = secs;
        self.remaining_secs = secs;
    }

    /// Returns whether a schedule was actually cancelled.
    fn stop_ticking(&mut self) -> bool {
        match self.active.take() {
            Some(token) => {
                self.scheduler.cancel(token);
                true
            }
            None => false,
        }
    }
}
