//! Periodic tick scheduling.
//!
//! The countdown never owns a thread or a toolkit timer. It asks a
//! [`Scheduler`] for a repeating tick and gets back a [`TickToken`]; the
//! event loop hands every fired token back to the controller, which drops
//! tokens that are no longer active.
//!
//! Two implementations are provided:
//!
//! - [`IntervalScheduler`]: tokio-backed, delivers tokens over an mpsc
//!   channel. Intended for a `current_thread` runtime.
//! - [`ManualScheduler`]: records schedules only; the owner decides when a
//!   tick happens. Used by tests and by embedders with their own clock.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Nominal tick period of the countdown.
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Identifies one scheduled repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickToken(u64);

impl TickToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Something that fires a token repeatedly until it is cancelled.
pub trait Scheduler {
    /// Begin firing a fresh token every `interval`.
    fn schedule(&mut self, interval: Duration) -> TickToken;

    /// Stop firing `token`. Unknown or already-cancelled tokens are ignored.
    fn cancel(&mut self, token: TickToken);
}

// ── Manual ───────────────────────────────────────────────────────────

/// Scheduler that only bookkeeps. Nothing fires on its own.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    active: HashMap<TickToken, Duration>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, token: TickToken) -> bool {
        self.active.contains_key(&token)
    }

    pub fn interval_of(&self, token: TickToken) -> Option<Duration> {
        self.active.get(&token).copied()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, interval: Duration) -> TickToken {
        self.next_id += 1;
        let token = TickToken(self.next_id);
        self.active.insert(token, interval);
        token
    }

    fn cancel(&mut self, token: TickToken) {
        self.active.remove(&token);
    }
}

// ── Tokio ────────────────────────────────────────────────────────────

/// Tokio-backed scheduler. Each schedule is one spawned task that sends its
/// token down the channel once per period; cancelling aborts the task.
///
/// Ticks are not drift-compensated: a late tick delays the following ones.
#[derive(Debug)]
pub struct IntervalScheduler {
    next_id: u64,
    tx: mpsc::UnboundedSender<TickToken>,
    tasks: HashMap<TickToken, JoinHandle<()>>,
}

impl IntervalScheduler {
    /// Create the scheduler and the receiving end the event loop reads.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TickToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            next_id: 0,
            tx,
            tasks: HashMap::new(),
        };
        (scheduler, rx)
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for IntervalScheduler {
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    fn schedule(&mut self, interval: Duration) -> TickToken {
        self.next_id += 1;
        let token = TickToken(self.next_id);
        // tokio rejects a zero period.
        let period = interval.max(Duration::from_millis(1));
        let tx = self.tx.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(token).is_err() {
                    break;
                }
            }
        });

        tracing::trace!(token = token.id(), ?period, "tick scheduled");
        self.tasks.insert(token, handle);
        token
    }

    fn cancel(&mut self, token: TickToken) {
        if let Some(handle) = self.tasks.remove(&token) {
            handle.abort();
            tracing::trace!(token = token.id(), "tick cancelled");
        }
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_tokens_are_unique_and_cancellable() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.schedule(TICK_INTERVAL);
        let b = scheduler.schedule(TICK_INTERVAL);
        assert_ne!(a, b);
        assert_eq!(scheduler.active_count(), 2);

        scheduler.cancel(a);
        assert!(!scheduler.is_active(a));
        assert!(scheduler.is_active(b));
        assert_eq!(scheduler.interval_of(b), Some(TICK_INTERVAL));

        // Double cancel is harmless.
        scheduler.cancel(a);
        assert_eq!(scheduler.active_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_first_tick_waits_one_period() {
        let (mut scheduler, mut rx) = IntervalScheduler::new();
        let started = Instant::now();
        let token = scheduler.schedule(TICK_INTERVAL);

        assert_eq!(rx.recv().await, Some(token));
        assert!(started.elapsed() >= TICK_INTERVAL);

        assert_eq!(rx.recv().await, Some(token));
        assert!(started.elapsed() >= TICK_INTERVAL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_cancel_stops_delivery() {
        let (mut scheduler, mut rx) = IntervalScheduler::new();
        let token = scheduler.schedule(TICK_INTERVAL);
        assert_eq!(rx.recv().await, Some(token));

        scheduler.cancel(token);
        assert_eq!(scheduler.active_count(), 0);

        let next = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(next.is_err(), "cancelled token kept firing");
    }
}
