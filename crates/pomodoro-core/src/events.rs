use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{Mode, SessionConfig};
use crate::timer::TimerState;

/// Every state change in the core produces an Event.
/// Front ends print them; the JSON form is what `run --json` emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        total_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        total_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Tick {
        remaining_secs: u64,
        total_secs: u64,
    },
    TimerCompleted {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    ModeChanged {
        mode: Mode,
        title: String,
        message: String,
        at: DateTime<Utc>,
    },
    Configured {
        work_secs: u64,
        break_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: Mode,
        state: TimerState,
        remaining_secs: u64,
        total_secs: u64,
        progress: f64,
        display: String,
        at: DateTime<Utc>,
    },
}

/// Outbound interface of the session controller.
///
/// All methods default to no-ops so a view only implements what it draws.
pub trait SessionObserver {
    /// Called after every applied tick and after commands that move the
    /// countdown, so a view can redraw.
    fn on_tick(&mut self, _remaining_secs: u64, _total_secs: u64) {}

    /// Called on every work/break flip. Views update the mode label and
    /// play the alert sound here.
    fn on_mode_changed(&mut self, _mode: Mode) {}

    /// Called on every work/break flip with the popup text for the new mode.
    fn on_session_notify(&mut self, _title: &str, _message: &str) {}

    /// Called after a successful `configure`.
    fn on_configured(&mut self, _config: &SessionConfig) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
