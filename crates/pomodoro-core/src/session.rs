//! Work/break session controller.
//!
//! The controller owns the countdown, the configured durations and the
//! current [`Mode`]. It is the only thing that mutates either; front ends
//! talk to it through its methods and hear back through a
//! [`SessionObserver`].
//!
//! When a countdown completes the mode flips. A finished work phase starts
//! the break right away, but a finished break only rewinds to the work
//! duration and waits for the user to press start.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, DurationField, Result};
use crate::events::{Event, SessionObserver};
use crate::scheduler::{Scheduler, TickToken};
use crate::timer::CountdownTimer;

pub const DEFAULT_WORK_SECS: u64 = 25 * 60;
pub const DEFAULT_BREAK_SECS: u64 = 5 * 60;
/// Longest work phase the custom-timer dialog offers (3 hours).
pub const MAX_WORK_SECS: u64 = 180 * 60;
/// Longest break the custom-timer dialog offers (1 hour).
pub const MAX_BREAK_SECS: u64 = 60 * 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Work,
    Break,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::Break => "break",
        }
    }

    pub fn toggled(self) -> Mode {
        match self {
            Mode::Work => Mode::Break,
            Mode::Break => Mode::Work,
        }
    }

    /// Popup `(title, message)` shown when this mode begins.
    pub fn notification(self) -> (&'static str, &'static str) {
        match self {
            Mode::Break => ("Session Over!", "~~take a break~~"),
            Mode::Work => ("Break Over!", "~~back to work~~"),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated work/break durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionConfig {
    work_secs: u64,
    break_secs: u64,
}

impl SessionConfig {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDuration`] when either duration is zero
    /// or longer than the dialog allows.
    pub fn new(work_secs: u64, break_secs: u64) -> Result<Self> {
        validate(DurationField::Work, work_secs, MAX_WORK_SECS)?;
        validate(DurationField::Break, break_secs, MAX_BREAK_SECS)?;
        Ok(Self {
            work_secs,
            break_secs,
        })
    }

    pub fn work_secs(&self) -> u64 {
        self.work_secs
    }

    pub fn break_secs(&self) -> u64 {
        self.break_secs
    }

    pub fn duration_for(&self, mode: Mode) -> u64 {
        match mode {
            Mode::Work => self.work_secs,
            Mode::Break => self.break_secs,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            work_secs: DEFAULT_WORK_SECS,
            break_secs: DEFAULT_BREAK_SECS,
        }
    }
}

fn validate(field: DurationField, secs: u64, max: u64) -> Result<()> {
    if secs == 0 {
        return Err(CoreError::invalid_duration(field, secs, "must be positive"));
    }
    if secs > max {
        return Err(CoreError::invalid_duration(
            field,
            secs,
            format!("must be at most {} minutes", max / 60),
        ));
    }
    Ok(())
}

/// Owns the countdown and alternates it between work and break.
#[derive(Debug)]
pub struct SessionController<S: Scheduler, O: SessionObserver> {
    timer: CountdownTimer<S>,
    config: SessionConfig,
    mode: Mode,
    observer: O,
}

impl<S: Scheduler, O: SessionObserver> SessionController<S, O> {
    /// Idle controller in work mode, rewound to the work duration.
    pub fn new(scheduler: S, observer: O, config: SessionConfig) -> Self {
        Self {
            timer: CountdownTimer::new(scheduler, config.work_secs()),
            config,
            mode: Mode::Work,
            observer,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn timer(&self) -> &CountdownTimer<S> {
        &self.timer
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            state: self.timer.state(),
            remaining_secs: self.timer.remaining_secs(),
            total_secs: self.timer.total_secs(),
            progress: self.timer.progress(),
            display: self.timer.display(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Event {
        let event = self.timer.start(None);
        self.redraw();
        event
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.timer.pause();
        self.redraw();
        event
    }

    /// Rewind without starting. See [`CountdownTimer::reset`].
    pub fn reset(&mut self, seconds: Option<u64>) -> Event {
        let event = self.timer.reset(seconds);
        self.redraw();
        event
    }

    /// Rewind to the full duration of whichever mode is active.
    pub fn reset_current(&mut self) -> Event {
        self.reset(Some(self.config.duration_for(self.mode)))
    }

    /// Apply new durations, go back to work mode and rewind (not start).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDuration`] for a rejected duration. The
    /// previous configuration, mode and countdown are left untouched.
    pub fn configure(&mut self, work_secs: u64, break_secs: u64) -> Result<Event> {
        let config = SessionConfig::new(work_secs, break_secs).inspect_err(|e| {
            tracing::warn!(error = %e, "rejected session configuration");
        })?;
        Ok(self.apply_config(config))
    }

    /// The dialog's "Default (25 : 5)" button.
    pub fn use_default_durations(&mut self) -> Event {
        self.apply_config(SessionConfig::default())
    }

    /// Feed one scheduler tick through. Returns every event it caused;
    /// empty for a stale token.
    pub fn handle_tick(&mut self, token: TickToken) -> Vec<Event> {
        let Some(event) = self.timer.tick(token) else {
            return Vec::new();
        };
        self.redraw();

        let completed = matches!(event, Event::TimerCompleted { .. });
        let mut events = vec![event];
        if completed {
            events.extend(self.on_timer_completed());
        }
        events
    }

    /// Flip the mode after a countdown reaches zero.
    ///
    /// Work → Break starts the break countdown. Break → Work only rewinds
    /// to the work duration.
    pub fn on_timer_completed(&mut self) -> Vec<Event> {
        let next = self.mode.toggled();
        let (title, message) = next.notification();
        tracing::info!(from = %self.mode, to = %next, "session mode changed");

        self.mode = next;
        self.observer.on_session_notify(title, message);
        self.observer.on_mode_changed(next);

        let changed = Event::ModeChanged {
            mode: next,
            title: title.to_string(),
            message: message.to_string(),
            at: Utc::now(),
        };
        let follow_up = match next {
            Mode::Break => self.timer.start(Some(self.config.break_secs())),
            Mode::Work => self.timer.reset(Some(self.config.work_secs())),
        };
        self.redraw();
        vec![changed, follow_up]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply_config(&mut self, config: SessionConfig) -> Event {
        self.config = config;
        self.mode = Mode::Work;
        self.timer.reset(Some(config.work_secs()));
        tracing::info!(
            work_secs = config.work_secs(),
            break_secs = config.break_secs(),
            "session configured"
        );
        self.observer.on_configured(&config);
        self.redraw();
        Event::Configured {
            work_secs: config.work_secs(),
            break_secs: config.break_secs(),
            at: Utc::now(),
        }
    }

    fn redraw(&mut self) {
        self.observer
            .on_tick(self.timer.remaining_secs(), self.timer.total_secs());
    }
}
