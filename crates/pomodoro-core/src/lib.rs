//! # Pomodoro Desk Core Library
//!
//! This library holds everything about a Pomodoro session that is not
//! drawing: the countdown, the work/break toggle, tick scheduling and the
//! startup configuration. Front ends (the `pomodoro-cli` terminal app) own a
//! [`SessionController`] and feed it commands and scheduler ticks.
//!
//! ## Architecture
//!
//! - **Countdown**: whole-second state machine advanced by `tick()`
//! - **Session**: work/break mode, durations, completion handling
//! - **Scheduler**: `schedule(interval) -> TickToken` abstraction with a
//!   tokio implementation and a manual one
//! - **Events**: serialisable [`Event`]s and the [`SessionObserver`] trait
//!
//! ## Key Components
//!
//! - [`CountdownTimer`]: Countdown state machine
//! - [`SessionController`]: Work/break controller
//! - [`Config`]: Startup configuration

pub mod clock;
pub mod error;
pub mod events;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DurationField};
pub use events::{Event, NoopObserver, SessionObserver};
pub use scheduler::{IntervalScheduler, ManualScheduler, Scheduler, TickToken, TICK_INTERVAL};
pub use session::{Mode, SessionConfig, SessionController};
pub use storage::Config;
pub use timer::{CountdownTimer, TimerState};
