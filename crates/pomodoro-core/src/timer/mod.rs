mod countdown;

pub use countdown::{CountdownTimer, TimerState};
