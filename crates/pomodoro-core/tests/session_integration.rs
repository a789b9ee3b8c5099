//! Integration tests for the session controller on the tokio scheduler.
//!
//! Runs with a paused clock so whole work/break cycles finish instantly.

use std::time::Duration;

use pomodoro_core::{
    IntervalScheduler, Mode, SessionConfig, SessionController, SessionObserver, TimerState,
};
use tokio::time::Instant;

#[derive(Debug, Default)]
struct Recorder {
    modes: Vec<Mode>,
    notices: Vec<String>,
}

impl SessionObserver for Recorder {
    fn on_mode_changed(&mut self, mode: Mode) {
        self.modes.push(mode);
    }

    fn on_session_notify(&mut self, title: &str, _message: &str) {
        self.notices.push(title.to_string());
    }
}

#[tokio::test(start_paused = true)]
async fn test_full_work_break_cycle() {
    let (scheduler, mut ticks) = IntervalScheduler::new();
    let config = SessionConfig::new(3, 2).unwrap();
    let mut ctrl = SessionController::new(scheduler, Recorder::default(), config);

    let started = Instant::now();
    ctrl.start();
    while ctrl.observer().modes.len() < 2 {
        let token = ticks.recv().await.unwrap();
        ctrl.handle_tick(token);
    }

    assert_eq!(ctrl.observer().modes, vec![Mode::Break, Mode::Work]);
    assert_eq!(ctrl.observer().notices, vec!["Session Over!", "Break Over!"]);
    assert_eq!(ctrl.mode(), Mode::Work);
    assert_eq!(ctrl.timer().state(), TimerState::Idle);
    assert_eq!(ctrl.timer().remaining_secs(), 3);

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(5), "finished early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(6), "finished late: {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_ticks_until_restart() {
    let (scheduler, mut ticks) = IntervalScheduler::new();
    let config = SessionConfig::new(60, 30).unwrap();
    let mut ctrl = SessionController::new(scheduler, Recorder::default(), config);

    ctrl.start();
    for _ in 0..10 {
        let token = ticks.recv().await.unwrap();
        ctrl.handle_tick(token);
    }
    assert_eq!(ctrl.timer().remaining_secs(), 50);

    ctrl.pause();
    let idle = tokio::time::timeout(Duration::from_secs(30), ticks.recv()).await;
    assert!(idle.is_err(), "paused countdown kept ticking");
    assert_eq!(ctrl.timer().remaining_secs(), 50);

    ctrl.start();
    let token = ticks.recv().await.unwrap();
    ctrl.handle_tick(token);
    assert_eq!(ctrl.timer().remaining_secs(), 49);
}

#[tokio::test(start_paused = true)]
async fn test_configure_while_running_discards_old_ticks() {
    let (scheduler, mut ticks) = IntervalScheduler::new();
    let mut ctrl = SessionController::new(
        scheduler,
        Recorder::default(),
        SessionConfig::default(),
    );

    ctrl.start();
    let token = ticks.recv().await.unwrap();
    ctrl.handle_tick(token);

    ctrl.configure(10 * 60, 2 * 60).unwrap();
    assert_eq!(ctrl.timer().state(), TimerState::Idle);
    assert_eq!(ctrl.timer().remaining_secs(), 600);
    assert!(ctrl.handle_tick(token).is_empty());
}
