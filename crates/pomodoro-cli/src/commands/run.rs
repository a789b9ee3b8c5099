use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use pomodoro_core::clock::{format_countdown, wall_clock_now};
use pomodoro_core::{
    Config, Event, IntervalScheduler, Scheduler, SessionConfig, SessionController, TickToken,
    TimerState,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::audio::{AlertSound, AudioBackend, LofiPlayer, ProcessBackend};
use crate::input::{parse_command, parse_duration, Command, LofiAction, HELP};
use crate::notify::DesktopNotifier;
use crate::observer::TerminalObserver;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Work duration (e.g. "25", "25m", "90s", "1h"). Overrides config.
    #[arg(short, long, value_parser = parse_duration)]
    work: Option<u64>,
    /// Break duration (e.g. "5", "300s"). Overrides config.
    #[arg(short = 'b', long = "break", value_parser = parse_duration)]
    break_duration: Option<u64>,
    /// Print every event as a JSON line instead of drawing a status line
    #[arg(long)]
    json: bool,
    /// Disable desktop notifications
    #[arg(long)]
    no_notify: bool,
    /// Disable the alert sound
    #[arg(long)]
    no_sound: bool,
    /// Background track to use for `lofi play`. Overrides config.
    #[arg(long)]
    lofi: Option<PathBuf>,
    /// Start the first work phase right away
    #[arg(long)]
    autostart: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A running session: the controller plus the lofi player, fed by stdin
/// lines and scheduler ticks.
pub struct App<S: Scheduler, W: Write, B: AudioBackend> {
    controller: SessionController<S, TerminalObserver<W>>,
    lofi: LofiPlayer<B>,
    json: bool,
}

impl<S: Scheduler, W: Write, B: AudioBackend> App<S, W, B> {
    pub fn new(
        controller: SessionController<S, TerminalObserver<W>>,
        lofi: LofiPlayer<B>,
        json: bool,
    ) -> Self {
        Self {
            controller,
            lofi,
            json,
        }
    }

    pub fn controller(&self) -> &SessionController<S, TerminalObserver<W>> {
        &self.controller
    }

    pub fn greet(&mut self) -> io::Result<()> {
        if self.json {
            let snapshot = self.controller.snapshot();
            return self.emit(&snapshot);
        }
        let config = self.controller.config();
        let text = format!(
            "pomodoro: work {} / break {}. Type 'help' for commands.",
            format_countdown(config.work_secs()),
            format_countdown(config.break_secs())
        );
        self.say(&text)
    }

    pub fn handle_tick(&mut self, token: TickToken) -> io::Result<()> {
        for event in self.controller.handle_tick(token) {
            self.emit(&event)?;
        }
        Ok(())
    }

    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        match parse_command(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Ok(Flow::Continue),
            Err(message) => {
                self.say(&message)?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Start => {
                let event = self.controller.start();
                self.emit(&event)?;
            }
            Command::Pause => match self.controller.pause() {
                Some(event) => self.emit(&event)?,
                None => self.say("not running")?,
            },
            Command::Reset => {
                let event = self.controller.reset_current();
                self.emit(&event)?;
            }
            Command::Set {
                work_secs,
                break_secs,
            } => match self.controller.configure(work_secs, break_secs) {
                Ok(event) => self.emit(&event)?,
                Err(e) => self.say(&format!("error: {e}"))?,
            },
            Command::Default => {
                let event = self.controller.use_default_durations();
                self.emit(&event)?;
            }
            Command::Status => {
                let snapshot = self.controller.snapshot();
                self.emit(&snapshot)?;
            }
            Command::Clock => {
                let now = wall_clock_now();
                if self.json {
                    let line = serde_json::json!({ "type": "clock", "time": now }).to_string();
                    self.say(&line)?;
                } else {
                    self.say(&now)?;
                }
            }
            Command::Lofi(action) => {
                let state = match action {
                    LofiAction::Play => self.lofi.play(),
                    LofiAction::Pause => self.lofi.pause(),
                    LofiAction::Resume => self.lofi.resume(),
                    LofiAction::Restart => self.lofi.restart(),
                };
                if self.json {
                    let line =
                        serde_json::json!({ "type": "lofi", "state": state.label() }).to_string();
                    self.say(&line)?;
                } else {
                    self.say(&format!("lofi: {}", state.label()))?;
                }
            }
            Command::Help => self.say(HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn emit(&mut self, event: &Event) -> io::Result<()> {
        if self.json {
            let line = serde_json::to_string(event).map_err(io::Error::other)?;
            return self.say(&line);
        }
        match describe(event) {
            Some(text) => self.say(&text),
            None => Ok(()),
        }
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        self.controller.observer_mut().write_line(text)
    }
}

/// Human text for the events a terminal user asked for. Ticks and mode
/// changes are drawn by the observer instead.
fn describe(event: &Event) -> Option<String> {
    match event {
        Event::TimerStarted { remaining_secs, .. } => {
            Some(format!("started at {}", format_countdown(*remaining_secs)))
        }
        Event::TimerPaused { remaining_secs, .. } => {
            Some(format!("paused at {}", format_countdown(*remaining_secs)))
        }
        Event::TimerReset { remaining_secs, .. } => {
            Some(format!("reset to {}", format_countdown(*remaining_secs)))
        }
        Event::StateSnapshot {
            mode,
            state,
            display,
            ..
        } => {
            let state = match state {
                TimerState::Idle => "idle",
                TimerState::Running => "running",
            };
            Some(format!("[{mode}] {display} ({state})"))
        }
        _ => None,
    }
}

pub fn run(args: RunArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let base = config.session_config()?;
    let session = SessionConfig::new(
        args.work.unwrap_or(base.work_secs()),
        args.break_duration.unwrap_or(base.break_secs()),
    )?;

    let notifier = (!args.no_notify && config.notifications.enabled).then_some(DesktopNotifier);
    let alert = (!args.no_sound && config.notifications.sound).then(|| {
        AlertSound::new(
            config.notifications.alarm_sound.as_deref(),
            config.notifications.alarm_volume,
        )
    });
    let track = args
        .lofi
        .clone()
        .or_else(|| config.lofi.track.as_ref().map(PathBuf::from));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        let (scheduler, ticks) = IntervalScheduler::new();
        let observer = TerminalObserver::new(io::stdout(), !args.json, notifier, alert);
        let controller = SessionController::new(scheduler, observer, session);
        let lofi = LofiPlayer::new(ProcessBackend::default(), track, config.lofi.volume);
        let mut app = App::new(controller, lofi, args.json);

        app.greet()?;
        if args.autostart {
            app.execute(Command::Start)?;
        }
        event_loop(&mut app, ticks).await
    });

    // stdin is read on a blocking thread that may still be parked in read().
    runtime.shutdown_background();
    tracing::debug!("session ended");
    Ok(result?)
}

async fn event_loop<W: Write, B: AudioBackend>(
    app: &mut App<IntervalScheduler, W, B>,
    mut ticks: tokio::sync::mpsc::UnboundedReceiver<TickToken>,
) -> io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(token) = ticks.recv() => app.handle_tick(token)?,
            line = lines.next_line() => match line? {
                Some(line) => {
                    if app.handle_line(&line)? == Flow::Quit {
                        break;
                    }
                }
                None => break,
            },
        }
    }
    Ok(())
}
