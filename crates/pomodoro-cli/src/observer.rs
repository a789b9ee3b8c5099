//! Terminal view of a running session.

use std::io::{self, Write};

use pomodoro_core::clock::format_countdown;
use pomodoro_core::{Mode, SessionConfig, SessionObserver};

use crate::audio::AlertSound;
use crate::notify::DesktopNotifier;

const BAR_WIDTH: usize = 30;

/// One status line: `[work] 24:59 |#.....| 4%`.
pub fn render_line(mode: Mode, remaining_secs: u64, total_secs: u64) -> String {
    let progress = if total_secs == 0 {
        0.0
    } else {
        1.0 - remaining_secs as f64 / total_secs as f64
    };
    let filled = ((progress * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!(
        "[{mode}] {} |{}{}| {:>3}%",
        format_countdown(remaining_secs),
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        (progress * 100.0).round() as u32,
    )
}

/// Draws ticks, announces mode changes and fires the collaborators.
///
/// With `live` set, ticks redraw a single line in place; otherwise nothing
/// is drawn on ticks (the JSON event stream carries them instead).
pub struct TerminalObserver<W: Write> {
    out: W,
    live: bool,
    mode: Mode,
    notifier: Option<DesktopNotifier>,
    alert: Option<AlertSound>,
    line_open: bool,
}

impl<W: Write> TerminalObserver<W> {
    pub fn new(
        out: W,
        live: bool,
        notifier: Option<DesktopNotifier>,
        alert: Option<AlertSound>,
    ) -> Self {
        Self {
            out,
            live,
            mode: Mode::Work,
            notifier,
            alert,
            line_open: false,
        }
    }

    /// Mode as last announced to the view.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Print a full line, ending any in-place status line first.
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.close_line()?;
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    fn close_line(&mut self) -> io::Result<()> {
        if self.line_open {
            writeln!(self.out)?;
            self.line_open = false;
        }
        Ok(())
    }

    fn report(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }
}

impl<W: Write> SessionObserver for TerminalObserver<W> {
    fn on_tick(&mut self, remaining_secs: u64, total_secs: u64) {
        if !self.live {
            return;
        }
        let line = render_line(self.mode, remaining_secs, total_secs);
        let result = write!(self.out, "\r{line}").and_then(|()| self.out.flush());
        self.line_open = true;
        self.report(result);
    }

    fn on_mode_changed(&mut self, mode: Mode) {
        self.mode = mode;
        if let Some(alert) = &self.alert {
            alert.play();
        }
    }

    fn on_session_notify(&mut self, title: &str, message: &str) {
        if let Some(notifier) = &self.notifier {
            notifier.show(title, message);
        }
        if self.live {
            let result = self.write_line(&format!("*** {title} {message} ***"));
            self.report(result);
        }
    }

    fn on_configured(&mut self, config: &SessionConfig) {
        self.mode = Mode::Work;
        if self.live {
            let text = format!(
                "work {} / break {}",
                format_countdown(config.work_secs()),
                format_countdown(config.break_secs())
            );
            let result = self.write_line(&text);
            self.report(result);
        }
    }
}
