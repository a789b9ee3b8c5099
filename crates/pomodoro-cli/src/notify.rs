use notify_rust::{Notification, Timeout};

/// Desktop popup shown when a phase ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn show(&self, title: &str, message: &str) {
        let result = Notification::new()
            .summary(title)
            .body(message)
            .appname("pomodoro-desk")
            .icon("alarm-clock")
            .timeout(Timeout::Never)
            .show();

        if let Err(e) = result {
            tracing::warn!(error = %e, "desktop notification failed");
        }
    }
}
