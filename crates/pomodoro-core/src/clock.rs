//! Text formatting for the countdown readout and the digital wall clock.

use chrono::{DateTime, Local, TimeZone};

/// `MM:SS` for a remaining duration. Minutes are not capped at 59, so a
/// three hour session reads `180:00`.
pub fn format_countdown(remaining_secs: u64) -> String {
    let minutes = remaining_secs / 60;
    let seconds = remaining_secs % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// 12-hour wall clock with AM/PM suffix, e.g. `03:07 PM`.
pub fn format_wall_clock<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%I:%M %p").to_string()
}

/// The local wall clock right now.
pub fn wall_clock_now() -> String {
    format_wall_clock(&Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn countdown_pads_both_fields() {
        assert_eq!(format_countdown(0), "00:00");
        assert_eq!(format_countdown(9), "00:09");
        assert_eq!(format_countdown(65), "01:05");
        assert_eq!(format_countdown(1500), "25:00");
    }

    #[test]
    fn countdown_minutes_grow_past_two_digits() {
        assert_eq!(format_countdown(180 * 60), "180:00");
    }

    #[test]
    fn wall_clock_uses_twelve_hour_format() {
        let afternoon = Utc.with_ymd_and_hms(2024, 3, 9, 15, 7, 42).unwrap();
        assert_eq!(format_wall_clock(&afternoon), "03:07 PM");

        let midnight = Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap();
        assert_eq!(format_wall_clock(&midnight), "12:00 AM");
    }
}
