use chrono::{NaiveDateTime, Timelike};

/// Zero-padded 24-hour clock text: `HH:MM`, or `HH:MM:SS` with seconds.
pub fn format_clock_time(time: NaiveDateTime, include_seconds: bool) -> String {
    if include_seconds {
        format!("{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second())
    } else {
        format!("{:02}:{:02}", time.hour(), time.minute())
    }
}
