//! Reminder text and the sink it is delivered to.

use salah_types::{format_clock_time, EventKind, ScheduledEvent, SalahTimesPayload, TimeSlot};

use crate::window::window_end_on;

/// Receives one call per fired reminder.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

impl<F> NotificationSink for F
where
    F: Fn(&str, &str) + Send + Sync,
{
    fn notify(&self, title: &str, body: &str) {
        self(title, body)
    }
}

/// Writes reminders to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, title: &str, body: &str) {
        tracing::info!(title, body, "reminder");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

pub fn compose(event: &ScheduledEvent, payload: &SalahTimesPayload) -> Notification {
    let time = format_clock_time(event.firing_time, false);
    let Some(name) = event.slot.salah_name() else {
        return Notification {
            title: TimeSlot::Sunrise.to_string(),
            body: format!("The sun rises at {time}. The time for Fajr has ended."),
        };
    };

    match event.kind {
        EventKind::Adhaan => {
            let body = match window_end_on(payload, event.firing_time.date(), name) {
                Some(end) => format!(
                    "It is time for {name} ({time}). Pray before {}.",
                    format_clock_time(end, false)
                ),
                None => format!("It is time for {name} ({time})."),
            };
            Notification { title: format!("{name} Adhaan"), body }
        }
        EventKind::Iqamah => Notification {
            title: format!("{name} Iqamah"),
            body: format!("The congregation for {name} stands at {time}."),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, sample_payload};
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()
    }

    #[test]
    fn test_adhaan_mentions_window_end() {
        let payload = sample_payload(today());
        let event = ScheduledEvent::new(TimeSlot::Asr, EventKind::Adhaan, at(today(), 15, 40));
        let note = compose(&event, &payload);
        assert_eq!(note.title, "Asr Adhaan");
        assert_eq!(note.body, "It is time for Asr (15:40). Pray before 18:45.");
    }

    #[test]
    fn test_iqamah_and_sunrise_text() {
        let payload = sample_payload(today());
        let iqamah = ScheduledEvent::new(TimeSlot::Maghrib, EventKind::Iqamah, at(today(), 18, 50));
        assert_eq!(compose(&iqamah, &payload).title, "Maghrib Iqamah");

        let sunrise = ScheduledEvent::new(TimeSlot::Sunrise, EventKind::Adhaan, at(today(), 6, 30));
        let note = compose(&sunrise, &payload);
        assert_eq!(note.title, "Sunrise");
        assert!(note.body.contains("06:30"));
    }

    #[test]
    fn test_closure_sink() {
        let seen = Mutex::new(Vec::new());
        let sink = |title: &str, _body: &str| seen.lock().unwrap().push(title.to_string());
        sink.notify("Fajr Adhaan", "");
        assert_eq!(*seen.lock().unwrap(), vec!["Fajr Adhaan".to_string()]);
    }
}
