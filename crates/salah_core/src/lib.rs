//! Salah reminder engine.
//!
//! [`build_payload`] assembles yesterday, today and tomorrow from a
//! [`SalahSource`](salah_network::SalahSource); [`ReminderScheduler`] decides
//! what to announce and when; [`ReminderService`] drives it on tokio.

pub mod config;
pub mod notify;
pub mod payload;
pub mod scheduler;
pub mod service;
pub mod window;

#[cfg(test)]
mod testing;

pub use config::{ReminderConfig, DEFAULT_RETRY_BACKOFF_SECONDS};
pub use notify::{compose, LogSink, Notification, NotificationSink};
pub use payload::build_payload;
pub use scheduler::{
    next_event, payload_events, rollover, Command, ReminderFilter, ReminderScheduler,
    SchedulerState, Transition,
};
pub use service::{Clock, PayloadWatch, ReminderHandle, ReminderService, SystemClock, MAX_NAP};
pub use window::{
    current_window, next_salah, window_end, window_end_on, window_end_within, SalahWindow,
};
