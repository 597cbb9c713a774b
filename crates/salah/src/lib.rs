//! # Salah
//!
//! Reminders for the five daily prayers, driven by the tables mosques
//! publish rather than by astronomical calculation.
//!
//! This crate is a facade that re-exports the `salah` workspace crates.
//!
//! ## Crates
//!
//! - `types`: prayer times, the three-day payload, reminder events, errors
//! - `calendar`: label, clock and date normalization, iqamah fallbacks
//! - `network`: the per-location table scrapers and location detection
//! - `engine`: payload assembly, prayer windows, the reminder scheduler
//!
//! ## Usage
//!
//! ```no_run
//! use salah::prelude::*;
//!
//! # async fn run() -> Result<(), SalahError> {
//! let config = ReminderConfig::new().location("Muscat, Oman");
//! let source = Source::from_id("Muscat, Oman", &config.sources)?;
//! let handle = ReminderService::spawn(source, LogSink, SystemClock, &config);
//! if let Some(payload) = handle.current_payload() {
//!     let maghrib = payload.today().maghrib().adhaan_time();
//!     println!("Maghrib at {}", format_clock_time(maghrib, false));
//! }
//! # Ok(())
//! # }
//! ```

pub use salah_calendar as calendar;
pub use salah_core as engine;
pub use salah_network as network;
pub use salah_types as types;

pub use salah_core::*;
pub use salah_network::{detect_location_id, Location, SalahSource, Source, SourceConfig};
pub use salah_types::*;

pub mod prelude {
    pub use salah_core::{
        build_payload, current_window, window_end, Clock, LogSink, NotificationSink, ReminderConfig,
        ReminderHandle, ReminderService, SystemClock,
    };
    pub use salah_network::{Location, SalahSource, Source};
    pub use salah_types::{
        format_clock_time, EventKind, Salah, SalahError, SalahName, SalahTimes, SalahTimesPayload,
        ScheduledEvent, TimeSlot,
    };
}
