//! Core types for salah-reminder.
//!
//! All timestamps are local wall-clock `NaiveDateTime` values for the
//! configured location; no time-zone conversion happens anywhere.

pub mod error;
pub mod format;
pub mod types;

pub use error::SalahError;
pub use format::format_clock_time;
pub use types::*;
