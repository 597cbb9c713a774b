//! Prayer-table sources for salah-reminder.
//!
//! Each supported location is bound to exactly one adapter that scrapes
//! the location's published table and normalizes it into `SalahTimes`.

pub mod config;
pub mod geo;
pub mod http;
pub mod location;
pub mod source;
pub mod sources;

pub use config::SourceConfig;
pub use geo::detect_location_id;
pub use location::{city_name, Location, Source};
pub use source::{DaySchedules, SalahSource};
pub use sources::{KelownaSource, MuscatSource};
