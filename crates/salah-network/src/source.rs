//! The capability every prayer-table source implements.

use chrono::NaiveDate;
use salah_types::{SalahError, SalahTimes};
use std::collections::BTreeMap;
use std::future::Future;

use crate::location::Location;

/// Day schedules keyed by `YYYY-MM-DD` (see `salah_calendar::iso_date_key`).
pub type DaySchedules = BTreeMap<String, SalahTimes>;

/// A source of published prayer tables for one location.
///
/// Implementations are stateless between calls. Whatever the remote page
/// exposes (a single day or a whole month), a fetch either returns complete
/// schedules or fails as a unit; a partially parsed table is an error.
pub trait SalahSource: Send + Sync {
    /// Location this source publishes times for.
    fn location(&self) -> Location;

    /// Fetches one day's schedule, defaulting to the source's current day.
    ///
    /// # Errors
    ///
    /// [`SalahError::Transport`] when the page cannot be retrieved and
    /// [`SalahError::Parse`] when any required field is missing or malformed.
    fn fetch_day(
        &self,
        date: Option<NaiveDate>,
    ) -> impl Future<Output = Result<SalahTimes, SalahError>> + Send;

    /// Fetches every requested date. The result holds exactly one entry per
    /// distinct date, or the call fails.
    fn fetch_range(
        &self,
        dates: &[NaiveDate],
    ) -> impl Future<Output = Result<DaySchedules, SalahError>> + Send;
}
