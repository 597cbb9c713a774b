//! Fixtures shared by the unit tests.

use chrono::{NaiveDate, NaiveDateTime};
use salah_calendar::{iso_date_key, shift_onto};
use salah_network::{DaySchedules, Location, SalahSource};
use salah_types::{Salah, SalahError, SalahName, SalahTimes, SalahTimesPayload};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub(crate) fn at(date: NaiveDate, hh: u32, mm: u32) -> NaiveDateTime {
    date.and_hms_opt(hh, mm, 0).unwrap()
}

/// Fajr 05:00/05:25, sunrise 06:30, Dhuhr 12:30/12:45, Asr 15:40/16:00,
/// Maghrib 18:45/18:50, Ishaa 20:05/20:25.
pub(crate) fn sample_day(date: NaiveDate) -> SalahTimes {
    let salah = |name, a: (u32, u32), i: (u32, u32)| {
        Salah::new(name, at(date, a.0, a.1), at(date, i.0, i.1)).unwrap()
    };
    SalahTimes::new(
        salah(SalahName::Fajr, (5, 0), (5, 25)),
        at(date, 6, 30),
        salah(SalahName::Dhuhr, (12, 30), (12, 45)),
        salah(SalahName::Asr, (15, 40), (16, 0)),
        salah(SalahName::Maghrib, (18, 45), (18, 50)),
        salah(SalahName::Ishaa, (20, 5), (20, 25)),
    )
    .unwrap()
}

pub(crate) fn sample_payload(today: NaiveDate) -> SalahTimesPayload {
    let day = sample_day(today);
    SalahTimesPayload::new(day.shifted(-1), day.clone(), day.shifted(1)).unwrap()
}

/// Serves one template day shifted onto whatever dates are asked for.
pub(crate) struct StaticSource {
    template: SalahTimes,
    location: Location,
    failures: usize,
    missing: Option<NaiveDate>,
    latency: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub(crate) fn new(template: SalahTimes) -> Self {
        Self {
            template,
            location: Location::Kelowna,
            failures: 0,
            missing: None,
            latency: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing_first(mut self, failures: usize) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn without(mut self, date: NaiveDate) -> Self {
        self.missing = Some(date);
        self
    }

    /// Every fetch takes `latency` of (tokio) time before answering.
    pub(crate) fn slow(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub(crate) fn at_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SalahSource for StaticSource {
    fn location(&self) -> Location {
        self.location
    }

    async fn fetch_day(&self, date: Option<NaiveDate>) -> Result<SalahTimes, SalahError> {
        let date = date.unwrap_or(self.template.date());
        let mut days = self.fetch_range(&[date]).await?;
        days.remove(&iso_date_key(&date))
            .ok_or_else(|| SalahError::parse(format!("no row for {}", date)))
    }

    async fn fetch_range(&self, dates: &[NaiveDate]) -> Result<DaySchedules, SalahError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if call < self.failures {
            return Err(SalahError::transport("connection refused"));
        }
        Ok(dates
            .iter()
            .filter(|date| Some(**date) != self.missing)
            .map(|date| (iso_date_key(date), shift_onto(&self.template, *date)))
            .collect())
    }
}
