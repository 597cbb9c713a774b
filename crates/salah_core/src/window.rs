//! Prayer windows: how long each salah may be prayed.
//!
//! Fajr runs until sunrise, Dhuhr until the Asr adhaan, Asr until the
//! Maghrib adhaan, Maghrib until the Ishaa adhaan and Ishaa until the next
//! day's Fajr adhaan. The stretch between sunrise and Dhuhr belongs to no
//! window.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use salah_types::{Salah, SalahName, SalahTimes, SalahTimesPayload};
use serde::Serialize;

/// End of `name`'s window on `day`; `next_day` only matters for Ishaa.
pub fn window_end_within(
    day: &SalahTimes,
    next_day: &SalahTimes,
    name: SalahName,
) -> NaiveDateTime {
    match name {
        SalahName::Fajr => day.sunrise(),
        SalahName::Dhuhr => day.asr().adhaan_time(),
        SalahName::Asr => day.maghrib().adhaan_time(),
        SalahName::Maghrib => day.ishaa().adhaan_time(),
        SalahName::Ishaa => next_day.fajr().adhaan_time(),
    }
}

/// End of today's window for `name`.
pub fn window_end(payload: &SalahTimesPayload, name: SalahName) -> NaiveDateTime {
    window_end_within(payload.today(), payload.tomorrow(), name)
}

/// End of the window that opens on `date`, when the payload covers it.
///
/// Tomorrow's Ishaa has no answer: the payload does not hold the day after.
pub fn window_end_on(
    payload: &SalahTimesPayload,
    date: NaiveDate,
    name: SalahName,
) -> Option<NaiveDateTime> {
    let day = payload.day(date)?;
    match date.succ_opt().and_then(|next| payload.day(next)) {
        Some(next_day) => Some(window_end_within(day, next_day, name)),
        None if name == SalahName::Ishaa => None,
        None => Some(window_end_within(day, day, name)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalahWindow {
    pub name: SalahName,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SalahWindow {
    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.start <= time && time < self.end
    }

    /// Time left before the window closes, zero once it has.
    pub fn remaining(&self, now: NaiveDateTime) -> Duration {
        (self.end - now).max(Duration::zero())
    }
}

/// The window `now` falls in, if any.
///
/// Yesterday's Ishaa is considered too, so the small hours before Fajr
/// still report Ishaa.
pub fn current_window(payload: &SalahTimesPayload, now: NaiveDateTime) -> Option<SalahWindow> {
    let pairs = [
        (payload.yesterday(), payload.today()),
        (payload.today(), payload.tomorrow()),
    ];
    pairs.into_iter().find_map(|(day, next_day)| {
        SalahName::ALL
            .iter()
            .map(|&name| SalahWindow {
                name,
                start: day.salah(name).adhaan_time(),
                end: window_end_within(day, next_day, name),
            })
            .find(|window| window.contains(now))
    })
}

/// The first salah whose adhaan is still ahead of `now`.
pub fn next_salah(payload: &SalahTimesPayload, now: NaiveDateTime) -> Option<&Salah> {
    [payload.today(), payload.tomorrow()]
        .into_iter()
        .flat_map(|day| SalahName::ALL.iter().map(move |&name| day.salah(name)))
        .find(|salah| salah.adhaan_time() > now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, sample_payload};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()
    }

    #[test]
    fn test_window_ends() {
        let payload = sample_payload(today());
        let d = today();
        assert_eq!(window_end(&payload, SalahName::Fajr), at(d, 6, 30));
        assert_eq!(window_end(&payload, SalahName::Dhuhr), at(d, 15, 40));
        assert_eq!(window_end(&payload, SalahName::Asr), at(d, 18, 45));
        assert_eq!(window_end(&payload, SalahName::Maghrib), at(d, 20, 5));
        assert_eq!(window_end(&payload, SalahName::Ishaa), payload.tomorrow().fajr().adhaan_time());
    }

    #[test]
    fn test_window_end_on_other_days() {
        let payload = sample_payload(today());
        let yesterday = today().pred_opt().unwrap();
        let tomorrow = today().succ_opt().unwrap();

        assert_eq!(
            window_end_on(&payload, yesterday, SalahName::Ishaa),
            Some(payload.today().fajr().adhaan_time())
        );
        assert_eq!(window_end_on(&payload, tomorrow, SalahName::Asr), Some(at(tomorrow, 18, 45)));
        assert_eq!(window_end_on(&payload, tomorrow, SalahName::Ishaa), None);
        let outside = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(window_end_on(&payload, outside, SalahName::Fajr), None);
    }

    #[test]
    fn test_current_window_during_asr() {
        let payload = sample_payload(today());
        let window = current_window(&payload, at(today(), 17, 0)).unwrap();
        assert_eq!(window.name, SalahName::Asr);
        assert_eq!(window.remaining(at(today(), 17, 0)), Duration::minutes(105));
    }

    #[test]
    fn test_small_hours_belong_to_yesterdays_ishaa() {
        let payload = sample_payload(today());
        let window = current_window(&payload, at(today(), 2, 0)).unwrap();
        assert_eq!(window.name, SalahName::Ishaa);
        assert_eq!(window.start.date(), today().pred_opt().unwrap());
        assert_eq!(window.end, at(today(), 5, 0));
    }

    #[test]
    fn test_no_window_between_sunrise_and_dhuhr() {
        let payload = sample_payload(today());
        assert_eq!(current_window(&payload, at(today(), 9, 0)), None);
        // Boundaries: adhaan opens a window, the end instant belongs to the next.
        assert_eq!(current_window(&payload, at(today(), 6, 30)), None);
        let dhuhr = current_window(&payload, at(today(), 12, 30));
        assert_eq!(dhuhr.map(|w| w.name), Some(SalahName::Dhuhr));
    }

    #[test]
    fn test_next_salah_crosses_midnight() {
        let payload = sample_payload(today());
        let after_dhuhr = next_salah(&payload, at(today(), 13, 0));
        assert_eq!(after_dhuhr.map(|s| s.name()), Some(SalahName::Asr));
        let next = next_salah(&payload, at(today(), 21, 0)).unwrap();
        assert_eq!(next.name(), SalahName::Fajr);
        assert_eq!(next.adhaan_time().date(), today().succ_opt().unwrap());
    }
}
