use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::error::SalahError;

/// The five daily prayers, in calendar order.
///
/// Sunrise and Jummah are deliberately absent: sunrise carries no iqamah,
/// and Jummah occupies the Dhuhr slot on Fridays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalahName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Ishaa,
}

impl SalahName {
    pub const ALL: [SalahName; 5] = [
        SalahName::Fajr,
        SalahName::Dhuhr,
        SalahName::Asr,
        SalahName::Maghrib,
        SalahName::Ishaa,
    ];

    /// Canonical lowercase key, as used in serialized payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            SalahName::Fajr => "fajr",
            SalahName::Dhuhr => "dhuhr",
            SalahName::Asr => "asr",
            SalahName::Maghrib => "maghrib",
            SalahName::Ishaa => "ishaa",
        }
    }
}

impl fmt::Display for SalahName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SalahName::Fajr => "Fajr",
            SalahName::Dhuhr => "Dhuhr",
            SalahName::Asr => "Asr",
            SalahName::Maghrib => "Maghrib",
            SalahName::Ishaa => "Ishaa",
        };
        write!(f, "{}", s)
    }
}

/// A single prayer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Salah {
    name: SalahName,
    adhaan_time: NaiveDateTime,
    iqamah_time: NaiveDateTime,
}

impl Salah {
    /// Creates a prayer record. Iqamah may equal adhaan but never precede it.
    pub fn new(
        name: SalahName,
        adhaan_time: NaiveDateTime,
        iqamah_time: NaiveDateTime,
    ) -> Result<Self, SalahError> {
        if iqamah_time < adhaan_time {
            return Err(SalahError::InvalidSchedule(format!(
                "{} iqamah {} precedes adhaan {}",
                name, iqamah_time, adhaan_time
            )));
        }
        Ok(Self { name, adhaan_time, iqamah_time })
    }

    pub fn name(&self) -> SalahName {
        self.name
    }

    pub fn adhaan_time(&self) -> NaiveDateTime {
        self.adhaan_time
    }

    pub fn iqamah_time(&self) -> NaiveDateTime {
        self.iqamah_time
    }

    fn shifted(&self, by: Duration) -> Self {
        Self {
            name: self.name,
            adhaan_time: self.adhaan_time + by,
            iqamah_time: self.iqamah_time + by,
        }
    }
}

/// One calendar day's prayer schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SalahTimes {
    fajr: Salah,
    sunrise: NaiveDateTime,
    dhuhr: Salah,
    asr: Salah,
    maghrib: Salah,
    ishaa: Salah,
}

impl SalahTimes {
    /// Builds a day schedule, checking slot names, the shared calendar date
    /// and the fajr <= sunrise <= dhuhr <= asr <= maghrib <= ishaa ordering.
    pub fn new(
        fajr: Salah,
        sunrise: NaiveDateTime,
        dhuhr: Salah,
        asr: Salah,
        maghrib: Salah,
        ishaa: Salah,
    ) -> Result<Self, SalahError> {
        let slots = [
            (SalahName::Fajr, &fajr),
            (SalahName::Dhuhr, &dhuhr),
            (SalahName::Asr, &asr),
            (SalahName::Maghrib, &maghrib),
            (SalahName::Ishaa, &ishaa),
        ];
        for (expected, salah) in slots {
            if salah.name != expected {
                return Err(SalahError::InvalidSchedule(format!(
                    "{} record placed in the {} slot",
                    salah.name, expected
                )));
            }
        }

        let ordered = [
            fajr.adhaan_time,
            sunrise,
            dhuhr.adhaan_time,
            asr.adhaan_time,
            maghrib.adhaan_time,
            ishaa.adhaan_time,
        ];
        let date = fajr.adhaan_time.date();
        if let Some(stray) = ordered.iter().find(|t| t.date() != date) {
            return Err(SalahError::InvalidSchedule(format!(
                "{} does not fall on {}",
                stray, date
            )));
        }
        if let Some(pair) = ordered.windows(2).find(|w| w[0] > w[1]) {
            return Err(SalahError::InvalidSchedule(format!(
                "times out of order on {}: {} after {}",
                date,
                pair[0].time(),
                pair[1].time()
            )));
        }

        Ok(Self { fajr, sunrise, dhuhr, asr, maghrib, ishaa })
    }

    /// Calendar date shared by every adhaan time of the day.
    pub fn date(&self) -> NaiveDate {
        self.fajr.adhaan_time.date()
    }

    pub fn fajr(&self) -> &Salah {
        &self.fajr
    }

    pub fn sunrise(&self) -> NaiveDateTime {
        self.sunrise
    }

    pub fn dhuhr(&self) -> &Salah {
        &self.dhuhr
    }

    pub fn asr(&self) -> &Salah {
        &self.asr
    }

    pub fn maghrib(&self) -> &Salah {
        &self.maghrib
    }

    pub fn ishaa(&self) -> &Salah {
        &self.ishaa
    }

    pub fn salah(&self, name: SalahName) -> &Salah {
        match name {
            SalahName::Fajr => &self.fajr,
            SalahName::Dhuhr => &self.dhuhr,
            SalahName::Asr => &self.asr,
            SalahName::Maghrib => &self.maghrib,
            SalahName::Ishaa => &self.ishaa,
        }
    }

    /// Returns a copy moved by whole days; clock times are unchanged.
    pub fn shifted(&self, days: i64) -> SalahTimes {
        let by = Duration::days(days);
        SalahTimes {
            fajr: self.fajr.shifted(by),
            sunrise: self.sunrise + by,
            dhuhr: self.dhuhr.shifted(by),
            asr: self.asr.shifted(by),
            maghrib: self.maghrib.shifted(by),
            ishaa: self.ishaa.shifted(by),
        }
    }

    /// Every reminder-worthy instant of the day, sorted.
    pub fn events(&self) -> SmallVec<[ScheduledEvent; 11]> {
        let mut events: SmallVec<[ScheduledEvent; 11]> = SmallVec::new();
        events.push(ScheduledEvent::new(TimeSlot::Sunrise, EventKind::Adhaan, self.sunrise));
        for name in SalahName::ALL {
            let salah = self.salah(name);
            events.push(ScheduledEvent::new(name.into(), EventKind::Adhaan, salah.adhaan_time));
            events.push(ScheduledEvent::new(name.into(), EventKind::Iqamah, salah.iqamah_time));
        }
        events.sort();
        events
    }
}

/// Yesterday, today and tomorrow, centered on the date the payload was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalahTimesPayload {
    yesterday: SalahTimes,
    today: SalahTimes,
    tomorrow: SalahTimes,
}

impl SalahTimesPayload {
    /// Assembles a payload; the three days must be consecutive.
    pub fn new(
        yesterday: SalahTimes,
        today: SalahTimes,
        tomorrow: SalahTimes,
    ) -> Result<Self, SalahError> {
        let center = today.date();
        if yesterday.date().succ_opt() != Some(center)
            || center.succ_opt() != Some(tomorrow.date())
        {
            return Err(SalahError::InvalidSchedule(format!(
                "payload days {}, {}, {} are not consecutive",
                yesterday.date(),
                center,
                tomorrow.date()
            )));
        }
        Ok(Self { yesterday, today, tomorrow })
    }

    pub fn yesterday(&self) -> &SalahTimes {
        &self.yesterday
    }

    pub fn today(&self) -> &SalahTimes {
        &self.today
    }

    pub fn tomorrow(&self) -> &SalahTimes {
        &self.tomorrow
    }

    /// The date the payload is centered on.
    pub fn date(&self) -> NaiveDate {
        self.today.date()
    }

    /// Schedule covering `date`, if it is one of the three days.
    pub fn day(&self, date: NaiveDate) -> Option<&SalahTimes> {
        [&self.yesterday, &self.today, &self.tomorrow]
            .into_iter()
            .find(|day| day.date() == date)
    }
}

/// A reminder slot: one of the five prayers, or sunrise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Ishaa,
}

impl TimeSlot {
    pub fn salah_name(&self) -> Option<SalahName> {
        match self {
            TimeSlot::Fajr => Some(SalahName::Fajr),
            TimeSlot::Sunrise => None,
            TimeSlot::Dhuhr => Some(SalahName::Dhuhr),
            TimeSlot::Asr => Some(SalahName::Asr),
            TimeSlot::Maghrib => Some(SalahName::Maghrib),
            TimeSlot::Ishaa => Some(SalahName::Ishaa),
        }
    }
}

impl From<SalahName> for TimeSlot {
    fn from(name: SalahName) -> Self {
        match name {
            SalahName::Fajr => TimeSlot::Fajr,
            SalahName::Dhuhr => TimeSlot::Dhuhr,
            SalahName::Asr => TimeSlot::Asr,
            SalahName::Maghrib => TimeSlot::Maghrib,
            SalahName::Ishaa => TimeSlot::Ishaa,
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.salah_name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "Sunrise"),
        }
    }
}

/// Which moment of a prayer an event marks. Adhaan orders before iqamah.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Adhaan,
    Iqamah,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Adhaan => write!(f, "Adhaan"),
            EventKind::Iqamah => write!(f, "Iqamah"),
        }
    }
}

/// A single reminder firing derived from a day schedule.
///
/// Field order defines the total order: time first, then adhaan before
/// iqamah, then slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledEvent {
    pub firing_time: NaiveDateTime,
    pub kind: EventKind,
    pub slot: TimeSlot,
}

impl ScheduledEvent {
    pub fn new(slot: TimeSlot, kind: EventKind, firing_time: NaiveDateTime) -> Self {
        Self { firing_time, kind, slot }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 3).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn salah(name: SalahName, h: u32, m: u32, offset: i64) -> Salah {
        Salah::new(name, at(h, m), at(h, m) + Duration::minutes(offset)).unwrap()
    }

    fn sample_day() -> SalahTimes {
        SalahTimes::new(
            salah(SalahName::Fajr, 5, 10, 25),
            at(6, 30),
            salah(SalahName::Dhuhr, 12, 20, 0),
            salah(SalahName::Asr, 15, 40, 20),
            salah(SalahName::Maghrib, 18, 45, 5),
            salah(SalahName::Ishaa, 20, 5, 20),
        )
        .unwrap()
    }

    #[test]
    fn test_iqamah_before_adhaan_rejected() {
        let result = Salah::new(SalahName::Asr, at(15, 40), at(15, 30));
        assert!(matches!(result, Err(SalahError::InvalidSchedule(_))));
    }

    #[test]
    fn test_iqamah_equal_to_adhaan_allowed() {
        let s = Salah::new(SalahName::Dhuhr, at(12, 20), at(12, 20)).unwrap();
        assert_eq!(s.adhaan_time(), s.iqamah_time());
    }

    #[test]
    fn test_out_of_order_day_rejected() {
        let result = SalahTimes::new(
            salah(SalahName::Fajr, 5, 10, 25),
            at(6, 30),
            salah(SalahName::Dhuhr, 16, 20, 0),
            salah(SalahName::Asr, 15, 40, 20),
            salah(SalahName::Maghrib, 18, 45, 5),
            salah(SalahName::Ishaa, 20, 5, 20),
        );
        assert!(matches!(result, Err(SalahError::InvalidSchedule(_))));
    }

    #[test]
    fn test_wrong_slot_rejected() {
        let result = SalahTimes::new(
            salah(SalahName::Fajr, 5, 10, 25),
            at(6, 30),
            salah(SalahName::Asr, 12, 20, 0),
            salah(SalahName::Asr, 15, 40, 20),
            salah(SalahName::Maghrib, 18, 45, 5),
            salah(SalahName::Ishaa, 20, 5, 20),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_mixed_dates_rejected() {
        let tomorrow_sunrise = at(6, 30) + Duration::days(1);
        let result = SalahTimes::new(
            salah(SalahName::Fajr, 5, 10, 25),
            tomorrow_sunrise,
            salah(SalahName::Dhuhr, 12, 20, 0),
            salah(SalahName::Asr, 15, 40, 20),
            salah(SalahName::Maghrib, 18, 45, 5),
            salah(SalahName::Ishaa, 20, 5, 20),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_shift_keeps_clock_time() {
        let day = sample_day();
        let next = day.shifted(1);
        assert_eq!(next.date(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(next.maghrib().iqamah_time().time(), day.maghrib().iqamah_time().time());
        assert_eq!(next.shifted(-1), day);
    }

    #[test]
    fn test_events_sorted_with_adhaan_first_on_ties() {
        let events = sample_day().events();
        assert_eq!(events.len(), 11);
        assert!(events.windows(2).all(|w| w[0] <= w[1]));

        let dhuhr: Vec<_> = events.iter().filter(|e| e.slot == TimeSlot::Dhuhr).collect();
        assert_eq!(dhuhr[0].kind, EventKind::Adhaan);
        assert_eq!(dhuhr[1].kind, EventKind::Iqamah);
        assert_eq!(dhuhr[0].firing_time, dhuhr[1].firing_time);
    }

    #[test]
    fn test_payload_requires_consecutive_days() {
        let day = sample_day();
        assert!(SalahTimesPayload::new(day.shifted(-1), day.clone(), day.shifted(1)).is_ok());
        assert!(SalahTimesPayload::new(day.shifted(-2), day.clone(), day.shifted(1)).is_err());
    }

    #[test]
    fn test_payload_serializes_camel_case() {
        let day = sample_day();
        let payload = SalahTimesPayload::new(day.shifted(-1), day.clone(), day.shifted(1)).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["today"]["fajr"]["name"], "fajr");
        assert_eq!(json["today"]["maghrib"]["adhaanTime"], "2024-03-03T18:45:00");
        assert_eq!(json["tomorrow"]["sunrise"], "2024-03-04T06:30:00");
    }
}
