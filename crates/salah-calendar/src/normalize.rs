//! Parsing primitives shared by every source adapter.
//!
//! Each helper turns one piece of loosely formatted table text into a
//! canonical value, or reports a `SalahError::Parse`.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use salah_types::{SalahError, SalahName, SalahTimes};

/// Lowercase English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Zero-based month index for a full English month name, ignoring case.
pub fn resolve_month_index(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|month| *month == name)
        .map(|i| i as u32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_uppercase().as_str() {
            "AM" | "A.M." => Some(Meridiem::Am),
            "PM" | "P.M." => Some(Meridiem::Pm),
            _ => None,
        }
    }
}

/// Converts a 12-hour clock hour (1..=12) to 0..=23.
pub fn to_24_hour(hour: u32, meridiem: Meridiem) -> Result<u32, SalahError> {
    if !(1..=12).contains(&hour) {
        return Err(SalahError::parse(format!("hour {} is not on a 12-hour clock", hour)));
    }
    Ok(match (meridiem, hour) {
        (Meridiem::Am, 12) => 0,
        (Meridiem::Am, h) => h,
        (Meridiem::Pm, 12) => 12,
        (Meridiem::Pm, h) => h + 12,
    })
}

/// `YYYY-MM-DD` key for anything carrying a calendar date.
///
/// Only the date part contributes, so a `NaiveDateTime` and its `date()`
/// produce the same key.
pub fn iso_date_key<D: Datelike>(date: &D) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

pub fn is_friday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Fri
}

/// Maps a source label to its canonical prayer.
///
/// Jummah takes the Dhuhr slot on Fridays, so a plain Dhuhr row is ignored
/// that day and a Jummah row is ignored on every other day. Unknown labels
/// (including sunrise, see [`is_sunrise_label`]) resolve to `None`.
pub fn resolve_salah_label(raw: &str, is_friday: bool) -> Option<SalahName> {
    let label = raw.trim().to_lowercase();
    match label.as_str() {
        "fajr" | "fajar" => Some(SalahName::Fajr),
        "dhuhr" | "dhur" | "duhr" | "zuhr" => (!is_friday).then_some(SalahName::Dhuhr),
        "jummah" | "jumuah" | "jumah" | "jumu'ah" => is_friday.then_some(SalahName::Dhuhr),
        "asr" => Some(SalahName::Asr),
        "maghrib" | "magreb" | "maghreb" => Some(SalahName::Maghrib),
        "isha" | "ishaa" => Some(SalahName::Ishaa),
        _ => None,
    }
}

pub fn is_sunrise_label(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "sunrise" | "shuruq" | "shurooq")
}

fn clock_component(part: &str, text: &str) -> Result<u32, SalahError> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SalahError::parse(format!("malformed clock text {:?}", text)));
    }
    part.parse::<u32>()
        .map_err(|_| SalahError::parse(format!("malformed clock text {:?}", text)))
}

/// Splits `H:MM` or `H:MM:SS` into (hour, minute, second).
fn split_clock(clock: &str) -> Result<(u32, u32, u32), SalahError> {
    let parts: Vec<&str> = clock.split(':').collect();
    match parts.as_slice() {
        [h, m] => Ok((clock_component(h, clock)?, clock_component(m, clock)?, 0)),
        [h, m, s] => Ok((
            clock_component(h, clock)?,
            clock_component(m, clock)?,
            clock_component(s, clock)?,
        )),
        _ => Err(SalahError::parse(format!("malformed clock text {:?}", clock))),
    }
}

fn on_date(
    date: NaiveDate,
    hour: u32,
    minute: u32,
    second: u32,
    text: &str,
) -> Result<NaiveDateTime, SalahError> {
    date.and_hms_opt(hour, minute, second)
        .ok_or_else(|| SalahError::parse(format!("clock text {:?} is out of range", text)))
}

/// Parses `h:mm:ss AM` (seconds optional) as a time on `date`.
pub fn parse_clock_12h(text: &str, date: NaiveDate) -> Result<NaiveDateTime, SalahError> {
    let text = text.trim();
    let (clock, meridiem) = text
        .rsplit_once(char::is_whitespace)
        .ok_or_else(|| SalahError::parse(format!("missing AM/PM in {:?}", text)))?;
    let meridiem = Meridiem::parse(meridiem)
        .ok_or_else(|| SalahError::parse(format!("missing AM/PM in {:?}", text)))?;
    let (hour, minute, second) = split_clock(clock.trim())?;
    on_date(date, to_24_hour(hour, meridiem)?, minute, second, text)
}

/// Parses 24-hour `HH:MM` as a time on `date`.
pub fn parse_clock_24h(text: &str, date: NaiveDate) -> Result<NaiveDateTime, SalahError> {
    let text = text.trim();
    let (hour, minute, second) = split_clock(text)?;
    on_date(date, hour, minute, second, text)
}

/// Finds a `Month D, YYYY` date inside a table header such as
/// `"Sunday March 3, 2024"`.
pub fn parse_display_date(text: &str) -> Result<NaiveDate, SalahError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    for window in tokens.windows(3) {
        let Some(month) = resolve_month_index(window[0]) else {
            continue;
        };
        let Some(day) = window[1].strip_suffix(',') else {
            continue;
        };
        if day.is_empty() || day.len() > 2 || !day.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        let year = window[2];
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        let (Ok(day), Ok(year)) = (day.parse::<u32>(), year.parse::<i32>()) else {
            continue;
        };
        return NaiveDate::from_ymd_opt(year, month + 1, day)
            .ok_or_else(|| SalahError::parse(format!("no such date {:?}", text.trim())));
    }
    Err(SalahError::parse(format!("unrecognized display date {:?}", text.trim())))
}

/// Parses a `Month YYYY` heading into (year, 1-based month).
pub fn parse_display_month(text: &str) -> Result<(i32, u32), SalahError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let [month, year] = parts.as_slice() else {
        return Err(SalahError::parse(format!("unrecognized month heading {:?}", text.trim())));
    };
    let month = resolve_month_index(month)
        .ok_or_else(|| SalahError::parse(format!("unknown month {:?}", month)))?;
    let year = year
        .parse::<i32>()
        .map_err(|_| SalahError::parse(format!("unknown year {:?}", year)))?;
    Ok((year, month + 1))
}

/// First run of digits in a cell, e.g. `"Sun 03"` -> 3.
pub fn parse_day_number(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Moves a published day onto `date`, keeping every clock time.
pub fn shift_onto(day: &SalahTimes, date: NaiveDate) -> SalahTimes {
    day.shifted((date - day.date()).num_days())
}
