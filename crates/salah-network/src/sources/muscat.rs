//! MuslimPro Muscat: one monthly table per request.
//!
//! The table only carries adhaan times in 24-hour form; iqamah comes from
//! the fixed Muscat offsets.

use chrono::{Datelike, NaiveDate};
use salah_calendar::{
    iso_date_key, parse_clock_24h, parse_day_number, parse_display_month, resolve_salah,
    IqamahOffsets,
};
use salah_types::{Salah, SalahError, SalahName, SalahTimes};
use scraper::Html;
use std::collections::HashMap;

use super::{cell_text, selector};
use crate::config::SourceConfig;
use crate::http;
use crate::location::Location;
use crate::source::{DaySchedules, SalahSource};

/// Fajr +25, Dhuhr +15, Asr +20, Maghrib +5, Ishaa +20 minutes.
pub const MUSCAT_IQAMAH_OFFSETS: IqamahOffsets = IqamahOffsets::new(25, 15, 20, 5, 20);

#[derive(Debug, Clone)]
pub struct MuscatSource {
    client: reqwest::Client,
    url: String,
    offsets: IqamahOffsets,
}

impl MuscatSource {
    pub fn new(config: &SourceConfig) -> Result<Self, SalahError> {
        Ok(Self {
            client: http::build_client(config)?,
            url: config.muscat_url.clone(),
            offsets: MUSCAT_IQAMAH_OFFSETS,
        })
    }

    pub fn with_offsets(mut self, offsets: IqamahOffsets) -> Self {
        self.offsets = offsets;
        self
    }

    pub fn month_url(&self, year: i32, month: u32) -> String {
        format!("{}?date={}-{}", self.url, year, month)
    }

    async fn fetch_month(&self, year: i32, month: u32) -> Result<DaySchedules, SalahError> {
        let html = http::fetch_text(&self.client, &self.month_url(year, month)).await?;
        let table = parse_muscat_html(&html, &self.offsets)?;
        tracing::debug!(year, month, days = table.len(), "parsed Muscat month table");
        Ok(table)
    }
}

impl SalahSource for MuscatSource {
    fn location(&self) -> Location {
        Location::Muscat
    }

    async fn fetch_day(&self, date: Option<NaiveDate>) -> Result<SalahTimes, SalahError> {
        let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
        let key = iso_date_key(&date);
        let mut days = self.fetch_range(&[date]).await?;
        days.remove(&key)
            .ok_or_else(|| SalahError::parse(format!("Muscat table has no row for {}", key)))
    }

    /// Fetches each distinct (year, month) once, then slices out the dates.
    async fn fetch_range(&self, dates: &[NaiveDate]) -> Result<DaySchedules, SalahError> {
        let mut months: HashMap<(i32, u32), DaySchedules> = HashMap::new();
        let mut result = DaySchedules::new();

        for date in dates {
            let month_key = (date.year(), date.month());
            if !months.contains_key(&month_key) {
                let table = self.fetch_month(month_key.0, month_key.1).await?;
                months.insert(month_key, table);
            }

            let key = iso_date_key(date);
            let day = months
                .get(&month_key)
                .and_then(|table| table.get(&key))
                .cloned()
                .ok_or_else(|| SalahError::parse(format!("Muscat table has no row for {}", key)))?;
            result.insert(key, day);
        }

        Ok(result)
    }
}

/// Parses a month page: a `Month YYYY` heading and seven-cell rows of
/// (day, fajr, sunrise, dhuhr, asr, maghrib, ishaa).
///
/// A single unreadable row fails the whole month.
pub fn parse_muscat_html(html: &str, offsets: &IqamahOffsets) -> Result<DaySchedules, SalahError> {
    let document = Html::parse_document(html);
    let month_sel = selector(".display-month")?;
    let row_sel = selector("table.prayer-times > tbody > tr")?;
    let cell_sel = selector("td")?;

    let heading = document
        .select(&month_sel)
        .next()
        .map(cell_text)
        .ok_or_else(|| SalahError::parse("page has no month heading"))?;
    let (year, month) = parse_display_month(&heading)?;

    let mut table = DaySchedules::new();
    for row in document.select(&row_sel) {
        let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
        let [day, fajr, sunrise, dhuhr, asr, maghrib, ishaa] = cells.as_slice() else {
            continue;
        };

        let date = parse_day_number(day)
            .and_then(|d| NaiveDate::from_ymd_opt(year, month, d))
            .ok_or_else(|| {
                SalahError::parse(format!("unreadable day cell {:?} in {}", day, heading))
            })?;
        let salah = |name: SalahName, text: &str| -> Result<Salah, SalahError> {
            resolve_salah(name, parse_clock_24h(text, date)?, None, offsets)
        };

        let times = SalahTimes::new(
            salah(SalahName::Fajr, fajr.as_str())?,
            parse_clock_24h(sunrise, date)?,
            salah(SalahName::Dhuhr, dhuhr.as_str())?,
            salah(SalahName::Asr, asr.as_str())?,
            salah(SalahName::Maghrib, maghrib.as_str())?,
            salah(SalahName::Ishaa, ishaa.as_str())?,
        )?;
        table.insert(iso_date_key(&date), times);
    }

    if table.is_empty() {
        return Err(SalahError::parse(format!("no prayer rows for {}", heading)));
    }
    Ok(table)
}
