//! BCMA Kelowna: a single table for the current day.
//!
//! The page only ever publishes today's times, so neighbouring days are
//! synthesized by moving the published day onto each requested date with
//! clock times unchanged. That is an approximation: the real published
//! times drift by a minute or two per day.

use chrono::NaiveDate;
use salah_calendar::{
    is_friday, is_sunrise_label, iso_date_key, parse_clock_12h, parse_display_date, resolve_salah,
    resolve_salah_label, shift_onto, IqamahOffsets,
};
use salah_types::{Salah, SalahError, SalahName, SalahTimes};
use scraper::Html;

use super::{cell_text, selector};
use crate::config::SourceConfig;
use crate::http;
use crate::location::Location;
use crate::source::{DaySchedules, SalahSource};

/// Rows without an iqamah time pray at the adhaan.
pub const KELOWNA_IQAMAH_OFFSETS: IqamahOffsets = IqamahOffsets::simultaneous();

#[derive(Debug, Clone)]
pub struct KelownaSource {
    client: reqwest::Client,
    url: String,
    offsets: IqamahOffsets,
}

impl KelownaSource {
    pub fn new(config: &SourceConfig) -> Result<Self, SalahError> {
        Ok(Self {
            client: http::build_client(config)?,
            url: config.kelowna_url.clone(),
            offsets: KELOWNA_IQAMAH_OFFSETS,
        })
    }

    pub fn with_offsets(mut self, offsets: IqamahOffsets) -> Self {
        self.offsets = offsets;
        self
    }

    async fn fetch_published(&self) -> Result<SalahTimes, SalahError> {
        let html = http::fetch_text(&self.client, &self.url).await?;
        let day = parse_kelowna_html(&html, &self.offsets)?;
        tracing::debug!(date = %day.date(), "parsed Kelowna table");
        Ok(day)
    }
}

impl SalahSource for KelownaSource {
    fn location(&self) -> Location {
        Location::Kelowna
    }

    async fn fetch_day(&self, date: Option<NaiveDate>) -> Result<SalahTimes, SalahError> {
        let published = self.fetch_published().await?;
        Ok(match date {
            Some(date) => shift_onto(&published, date),
            None => published,
        })
    }

    async fn fetch_range(&self, dates: &[NaiveDate]) -> Result<DaySchedules, SalahError> {
        let published = self.fetch_published().await?;
        if !dates.contains(&published.date()) {
            tracing::debug!(
                published = %published.date(),
                "published Kelowna day is outside the requested range; shifting it anyway"
            );
        }
        Ok(dates
            .iter()
            .map(|date| (iso_date_key(date), shift_onto(&published, *date)))
            .collect())
    }
}

/// Parses the BCMA table: a date heading and `(label, adhaan, iqamah)` rows.
///
/// Rows with another cell count and unknown labels are skipped; an empty
/// or unreadable iqamah cell falls back to `offsets`. Any missing prayer,
/// missing sunrise or unreadable adhaan fails the whole table.
pub fn parse_kelowna_html(html: &str, offsets: &IqamahOffsets) -> Result<SalahTimes, SalahError> {
    let document = Html::parse_document(html);
    let table_sel = selector("table.table")?;
    let header_sel = selector("thead th")?;
    let row_sel = selector("tbody tr")?;
    let cell_sel = selector("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| SalahError::parse("no prayer table on the page"))?;
    let heading = table
        .select(&header_sel)
        .next()
        .map(cell_text)
        .ok_or_else(|| SalahError::parse("prayer table has no date heading"))?;
    let date = parse_display_date(&heading)?;
    let friday = is_friday(date);

    let mut sunrise = None;
    let mut found: [Option<Salah>; 5] = [None; 5];

    for row in table.select(&row_sel) {
        let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
        let [label, adhaan, iqamah] = cells.as_slice() else {
            continue;
        };

        if is_sunrise_label(label) {
            sunrise = Some(parse_clock_12h(adhaan, date)?);
            continue;
        }
        let Some(name) = resolve_salah_label(label, friday) else {
            tracing::trace!(label = label.as_str(), "skipping row");
            continue;
        };

        let adhaan = parse_clock_12h(adhaan, date)?;
        let iqamah = if iqamah.is_empty() {
            None
        } else {
            match parse_clock_12h(iqamah, date) {
                Ok(time) => Some(time),
                Err(err) => {
                    tracing::debug!(%name, error = %err, "unreadable iqamah cell, using fallback");
                    None
                }
            }
        };
        found[name as usize] = Some(resolve_salah(name, adhaan, iqamah, offsets)?);
    }

    let [fajr, dhuhr, asr, maghrib, ishaa] = found;
    let require = |salah: Option<Salah>, name: SalahName| {
        salah.ok_or_else(|| SalahError::parse(format!("no {} row for {}", name, date)))
    };
    SalahTimes::new(
        require(fajr, SalahName::Fajr)?,
        sunrise.ok_or_else(|| SalahError::parse(format!("no Sunrise row for {}", date)))?,
        require(dhuhr, SalahName::Dhuhr)?,
        require(asr, SalahName::Asr)?,
        require(maghrib, SalahName::Maghrib)?,
        require(ishaa, SalahName::Ishaa)?,
    )
}
