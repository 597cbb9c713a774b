//! Three-day payload assembly.

use chrono::NaiveDate;
use salah_calendar::iso_date_key;
use salah_network::SalahSource;
use salah_types::{SalahError, SalahTimesPayload};

/// Builds the yesterday/today/tomorrow payload around `today`.
///
/// One `fetch_range` call is made; whichever strategy the source uses
/// (shifting a single published day or slicing a month table) stays inside
/// the source. Any failure, or any missing day, makes the whole payload
/// unavailable.
pub async fn build_payload<S: SalahSource>(
    source: &S,
    today: NaiveDate,
) -> Result<SalahTimesPayload, SalahError> {
    let (Some(yesterday), Some(tomorrow)) = (today.pred_opt(), today.succ_opt()) else {
        return Err(SalahError::unavailable(format!("{} has no neighbouring days", today)));
    };

    let location = source.location();
    let mut days = source
        .fetch_range(&[yesterday, today, tomorrow])
        .await
        .map_err(|err| {
            tracing::warn!(%location, error = %err, "could not fetch salah times");
            SalahError::unavailable(err.to_string())
        })?;

    let mut take = |date: NaiveDate| {
        days.remove(&iso_date_key(&date))
            .filter(|day| day.date() == date)
            .ok_or_else(|| {
                SalahError::unavailable(format!("{} published no schedule for {}", location, date))
            })
    };
    let payload = SalahTimesPayload::new(take(yesterday)?, take(today)?, take(tomorrow)?)
        .map_err(|err| SalahError::unavailable(err.to_string()))?;

    tracing::info!(%location, date = %today, "salah times payload ready");
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_day, StaticSource};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_payload_centered_on_today() {
        let source = StaticSource::new(sample_day(date(2024, 3, 3)));
        let payload = build_payload(&source, date(2024, 3, 10)).await.unwrap();

        assert_eq!(payload.yesterday().date(), date(2024, 3, 9));
        assert_eq!(payload.today().date(), date(2024, 3, 10));
        assert_eq!(payload.tomorrow().date(), date(2024, 3, 11));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_source_failure_is_unavailable() {
        let source = StaticSource::new(sample_day(date(2024, 3, 3))).failing_first(1);
        let result = build_payload(&source, date(2024, 3, 3)).await;
        assert!(matches!(result, Err(SalahError::PayloadUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_missing_day_is_unavailable() {
        let source = StaticSource::new(sample_day(date(2024, 3, 3))).without(date(2024, 3, 4));
        let err = build_payload(&source, date(2024, 3, 3)).await.unwrap_err();
        assert!(err.to_string().contains("2024-03-04"));
    }
}
