use chrono::{Duration, NaiveDateTime};
use salah_types::{Salah, SalahError, SalahName};
use serde::{Deserialize, Serialize};

/// Minutes between adhaan and iqamah, used when a source publishes no
/// iqamah time. Each source carries its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IqamahOffsets {
    pub fajr: u32,
    pub dhuhr: u32,
    pub asr: u32,
    pub maghrib: u32,
    pub ishaa: u32,
}

impl IqamahOffsets {
    pub const fn new(fajr: u32, dhuhr: u32, asr: u32, maghrib: u32, ishaa: u32) -> Self {
        Self { fajr, dhuhr, asr, maghrib, ishaa }
    }

    /// Iqamah coincides with adhaan for every prayer.
    pub const fn simultaneous() -> Self {
        Self::new(0, 0, 0, 0, 0)
    }

    pub fn minutes(&self, name: SalahName) -> u32 {
        match name {
            SalahName::Fajr => self.fajr,
            SalahName::Dhuhr => self.dhuhr,
            SalahName::Asr => self.asr,
            SalahName::Maghrib => self.maghrib,
            SalahName::Ishaa => self.ishaa,
        }
    }
}

pub fn fallback_iqamah(
    name: SalahName,
    adhaan: NaiveDateTime,
    offsets: &IqamahOffsets,
) -> NaiveDateTime {
    adhaan + Duration::minutes(i64::from(offsets.minutes(name)))
}

/// Builds a `Salah`, filling a missing iqamah from `offsets`.
pub fn resolve_salah(
    name: SalahName,
    adhaan: NaiveDateTime,
    iqamah: Option<NaiveDateTime>,
    offsets: &IqamahOffsets,
) -> Result<Salah, SalahError> {
    let iqamah = iqamah.unwrap_or_else(|| fallback_iqamah(name, adhaan, offsets));
    Salah::new(name, adhaan, iqamah)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 3).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_fallback_adds_offset() {
        let offsets = IqamahOffsets::new(25, 15, 20, 5, 20);
        assert_eq!(fallback_iqamah(SalahName::Fajr, at(5, 0), &offsets), at(5, 25));
        assert_eq!(fallback_iqamah(SalahName::Maghrib, at(18, 45), &offsets), at(18, 50));
    }

    #[test]
    fn test_simultaneous_keeps_adhaan() {
        let offsets = IqamahOffsets::simultaneous();
        assert_eq!(fallback_iqamah(SalahName::Dhuhr, at(12, 20), &offsets), at(12, 20));
    }

    #[test]
    fn test_explicit_iqamah_wins() {
        let offsets = IqamahOffsets::new(25, 15, 20, 5, 20);
        let salah = resolve_salah(SalahName::Asr, at(15, 40), Some(at(16, 0)), &offsets).unwrap();
        assert_eq!(salah.iqamah_time(), at(16, 0));
    }

    #[test]
    fn test_explicit_iqamah_before_adhaan_rejected() {
        let offsets = IqamahOffsets::simultaneous();
        assert!(resolve_salah(SalahName::Asr, at(15, 40), Some(at(15, 0)), &offsets).is_err());
    }
}
