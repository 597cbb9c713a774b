//! Schedule normalization shared by all prayer-table sources.

pub mod iqamah;
pub mod normalize;

pub use iqamah::{fallback_iqamah, resolve_salah, IqamahOffsets};
pub use normalize::{
    is_friday, is_sunrise_label, iso_date_key, parse_clock_12h, parse_clock_24h, parse_day_number,
    parse_display_date, parse_display_month, resolve_month_index, resolve_salah_label, shift_onto,
    to_24_hour, Meridiem, MONTH_NAMES,
};
