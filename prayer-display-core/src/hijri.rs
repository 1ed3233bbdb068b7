//! Tabular Islamic (Hijri) calendar conversion.
//!
//! Uses the arithmetic civil calendar: 30-year cycles with 11 leap years,
//! epoch 16 July 622 (Julian). Dates may differ by a day from calendars that
//! depend on moon sighting.

use chrono::{Datelike, NaiveDate};

/// Offset between chrono's day count from 0001-01-01 and the Julian Day Number.
const JDN_OFFSET: i64 = 1_721_425;

/// Indonesian names of the Hijri months, Muharram first.
pub const HIJRI_MONTHS: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabiulawal",
    "Rabiulakhir",
    "Jumadilawal",
    "Jumadilakhir",
    "Rajab",
    "Syakban",
    "Ramadan",
    "Syawal",
    "Zulkaidah",
    "Zulhijah",
];

/// A date in the Hijri calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HijriDate {
    pub year: i64,
    /// 1-based month
    pub month: u32,
    /// 1-based day of month
    pub day: u32,
}

impl HijriDate {
    /// Convert a Gregorian civil date.
    #[must_use]
    pub fn from_gregorian(date: NaiveDate) -> Self {
        let jdn = i64::from(date.num_days_from_ce()) + JDN_OFFSET;

        let l = jdn - 1_948_440 + 10_632;
        let n = (l - 1) / 10_631;
        let l = l - 10_631 * n + 354;
        let j = ((10_985 - l) / 5_316) * ((50 * l) / 17_719) + (l / 5_670) * ((43 * l) / 15_238);
        let l = l - ((30 - j) / 15) * ((17_719 * j) / 50) - (j / 16) * ((15_238 * j) / 43) + 29;
        let month = (24 * l) / 709;
        let day = l - (709 * month) / 24;
        let year = 30 * n + j - 30;

        Self {
            year,
            month: u32::try_from(month).unwrap_or(1),
            day: u32::try_from(day).unwrap_or(1),
        }
    }

    /// Indonesian month name.
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        let index = usize::try_from(self.month.saturating_sub(1)).unwrap_or(0);
        HIJRI_MONTHS.get(index).copied().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hijri(y: i32, m: u32, d: u32) -> HijriDate {
        HijriDate::from_gregorian(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_new_year_1445() {
        assert_eq!(
            hijri(2023, 7, 19),
            HijriDate {
                year: 1445,
                month: 1,
                day: 1
            }
        );
    }

    #[test]
    fn test_start_of_ramadan() {
        assert_eq!(
            hijri(2023, 3, 23),
            HijriDate {
                year: 1444,
                month: 9,
                day: 1
            }
        );
        assert_eq!(
            hijri(2024, 3, 11),
            HijriDate {
                year: 1445,
                month: 9,
                day: 1
            }
        );
    }

    #[test]
    fn test_month_boundary() {
        let last = hijri(2025, 6, 26);
        assert_eq!((last.year, last.month, last.day), (1446, 12, 29));

        let first = hijri(2025, 6, 27);
        assert_eq!((first.year, first.month, first.day), (1447, 1, 1));
    }

    #[test]
    fn test_month_name() {
        assert_eq!(hijri(2024, 3, 11).month_name(), "Ramadan");
        assert_eq!(hijri(2026, 10, 15).month_name(), "Jumadilawal");
    }
}
