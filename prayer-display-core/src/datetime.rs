//! Localized (Indonesian) date and time strings for the display.
//!
//! Every formatter takes an optional timestamp and returns an empty string
//! when it is `None`, so callers can pass the result of a fallible conversion
//! straight through.

use crate::hijri::HijriDate;
use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Weekday};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Indonesian names of the Gregorian months, January first.
pub const GREGORIAN_MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Convert an epoch-millisecond timestamp into local time.
#[must_use]
pub fn local_from_millis(ms: i64) -> Option<DateTime<Local>> {
    DateTime::from_timestamp_millis(ms).map(|utc| utc.with_timezone(&Local))
}

/// Time of day as `HH:MM:SS`, or `HH:MM` rounded to the nearest minute.
///
/// Without seconds, 30 seconds and above round up; the rounding carries into
/// the hour and wraps past midnight.
#[must_use]
pub fn iso_time_string<Tz: TimeZone>(time: Option<&DateTime<Tz>>, show_seconds: bool) -> String {
    let Some(time) = time else {
        return String::new();
    };

    if show_seconds {
        return format!(
            "{:02}:{:02}:{:02}",
            time.hour(),
            time.minute(),
            time.second()
        );
    }

    let rounded = ((time.num_seconds_from_midnight() + 30) / 60) % MINUTES_PER_DAY;
    format!("{:02}:{:02}", rounded / 60, rounded % 60)
}

/// Calendar date as `YYYY-MM-DD`.
#[must_use]
pub fn iso_date_string<Tz: TimeZone>(time: Option<&DateTime<Tz>>) -> String {
    time.map_or_else(String::new, |t| {
        format!("{}-{:02}-{:02}", t.year(), t.month(), t.day())
    })
}

/// Indonesian weekday name.
#[must_use]
pub const fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Minggu",
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jum'at",
        Weekday::Sat => "Sabtu",
    }
}

/// Gregorian date such as `05 Oktober 2026`.
#[must_use]
pub fn full_date<Tz: TimeZone>(time: Option<&DateTime<Tz>>) -> String {
    time.map_or_else(String::new, |t| {
        let month = GREGORIAN_MONTHS
            .get(usize::try_from(t.month0()).unwrap_or(0))
            .copied()
            .unwrap_or("");
        format!("{:02} {} {}", t.day(), month, t.year())
    })
}

/// Hijri date of the local civil day, such as `03 Jumadilawal 1448`.
#[must_use]
pub fn hijri_date<Tz: TimeZone>(time: Option<&DateTime<Tz>>) -> String {
    time.map_or_else(String::new, |t| {
        let hijri = HijriDate::from_gregorian(t.date_naive());
        format!("{:02} {} {}", hijri.day, hijri.month_name(), hijri.year)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    /// Western Indonesia Time (UTC+7)
    fn wib(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_time_with_seconds() {
        let t = wib(2026, 10, 15, 4, 5, 9);
        assert_eq!(iso_time_string(Some(&t), true), "04:05:09");
    }

    #[test]
    fn test_time_rounds_down_below_thirty_seconds() {
        let t = wib(2026, 10, 15, 4, 5, 29);
        assert_eq!(iso_time_string(Some(&t), false), "04:05");
    }

    #[test]
    fn test_time_rounds_up_from_thirty_seconds() {
        for s in [30, 45, 59] {
            let t = wib(2026, 10, 15, 4, 5, s);
            assert_eq!(iso_time_string(Some(&t), false), "04:06", "second {s}");
        }
    }

    #[test]
    fn test_time_rounding_carries_into_hour() {
        let t = wib(2026, 10, 15, 11, 59, 45);
        assert_eq!(iso_time_string(Some(&t), false), "12:00");

        let t = wib(2026, 10, 15, 23, 59, 30);
        assert_eq!(iso_time_string(Some(&t), false), "00:00");
    }

    #[test]
    fn test_invalid_input_gives_empty_strings() {
        let none: Option<&DateTime<FixedOffset>> = None;
        assert_eq!(iso_time_string(none, true), "");
        assert_eq!(iso_time_string(none, false), "");
        assert_eq!(iso_date_string(none), "");
        assert_eq!(full_date(none), "");
        assert_eq!(hijri_date(none), "");
        assert!(local_from_millis(i64::MAX).is_none());
    }

    #[test]
    fn test_iso_date() {
        let t = wib(2026, 3, 7, 0, 0, 0);
        assert_eq!(iso_date_string(Some(&t)), "2026-03-07");
    }

    #[test]
    fn test_day_names() {
        assert_eq!(day_name(Weekday::Sun), "Minggu");
        assert_eq!(day_name(Weekday::Fri), "Jum'at");
        assert_eq!(day_name(wib(2026, 10, 15, 12, 0, 0).weekday()), "Kamis");
    }

    #[test]
    fn test_full_date() {
        let t = wib(2026, 10, 5, 12, 0, 0);
        assert_eq!(full_date(Some(&t)), "05 Oktober 2026");
    }

    #[test]
    fn test_hijri_date_uses_local_day() {
        // 2024-03-10 23:30 in UTC+7 is still the 10th locally, the last day of Syakban
        let t = wib(2024, 3, 10, 23, 30, 0);
        assert_eq!(hijri_date(Some(&t)), "29 Syakban 1445");

        let t = wib(2024, 3, 11, 0, 30, 0);
        assert_eq!(hijri_date(Some(&t)), "01 Ramadan 1445");
    }
}
