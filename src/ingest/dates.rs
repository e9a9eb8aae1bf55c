//! Lenient calendar-date parsing for billing exports.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y", "%b %d, %Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Parse a date cell, dropping any time-of-day component.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(d) = parse_compact(s) {
        return Some(d);
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// `YYYYMMDD`
fn parse_compact(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = s[0..4].parse().ok()?;
    let month = s[4..6].parse().ok()?;
    let day = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accepts_common_layouts() {
        assert_eq!(parse_date("2025-01-08"), Some(ymd(2025, 1, 8)));
        assert_eq!(parse_date(" 2025/01/08 "), Some(ymd(2025, 1, 8)));
        assert_eq!(parse_date("01/08/2025"), Some(ymd(2025, 1, 8)));
        assert_eq!(parse_date("20250108"), Some(ymd(2025, 1, 8)));
    }

    #[test]
    fn drops_time_component() {
        assert_eq!(parse_date("2025-03-01 23:59:59"), Some(ymd(2025, 3, 1)));
        assert_eq!(parse_date("2025-03-01T08:00"), Some(ymd(2025, 3, 1)));
        assert_eq!(parse_date("2025-03-01T08:00:00+02:00"), Some(ymd(2025, 3, 1)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date("next tuesday"), None);
        assert_eq!(parse_date("20251340"), None);
    }
}
