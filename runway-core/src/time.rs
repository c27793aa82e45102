//! Time utilities: workbook time zone, reporting windows and sheet dates.

use anyhow::Result;
use chrono::{DateTime, Months, NaiveDate, Utc};
use chrono_tz::Tz;

/// Format used for every date written to the workbook.
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Parse an IANA tz like "America/Chicago".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Calendar date of `now` as seen from `tz`.
pub fn local_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Today's calendar date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    local_date(Utc::now(), tz)
}

/// Trailing twelve-month window ending yesterday: `(start, end)` inclusive.
///
/// `start` is one calendar year before yesterday; Feb 29 clamps to Feb 28.
pub fn trailing_year_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let yesterday = today.pred_opt().unwrap_or(today);
    let start = yesterday
        .checked_sub_months(Months::new(12))
        .unwrap_or(yesterday);
    (start, yesterday)
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

/// Parse a date as it may appear in a workbook cell.
///
/// Accepts ISO dates, `yyyy/MM/dd`, US `MM/dd/yyyy`, and ISO date-times
/// (only the date part is kept).
pub fn parse_sheet_date(value: &str) -> Option<NaiveDate> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in [ISO_DATE, "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    s.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, ISO_DATE).ok())
        .filter(|_| s.as_bytes().get(10) == Some(&b'T') || s.as_bytes().get(10) == Some(&b' '))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        // 03:30 UTC is still the previous evening in Chicago (CDT, UTC-5)
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 3, 30, 0).unwrap();
        let tz = parse_timezone("America/Chicago").unwrap();
        assert_eq!(local_date(now, tz), d(2026, 10, 14));
        assert_eq!(local_date(now, chrono_tz::UTC), d(2026, 10, 15));
    }

    #[test]
    fn test_invalid_timezone() {
        assert!(parse_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn test_trailing_year_window() {
        let (start, end) = trailing_year_window(d(2026, 10, 15));
        assert_eq!(end, d(2026, 10, 14));
        assert_eq!(start, d(2025, 10, 14));
    }

    #[test]
    fn test_trailing_year_window_leap_day() {
        let (start, end) = trailing_year_window(d(2028, 3, 1));
        assert_eq!(end, d(2028, 2, 29));
        assert_eq!(start, d(2027, 2, 28));
    }

    #[test]
    fn test_parse_sheet_date_formats() {
        assert_eq!(parse_sheet_date("2026-02-20"), Some(d(2026, 2, 20)));
        assert_eq!(parse_sheet_date(" 2026/02/20 "), Some(d(2026, 2, 20)));
        assert_eq!(parse_sheet_date("02/20/2026"), Some(d(2026, 2, 20)));
        assert_eq!(parse_sheet_date("2026-02-20T08:00:00+00:00"), Some(d(2026, 2, 20)));
        assert_eq!(parse_sheet_date("2026-02-20 08:00"), Some(d(2026, 2, 20)));
        assert_eq!(parse_sheet_date("yesterday"), None);
        assert_eq!(parse_sheet_date(""), None);
    }
}
