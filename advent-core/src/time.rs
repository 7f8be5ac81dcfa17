//! Date utilities: guild-local "today" and inclusive event windows.

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

/// Default window length in days, start day included.
pub const DEFAULT_WINDOW_DAYS: u32 = 14;

/// Parse an ISO calendar date ("2026-10-18").
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

/// Resolve an IANA timezone name like "Asia/Seoul".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// The calendar date of `now` as seen in `tz`.
pub fn today_in(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// End date of a default window starting at `start`.
pub fn default_end(start: NaiveDate) -> NaiveDate {
    start + Duration::days(i64::from(DEFAULT_WINDOW_DAYS) - 1)
}

/// Number of days in `[start, end]`. Zero or negative when `end < start`.
pub fn window_len(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Every date in `[start, end]`, in order.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_window_is_fourteen_days() {
        let start = date(2026, 10, 18);
        let end = default_end(start);
        assert_eq!(end, date(2026, 10, 31));
        assert_eq!(window_len(start, end), 14);
        assert_eq!(days_between(start, end).count(), 14);
    }

    #[test]
    fn test_today_in_seoul_crosses_midnight() {
        // 16:30 UTC is 01:30 the next day in KST (UTC+9).
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 16, 30, 0).unwrap();
        let tz = parse_timezone("Asia/Seoul").unwrap();
        assert_eq!(today_in(tz, now), date(2026, 10, 19));
        assert_eq!(now.date_naive(), date(2026, 10, 18));
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date(" 2026-02-28 ").unwrap(), date(2026, 2, 28));
        assert!(parse_iso_date("02/28/2026").is_err());
        assert!(parse_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn test_reversed_window_is_empty() {
        let start = date(2026, 10, 18);
        let end = date(2026, 10, 17);
        assert_eq!(window_len(start, end), 0);
        assert_eq!(days_between(start, end).count(), 0);
    }
}
