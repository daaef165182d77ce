//! Date range query parameters. Clients send either full RFC 3339 timestamps
//! or plain `YYYY-MM-DD` dates; a plain end date covers that whole day.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

pub fn parse_bound(field: &str, raw: &str, bound: Bound) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!(
            "{field} must be a date (YYYY-MM-DD) or RFC 3339 timestamp"
        ))
    })?;
    let start = date.and_time(NaiveTime::MIN).and_utc();
    Ok(match bound {
        Bound::Start => start,
        Bound::End => start + Duration::days(1) - Duration::microseconds(1),
    })
}

/// Parses an optional bound, treating blank values as absent.
pub fn optional_bound(
    field: &str,
    raw: Option<&str>,
    bound: Bound,
) -> Result<Option<DateTime<Utc>>, AppError> {
    raw.map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| parse_bound(field, r, bound))
        .transpose()
}

/// Minutes between two instants, rounded to the nearest whole minute and never negative.
pub fn rounded_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> i32 {
    const MS_PER_MINUTE: f64 = 60_000.0;
    ((to - from).num_milliseconds().max(0) as f64 / MS_PER_MINUTE).round() as i32
}

/// Days between two instants, rounded to the nearest whole day.
pub fn rounded_days(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    const MS_PER_DAY: f64 = 86_400_000.0;
    ((to - from).num_milliseconds() as f64 / MS_PER_DAY).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_plain_dates_cover_whole_days() {
        let start = parse_bound("startDate", "2024-03-01", Bound::Start).unwrap();
        let end = parse_bound("endDate", "2024-03-01", Bound::End).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert!(end > Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap());
        assert!(end < Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_timestamps_are_taken_verbatim() {
        let ts = parse_bound("endDate", "2024-03-01T10:30:00+02:00", Bound::End).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_invalid_and_blank_values() {
        assert!(parse_bound("startDate", "yesterday", Bound::Start).is_err());
        assert_eq!(optional_bound("startDate", Some("  "), Bound::Start).unwrap(), None);
        assert_eq!(optional_bound("startDate", None, Bound::Start).unwrap(), None);
    }

    #[test]
    fn test_rounded_minutes_and_days() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        assert_eq!(rounded_minutes(t0, t0 + Duration::seconds(150)), 3);
        assert_eq!(rounded_minutes(t0, t0 + Duration::seconds(89)), 1);
        assert_eq!(rounded_minutes(t0 + Duration::minutes(5), t0), 0);
        assert_eq!(rounded_days(t0, t0 + Duration::hours(36)), 2);
        assert_eq!(rounded_days(t0, t0 + Duration::hours(35)), 1);
    }
}
