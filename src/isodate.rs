//! Timestamp helpers. All review/bot `dateCreated` fields are ISO-8601 UTC.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};

/// Render `dt` as an ISO-8601 UTC string, e.g. `2026-07-28T10:15:00Z`.
pub fn to_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// The current time as an ISO-8601 UTC string, for `dateCreated` fields
/// stamped at review time.
pub fn now_utc_timestamp() -> String {
    to_iso(Utc::now())
}

/// Midnight UTC of the Monday of `dt`'s week, as an ISO-8601 string. Used to
/// rotate a bot's reported `softwareVersion` weekly without redeploying —
/// the bot itself hasn't changed, but its dependency (an external scoring
/// service) may have been silently updated.
pub fn start_of_week_utc(dt: DateTime<Utc>) -> DateTime<Utc> {
    let days_since_monday = dt.weekday().num_days_from_monday() as i64;
    let midnight = dt.date_naive().and_time(NaiveTime::MIN);
    DateTime::<Utc>::from_naive_utc_and_offset(midnight, Utc) - Duration::days(days_since_monday)
}

/// [`start_of_week_utc`] of the current time, rendered as ISO-8601.
pub fn start_of_week_utc_timestamp() -> String {
    to_iso(start_of_week_utc(Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_to_iso_format() {
        let dt = Utc.with_ymd_and_hms(2026, 7, 28, 10, 15, 0).unwrap();
        assert_eq!(to_iso(dt), "2026-07-28T10:15:00Z");
    }

    #[test]
    fn test_start_of_week_utc_is_monday_midnight() {
        // 2026-07-28 is a Tuesday.
        let dt = Utc.with_ymd_and_hms(2026, 7, 28, 10, 15, 0).unwrap();
        let week_start = start_of_week_utc(dt);
        assert_eq!(week_start.weekday(), chrono::Weekday::Mon);
        assert_eq!(week_start.format("%H:%M:%S").to_string(), "00:00:00");
        assert_eq!(week_start.date_naive().day(), 27);
    }

    #[test]
    fn test_start_of_week_utc_idempotent_on_monday() {
        let monday = Utc.with_ymd_and_hms(2026, 7, 27, 0, 0, 0).unwrap();
        assert_eq!(start_of_week_utc(monday), monday);
    }
}
