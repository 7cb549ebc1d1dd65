// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and calendar weeks.

use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Monday of the calendar week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// Sunday of the calendar week containing `day`.
pub fn week_end(day: NaiveDate) -> NaiveDate {
    week_start(day) + Duration::days(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uses_z_suffix() {
        let date = DateTime::from_timestamp(1_724_223_600, 0).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2024-08-21T07:00:00Z");
    }

    #[test]
    fn test_calendar_week_bounds() {
        // 2024-08-21 is a Wednesday
        let wednesday = NaiveDate::from_ymd_opt(2024, 8, 21).unwrap();
        assert_eq!(week_start(wednesday), NaiveDate::from_ymd_opt(2024, 8, 19).unwrap());
        assert_eq!(week_end(wednesday), NaiveDate::from_ymd_opt(2024, 8, 25).unwrap());

        let monday = NaiveDate::from_ymd_opt(2024, 8, 19).unwrap();
        assert_eq!(week_start(monday), monday);
        let sunday = NaiveDate::from_ymd_opt(2024, 8, 25).unwrap();
        assert_eq!(week_end(sunday), sunday);
    }
}
