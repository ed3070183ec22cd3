// src/timestamps.rs
//
// Stored documents keep instants as ISO-8601 text. The text form always has
// microsecond precision and an explicit +00:00 offset so that sorting the
// strings sorts the instants.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Render an instant the way documents store it.
pub fn to_stored_text(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Try RFC3339, then offset-less ISO8601 (taken as UTC), then plain "YYYY-MM-DD".
/// If nothing fits, returns None instead of blowing up.
pub fn parse_flexible(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive_dt) = d.and_hms_opt(0, 0, 0) {
            return Some(Utc.from_utc_datetime(&naive_dt));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_text_shape() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(to_stored_text(&ts), "2025-03-01T09:30:00.000000+00:00");
    }

    #[test]
    fn test_stored_text_parses_back() {
        let ts = Utc::now();
        let parsed = parse_flexible(&to_stored_text(&ts)).unwrap();
        assert_eq!(parsed.timestamp_micros(), ts.timestamp_micros());
    }

    #[test]
    fn test_stored_text_sorts_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2025, 1, 9, 23, 59, 59).unwrap();
        let later = earlier + chrono::Duration::microseconds(1);
        assert!(to_stored_text(&earlier) < to_stored_text(&later));
    }

    #[test]
    fn test_parse_flexible_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(parse_flexible("2024-05-06T07:08:09Z"), Some(expected));
        assert_eq!(parse_flexible("2024-05-06T09:08:09+02:00"), Some(expected));
        assert_eq!(parse_flexible("2024-05-06T07:08:09"), Some(expected));
        assert_eq!(
            parse_flexible("2024-05-06"),
            Some(Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_flexible("yesterday"), None);
    }
}
