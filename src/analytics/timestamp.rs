//! Lenient parsing for the free-form timestamps stored on runs.
//!
//! Values carrying an explicit offset keep it; values without one are taken
//! as UTC. Anything unrecognised yields `None` so callers can skip the record.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse an ISO-8601-like timestamp.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed);
    }

    if let Some(parsed) = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(value, format).ok())
    {
        return Some(parsed);
    }

    // A bare `Z` suffix outside strict RFC 3339 (e.g. a space separator).
    let naive = value.strip_suffix(['Z', 'z']).unwrap_or(value);

    if let Some(parsed) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
    {
        return Some(parsed.and_utc().fixed_offset());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(naive, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().fixed_offset())
}

/// Parse and re-render a timestamp in canonical RFC 3339 form.
pub fn canonicalize(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|parsed| parsed.to_rfc3339())
}

/// Calendar date of a timestamp, in the offset it was written with.
pub fn calendar_date(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|parsed| parsed.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_iso_variants() {
        let inputs = [
            "2024-01-01T10:30:00",
            "2024-01-01 10:30:00",
            "2024-01-01T10:30:00.250",
            "2024-01-01T10:30",
            "2024-01-01T10:30:00Z",
            "2024-01-01 10:30:00Z",
            "2024-01-01T10:30:00+00:00",
            "2024/01/01 10:30:00",
            "01/01/2024 10:30:00",
        ];

        for input in inputs {
            let parsed = parse_timestamp(input).unwrap_or_else(|| panic!("failed on {input}"));
            assert_eq!(parsed.year(), 2024, "{input}");
            assert_eq!(parsed.hour(), 10, "{input}");
            assert_eq!(parsed.minute(), 30, "{input}");
        }
    }

    #[test]
    fn keeps_explicit_offsets() {
        let parsed = parse_timestamp("2024-03-05T23:30:00-05:00").unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(calendar_date("2024-03-05T23:30:00-05:00").unwrap().day(), 5);
    }

    #[test]
    fn date_only_is_midnight_utc() {
        let parsed = parse_timestamp("2024-02-29").unwrap();
        assert_eq!(parsed.hour(), 0);
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-45T00:00:00").is_none());
    }

    #[test]
    fn canonical_form_is_rfc3339() {
        assert_eq!(
            canonicalize("2024-01-01 00:01:00").as_deref(),
            Some("2024-01-01T00:01:00+00:00")
        );
        assert_eq!(canonicalize("not a time"), None);
    }
}
