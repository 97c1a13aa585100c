//! Lenient provider timestamp parsing
//!
//! Providers send zone-less ISO-8601 date-times, but some attach an offset
//! (`Z`, `+03:00`). Offset values are shifted to UTC and the offset dropped.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Parse a provider timestamp with or without an offset
pub(crate) fn parse(raw: &str) -> Result<NaiveDateTime, String> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.naive_utc());
    }
    raw.parse::<NaiveDateTime>()
        .map_err(|e| format!("invalid timestamp {:?}: {}", raw, e))
}

/// `deserialize_with` adapter for [`parse`]
pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    #[test]
    fn test_zone_less() {
        assert_eq!(parse("2024-03-01T10:00:00").unwrap(), at(10, 0));
        assert_eq!(
            parse("2024-03-01T10:00:00.250").unwrap(),
            at(10, 0) + chrono::Duration::milliseconds(250)
        );
    }

    #[test]
    fn test_offsets_shift_to_utc() {
        assert_eq!(parse("2024-03-01T10:00:00Z").unwrap(), at(10, 0));
        assert_eq!(parse("2024-03-01T10:00:00+03:00").unwrap(), at(7, 0));
        assert_eq!(parse("2024-03-01T10:00:00-00:30").unwrap(), at(10, 30));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse("yesterday").is_err());
        assert!(parse("2024-03-01").is_err());
    }
}
