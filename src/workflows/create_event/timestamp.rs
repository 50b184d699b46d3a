use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Every schedule comparison happens on UTC instants.
pub type Timestamp = DateTime<Utc>;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{raw}' is not a valid timestamp (expected RFC 3339, YYYY-MM-DDTHH:MM[:SS] or YYYY-MM-DD)")]
pub struct TimestampError {
    pub raw: String,
}

/// Parses a timestamp and normalizes it to UTC.
///
/// Offsets are honoured; naive date-times and bare dates are read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<Timestamp, TimestampError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimestampError {
            raw: raw.to_string(),
        })
}

/// Blank input clears a field.
pub fn parse_optional_timestamp(raw: Option<&str>) -> Result<Option<Timestamp>, TimestampError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value).map(Some),
    }
}

pub fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    parse_optional_timestamp(opt.as_deref()).map_err(serde::de::Error::custom)
}
