//! Wire format for date-valued fields.
//!
//! Every timestamp crosses a serialization boundary (durable storage, backup
//! files, sync codes) as an ISO-8601 string and is revived into a typed
//! [`DateTime<Utc>`] on the way back in. Output always uses RFC 3339 with the
//! shortest exact fractional seconds, so a value round-trips unchanged.
//!
//! Accepted inputs, most specific first:
//!
//! | Input                        | Interpretation        |
//! |------------------------------|-----------------------|
//! | `2024-03-16T09:30:00.000Z`   | RFC 3339, any offset  |
//! | `2024-03-20T10:00[:SS[.f]]`  | naive, read as UTC    |
//! | `2024-03-20`                 | midnight UTC          |

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a timestamp in any accepted wire form.
///
/// # Errors
///
/// Returns a description of the rejected input.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = input.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(format!("unrecognized timestamp {trimmed:?}"))
}

/// Formats a timestamp for the wire.
#[must_use]
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Serde adapter for required timestamps.
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serializes a timestamp as an RFC 3339 string.
    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(value))
    }

    /// Revives a timestamp from any accepted wire form.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(de::Error::custom)
    }
}

/// Serde adapter for optional timestamps.
///
/// `null` and blank strings both read as `None`; date inputs left empty
/// were historically stored as `""`.
pub mod optional_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serializes `Some` as an RFC 3339 string and `None` as `null`.
    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(&super::format_timestamp(value)),
            None => serializer.serialize_none(),
        }
    }

    /// Revives an optional timestamp.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => super::parse_timestamp(&raw)
                .map(Some)
                .map_err(de::Error::custom),
            _ => Ok(None),
        }
    }
}
