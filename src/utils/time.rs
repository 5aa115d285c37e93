//! Serde helpers that write `OffsetDateTime` values as RFC 3339 strings.
//!
//! Rows read from the store carry `OffsetDateTime` timestamps; the JSON
//! envelope exposes them in the same format the frontend already parses.

use serde::{self, Deserialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Serializes an `OffsetDateTime` as an RFC 3339 string.
///
/// # Example
///
/// ```
/// #[derive(Serialize)]
/// struct Row {
///     #[serde(serialize_with = "serialize_offset_date_time")]
///     created_at: OffsetDateTime,
/// }
/// ```
pub fn serialize_offset_date_time<S>(
    date_time: &OffsetDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&date_time.format(&Rfc3339).map_err(serde::ser::Error::custom)?)
}

/// Deserializes an RFC 3339 string into an `OffsetDateTime`.
pub fn deserialize_offset_date_time<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    OffsetDateTime::parse(&s, &Rfc3339).map_err(serde::de::Error::custom)
}

/// Formats a timestamp for binding into a `TIMESTAMPTZ` cast.
pub fn to_rfc3339(date_time: OffsetDateTime) -> String {
    date_time
        .format(&Rfc3339)
        .unwrap_or_else(|_| date_time.to_string())
}
