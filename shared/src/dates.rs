//! Flexible date handling
//!
//! Stored documents carry dates in whatever representation the writer used:
//! RFC 3339 strings, calendar-day strings, or integer epoch milliseconds.
//! This module coerces all of them into `DateTime<Utc>` on input and renders
//! day-level (`YYYY-MM-DD`) strings on output, so a round-tripped calendar
//! date always formats back to the same day regardless of stored form.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

/// Parse a date from any accepted string form.
pub fn parse_str(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0)?));
    }
    // Timezone-less timestamps are taken as UTC.
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    None
}

/// Parse a date from a JSON value: a string form or epoch milliseconds.
pub fn parse_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_str(s),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        _ => None,
    }
}

/// Render a stored JSON value as a `YYYY-MM-DD` day string.
///
/// Returns `None` for absent, null, or unparseable values; the wire contract
/// serializes that as `null`.
pub fn format_day(value: Option<&Value>) -> Option<String> {
    let parsed = parse_value(value?)?;
    Some(parsed.format("%Y-%m-%d").to_string())
}

/// Render a `DateTime<Utc>` in the canonical stored form.
pub fn to_stored(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Serde adapter for optional date fields that coerces all accepted input
/// forms and serializes back as RFC 3339.
pub mod flexible {
    use super::*;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        match raw {
            None | Some(Value::Null) => Ok(None),
            Some(value) => parse_value(&value).map(Some).ok_or_else(|| {
                D::Error::custom("expected a date (RFC 3339, YYYY-MM-DD, or epoch milliseconds)")
            }),
        }
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_some(&to_stored(dt)),
            None => serializer.serialize_none(),
        }
    }
}
