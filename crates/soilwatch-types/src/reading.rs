//! The sensor reading data model.
//!
//! The upstream feed is a JSON array of loosely-shaped objects. Nothing in
//! the feed is validated at the source, so every field here deserializes
//! leniently: a missing or non-numeric value becomes `None` and the rest of
//! the reading survives. Consumers render absent values as `"N/A"` and
//! classify absent ZTotal as [`Unknown`](crate::HealthStatus::Unknown).

use core::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, PrimitiveDateTime, format_description};

/// A reading timestamp as delivered by the feed.
///
/// Keeps the raw value for display alongside the parsed instant used for
/// filtering and sorting. Parsing never fails; an unrecognized value simply
/// has no instant and is excluded from date-bounded views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timestamp {
    raw: String,
    parsed: Option<OffsetDateTime>,
}

impl Timestamp {
    /// Build a timestamp from a raw feed string.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_instant(&raw);
        Self { raw, parsed }
    }

    /// Build a timestamp from a known instant (RFC 3339 raw form).
    pub fn from_instant(instant: OffsetDateTime) -> Self {
        let raw = instant
            .format(&Rfc3339)
            .unwrap_or_else(|_| instant.unix_timestamp().to_string());
        Self {
            raw,
            parsed: Some(instant),
        }
    }

    /// The raw value as it appeared in the feed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed instant, if the raw value was recognizable.
    pub fn instant(&self) -> Option<OffsetDateTime> {
        self.parsed
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            None | Some(Value::Null) => Timestamp::default(),
            Some(Value::String(s)) => Timestamp::from_raw(s),
            Some(Value::Number(n)) => {
                let parsed = n
                    .as_i64()
                    .or_else(|| n.as_f64().map(|f| f as i64))
                    .and_then(instant_from_epoch);
                Timestamp {
                    raw: n.to_string(),
                    parsed,
                }
            }
            Some(other) => Timestamp {
                raw: other.to_string(),
                parsed: None,
            },
        })
    }
}

/// Parse a raw timestamp string into an instant.
///
/// Accepted shapes, tried in order:
/// - RFC 3339 (`2024-05-01T12:00:00Z`)
/// - `YYYY-MM-DD HH:MM:SS` (assumed UTC)
/// - `YYYY-MM-DD` (midnight UTC)
/// - Unix epoch seconds, or milliseconds when the magnitude is >= 10^12
pub fn parse_instant(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts);
    }

    if let Ok(items) = format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")
        && let Ok(dt) = PrimitiveDateTime::parse(raw, &items)
    {
        return Some(dt.assume_utc());
    }

    if let Ok(items) = format_description::parse("[year]-[month]-[day]")
        && let Ok(date) = Date::parse(raw, &items)
    {
        return Some(date.midnight().assume_utc());
    }

    raw.parse::<i64>().ok().and_then(instant_from_epoch)
}

fn instant_from_epoch(value: i64) -> Option<OffsetDateTime> {
    if value.unsigned_abs() >= 1_000_000_000_000 {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(value) * 1_000_000).ok()
    } else {
        OffsetDateTime::from_unix_timestamp(value).ok()
    }
}

/// One sensor sample from the feed.
///
/// Field names follow the feed's camelCase JSON (`deviceId`,
/// `firmwareVersion`). Nutrient levels are nominally 0-100 and RGB
/// channels 0-255, but out-of-range values are kept as-is; the feed's
/// ordering is trusted and the last element of a fetch is "latest".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Reading {
    /// When the reading was recorded.
    pub timestamp: Timestamp,
    /// Opaque device identifier.
    #[serde(deserialize_with = "lenient_string")]
    pub device_id: Option<String>,
    /// Nitrogen level.
    #[serde(deserialize_with = "lenient_f64")]
    pub nitrogen: Option<f64>,
    /// Phosphorus level.
    #[serde(deserialize_with = "lenient_f64")]
    pub phosphorus: Option<f64>,
    /// Potassium level.
    #[serde(deserialize_with = "lenient_f64")]
    pub potassium: Option<f64>,
    /// Aggregate health indicator used for classification.
    #[serde(deserialize_with = "lenient_f64")]
    pub ztotal: Option<f64>,
    /// Red channel value.
    #[serde(deserialize_with = "lenient_f64")]
    pub red: Option<f64>,
    /// Green channel value.
    #[serde(deserialize_with = "lenient_f64")]
    pub green: Option<f64>,
    /// Blue channel value.
    #[serde(deserialize_with = "lenient_f64")]
    pub blue: Option<f64>,
    /// Device firmware version (present on the latest reading only).
    #[serde(deserialize_with = "lenient_string")]
    pub firmware_version: Option<String>,
    /// Device uptime in seconds (present on the latest reading only).
    #[serde(deserialize_with = "lenient_f64")]
    pub uptime: Option<f64>,
}

impl Reading {
    /// Device uptime formatted as `Xh Ym`, when present.
    pub fn uptime_display(&self) -> Option<String> {
        let secs = self.uptime? as u64;
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        Some(format!("{}h {}m", hours, mins))
    }
}

/// Accept any JSON value, keeping only finite numbers.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_f64))
}

/// Accept any JSON value, keeping strings and stringifying numbers.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_parse_rfc3339_timestamp() {
        let ts = Timestamp::from_raw("2024-05-01T12:30:00Z");
        assert_eq!(ts.instant(), Some(datetime!(2024-05-01 12:30:00 UTC)));
    }

    #[test]
    fn test_parse_space_separated_timestamp() {
        let ts = Timestamp::from_raw("2024-05-01 12:30:00");
        assert_eq!(ts.instant(), Some(datetime!(2024-05-01 12:30:00 UTC)));
    }

    #[test]
    fn test_parse_date_only_timestamp() {
        let ts = Timestamp::from_raw("2024-05-01");
        assert_eq!(ts.instant(), Some(datetime!(2024-05-01 0:00:00 UTC)));
    }

    #[test]
    fn test_parse_epoch_seconds_and_millis() {
        let secs = Timestamp::from_raw("1714566600");
        let millis = Timestamp::from_raw("1714566600000");
        assert_eq!(secs.instant(), millis.instant());
        assert!(secs.instant().is_some());
    }

    #[test]
    fn test_unparseable_timestamp_keeps_raw() {
        let ts = Timestamp::from_raw("not a date");
        assert_eq!(ts.instant(), None);
        assert_eq!(ts.raw(), "not a date");
    }

    #[test]
    fn test_deserialize_full_reading() {
        let json = r#"{
            "timestamp": "2024-05-01 08:00:00",
            "deviceId": "npk-07",
            "nitrogen": 42, "phosphorus": 17.5, "potassium": 63,
            "ztotal": 1.42,
            "red": 120, "green": 200, "blue": 30,
            "firmwareVersion": "1.0.3",
            "uptime": 7260
        }"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.device_id.as_deref(), Some("npk-07"));
        assert_eq!(reading.nitrogen, Some(42.0));
        assert_eq!(reading.phosphorus, Some(17.5));
        assert_eq!(reading.ztotal, Some(1.42));
        assert_eq!(reading.firmware_version.as_deref(), Some("1.0.3"));
        assert_eq!(reading.uptime_display().as_deref(), Some("2h 1m"));
    }

    #[test]
    fn test_deserialize_tolerates_missing_and_bad_fields() {
        let json = r#"{"deviceId": 12, "ztotal": "high", "nitrogen": null}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        // Numeric device id is stringified; non-numeric ztotal degrades to None.
        assert_eq!(reading.device_id.as_deref(), Some("12"));
        assert_eq!(reading.ztotal, None);
        assert_eq!(reading.nitrogen, None);
        assert_eq!(reading.timestamp.instant(), None);
    }

    #[test]
    fn test_deserialize_numeric_timestamp() {
        let json = r#"{"timestamp": 1714566600}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert!(reading.timestamp.instant().is_some());
        assert_eq!(reading.timestamp.raw(), "1714566600");
    }

    #[test]
    fn test_serialize_round_trips_camel_case() {
        let reading = Reading {
            device_id: Some("npk-07".into()),
            ztotal: Some(2.0),
            ..Reading::default()
        };
        let json = serde_json::to_value(&reading).unwrap();
        assert!(json.get("deviceId").is_some());
        assert!(json.get("firmwareVersion").is_some());
    }
}
