//! Shared serialization helpers for persisted records.
//!
//! Timestamps are stored as ISO-8601 strings with millisecond precision and a
//! `Z` suffix (`2024-05-01T10:00:00.000Z`); any RFC 3339 offset is accepted
//! on read and normalised to UTC.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;

/// Outcome of reading a JSON record from storage.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue<T> {
    /// No record under the key.
    Absent,
    /// Record decoded successfully.
    Present(T),
    /// Record exists but failed to decode.
    Corrupt(String),
}

impl<T> StoredValue<T> {
    /// Collapse absent and corrupt records into `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            StoredValue::Present(value) => Some(value),
            StoredValue::Absent | StoredValue::Corrupt(_) => None,
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoredValue::Corrupt(_))
    }
}

impl<T: Default> StoredValue<T> {
    /// Collapse absent and corrupt records into the default value.
    pub fn unwrap_or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

/// Decode an optional raw payload into a [`StoredValue`].
pub(crate) fn decode<T: DeserializeOwned>(raw: Option<String>) -> StoredValue<T> {
    match raw {
        None => StoredValue::Absent,
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => StoredValue::Present(value),
            Err(err) => StoredValue::Corrupt(err.to_string()),
        },
    }
}

/// Format a timestamp in the persisted wire format.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a persisted timestamp.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|value| value.with_timezone(&Utc))
}

/// Serde adapter for `DateTime<Utc>` fields using the wire format.
pub mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}
