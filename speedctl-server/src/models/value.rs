//! Schema-driven column values
//!
//! Rows of unknown shape are carried as an ordered list of
//! `(column, ColumnValue)` pairs. Every numeric column becomes an `f64`
//! before it reaches JSON, so wide integers never leak as big ints.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single decoded column value
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Number(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl ColumnValue {
    /// Numeric view of the value.
    ///
    /// Text is parsed leniently so that decimal strings still average out.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(t) => t.trim().parse().ok(),
            Self::Null | Self::Blob(_) => None,
        }
    }
}

impl Serialize for ColumnValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            // JSON has no NaN/Infinity
            Self::Number(n) if !n.is_finite() => serializer.serialize_none(),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(t) => serializer.serialize_str(t),
            Self::Blob(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => serializer.serialize_str(text),
                Err(_) => serializer.serialize_str(&STANDARD.encode(bytes)),
            },
        }
    }
}

/// One row keyed by column name, in select order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicRow {
    columns: Vec<(String, ColumnValue)>,
}

impl DynamicRow {
    pub fn new(columns: Vec<(String, ColumnValue)>) -> Self {
        Self { columns }
    }
}

impl Serialize for DynamicRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Render a timestamp the way every endpoint exposes it:
/// RFC 3339, UTC, millisecond precision (`2024-05-01T12:30:00.000Z`).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
