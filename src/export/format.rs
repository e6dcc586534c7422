//! # Flight Log Format
//!
//! Column layout of the exported CSV document and the serde row type the
//! `csv` writer and reader work with.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::telemetry::types::{FlightMode, LogEntry};

/// Default file name of the exported flight log
pub const DEFAULT_EXPORT_FILE: &str = "flight_log.csv";

/// Column headers, in export order
pub const COLUMNS: [&str; 8] = [
    "Time",
    "X",
    "Y",
    "Altitude",
    "Battery",
    "Speed",
    "Flight Mode",
    "Out of Bounds",
];

/// Literal written for `true`
pub const TRUE_LITERAL: &str = "True";

/// Literal written for `false`
pub const FALSE_LITERAL: &str = "False";

/// One CSV row; field order must match [`COLUMNS`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct FlightLogRecord {
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "X")]
    x: f64,
    #[serde(rename = "Y")]
    y: f64,
    #[serde(rename = "Altitude")]
    altitude: f64,
    #[serde(rename = "Battery")]
    battery: f64,
    #[serde(rename = "Speed")]
    speed: f64,
    #[serde(rename = "Flight Mode")]
    flight_mode: FlightMode,
    #[serde(
        rename = "Out of Bounds",
        serialize_with = "serialize_bool_literal",
        deserialize_with = "deserialize_bool_literal"
    )]
    out_of_bounds: bool,
}

impl From<&LogEntry> for FlightLogRecord {
    fn from(entry: &LogEntry) -> Self {
        Self {
            time: entry.time.clone(),
            x: entry.x,
            y: entry.y,
            altitude: entry.altitude,
            battery: entry.battery,
            speed: entry.speed,
            flight_mode: entry.flight_mode,
            out_of_bounds: entry.out_of_bounds,
        }
    }
}

impl From<FlightLogRecord> for LogEntry {
    fn from(record: FlightLogRecord) -> Self {
        Self {
            time: record.time,
            x: record.x,
            y: record.y,
            altitude: record.altitude,
            battery: record.battery,
            speed: record.speed,
            flight_mode: record.flight_mode,
            out_of_bounds: record.out_of_bounds,
        }
    }
}

#[must_use]
pub fn format_bool(value: bool) -> &'static str {
    if value {
        TRUE_LITERAL
    } else {
        FALSE_LITERAL
    }
}

/// Parse a boolean literal (`True`/`False`, case-insensitive)
#[must_use]
pub fn parse_bool(field: &str) -> Option<bool> {
    if field.eq_ignore_ascii_case(TRUE_LITERAL) {
        Some(true)
    } else if field.eq_ignore_ascii_case(FALSE_LITERAL) {
        Some(false)
    } else {
        None
    }
}

fn serialize_bool_literal<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(format_bool(*value))
}

fn deserialize_bool_literal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let field = String::deserialize(deserializer)?;
    parse_bool(&field).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid {} value {:?}", COLUMNS[7], field))
    })
}
