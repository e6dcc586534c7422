//! # Flight Log Encoder
//!
//! Serializes the flight log into a UTF-8 CSV document.

use std::io;
use std::path::Path;

use csv::{Terminator, Writer, WriterBuilder};
use tracing::info;

use super::format::{FlightLogRecord, COLUMNS};
use crate::error::Result;
use crate::telemetry::types::LogEntry;

/// Writer settings shared by the document, row and file encoders
///
/// The header row is written explicitly so an empty log still gets one.
fn builder() -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder.has_headers(false).terminator(Terminator::Any(b'\n'));
    builder
}

fn write_log<W: io::Write>(writer: &mut Writer<W>, log: &[LogEntry]) -> Result<()> {
    writer.write_record(COLUMNS)?;
    for entry in log {
        writer.serialize(FlightLogRecord::from(entry))?;
    }
    writer.flush()?;
    Ok(())
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()))?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Encode a flight log as a CSV document
///
/// # Arguments
///
/// * `log` - Flight log entries, oldest first
///
/// # Returns
///
/// * `Result<String>` - Header row followed by one row per entry, each `\n`-terminated
///
/// # Errors
///
/// Returns error if a row cannot be serialized
///
/// # Examples
///
/// ```
/// use drone_telemetry::export::encoder::encode_flight_log;
///
/// let csv = encode_flight_log(&[])?;
/// assert_eq!(csv, "Time,X,Y,Altitude,Battery,Speed,Flight Mode,Out of Bounds\n");
/// # Ok::<(), drone_telemetry::error::TelemetryError>(())
/// ```
pub fn encode_flight_log(log: &[LogEntry]) -> Result<String> {
    let mut writer = builder().from_writer(Vec::with_capacity(64 * (log.len() + 1)));
    write_log(&mut writer, log)?;
    into_string(writer)
}

/// Encode a single log entry as a CSV row (without terminator)
///
/// # Errors
///
/// Returns error if the row cannot be serialized
pub fn encode_row(entry: &LogEntry) -> Result<String> {
    let mut writer = builder().from_writer(Vec::with_capacity(64));
    writer.serialize(FlightLogRecord::from(entry))?;
    let mut row = into_string(writer)?;
    if row.ends_with('\n') {
        row.pop();
    }
    Ok(row)
}

/// Write a flight log to a CSV file
///
/// # Errors
///
/// Returns error if the file cannot be created or written
pub fn write_flight_log<P: AsRef<Path>>(path: P, log: &[LogEntry]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = builder().from_path(path)?;
    write_log(&mut writer, log)?;
    info!("Exported {} flight log rows to {}", log.len(), path.display());
    Ok(())
}
