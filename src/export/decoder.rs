//! # Flight Log Decoder
//!
//! Parses an exported CSV document back into log entries.

use std::io;
use std::path::Path;

use csv::{Reader, ReaderBuilder, Trim};

use super::format::{FlightLogRecord, COLUMNS};
use crate::error::{Result, TelemetryError};
use crate::telemetry::types::LogEntry;

fn builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(true).trim(Trim::All);
    builder
}

fn decode_records<R: io::Read>(mut reader: Reader<R>) -> Result<Vec<LogEntry>> {
    let header = reader.headers()?;
    if header.iter().ne(COLUMNS) {
        return Err(TelemetryError::csv(
            1,
            format!("unexpected header: {}", header.iter().collect::<Vec<_>>().join(",")),
        ));
    }

    reader
        .deserialize::<FlightLogRecord>()
        .map(|record| record.map(LogEntry::from).map_err(TelemetryError::from))
        .collect()
}

/// Decode a CSV flight log document
///
/// A leading UTF-8 byte order mark, `\r\n` terminators and blank lines are
/// accepted.
///
/// # Arguments
///
/// * `document` - CSV text with header row, as produced by the encoder
///
/// # Returns
///
/// * `Result<Vec<LogEntry>>` - Entries in document order
///
/// # Errors
///
/// Returns error if:
/// - The header row is missing or does not match the expected columns
/// - A row has the wrong number of fields
/// - A numeric, boolean or flight mode field cannot be parsed
pub fn decode_flight_log(document: &str) -> Result<Vec<LogEntry>> {
    decode_records(builder().from_reader(document.as_bytes()))
}

/// Read and decode a CSV flight log file
///
/// # Errors
///
/// Returns error if the file cannot be read or decoded
pub fn read_flight_log<P: AsRef<Path>>(path: P) -> Result<Vec<LogEntry>> {
    decode_records(builder().from_path(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::encoder::encode_flight_log;
    use crate::telemetry::types::FlightMode;

    const HEADER: &str = "Time,X,Y,Altitude,Battery,Speed,Flight Mode,Out of Bounds\n";

    #[test]
    fn test_decode_single_row() {
        let doc = format!("{}12:00:01,3.0,4.0,55.25,99.7,5.0,Altitude Hold,False\n", HEADER);
        let log = decode_flight_log(&doc).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].time, "12:00:01");
        assert_eq!(log[0].x, 3.0);
        assert_eq!(log[0].y, 4.0);
        assert_eq!(log[0].altitude, 55.25);
        assert_eq!(log[0].battery, 99.7);
        assert_eq!(log[0].speed, 5.0);
        assert_eq!(log[0].flight_mode, FlightMode::AltitudeHold);
        assert!(!log[0].out_of_bounds);
    }

    #[test]
    fn test_decode_header_only() {
        assert!(decode_flight_log(HEADER).unwrap().is_empty());
    }

    #[test]
    fn test_decode_crlf_and_missing_final_newline() {
        let doc = "Time,X,Y,Altitude,Battery,Speed,Flight Mode,Out of Bounds\r\n\
                   12:00:01,1.0,2.0,30.0,90.0,2.5,Manual,True";
        let log = decode_flight_log(doc).unwrap();
        assert_eq!(log.len(), 1);
        assert!(log[0].out_of_bounds);
        assert_eq!(log[0].flight_mode, FlightMode::Manual);
    }

    #[test]
    fn test_decode_byte_order_mark() {
        // Spreadsheet tools prepend a BOM when re-saving as UTF-8 CSV
        let doc = format!("\u{feff}{}08:00:00,3.0,4.0,20.0,99.5,5.0,Stabilize,False\n", HEADER);
        let log = decode_flight_log(&doc).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].time, "08:00:00");
        assert_eq!(log[0].flight_mode, FlightMode::Stabilize);
    }

    #[test]
    fn test_decode_quoted_fields() {
        let doc = format!("{}\"12:00:01\",1.0,2.0,30.0,90.0,2.5,\"Stabilize\",False\n", HEADER);
        let log = decode_flight_log(&doc).unwrap();
        assert_eq!(log[0].time, "12:00:01");
        assert_eq!(log[0].flight_mode, FlightMode::Stabilize);
    }

    #[test]
    fn test_decode_skips_blank_lines() {
        let doc = format!("{}\n12:00:01,1.0,2.0,30.0,90.0,2.5,Manual,False\n\n", HEADER);
        assert_eq!(decode_flight_log(&doc).unwrap().len(), 1);
    }

    #[test]
    fn test_decode_empty_document() {
        let err = decode_flight_log("").unwrap_err();
        assert!(matches!(err, TelemetryError::Csv { .. }));
    }

    #[test]
    fn test_decode_wrong_header() {
        let err = decode_flight_log("Time,X,Y\n").unwrap_err();
        assert!(matches!(err, TelemetryError::Csv { line: 1, .. }));
    }

    #[test]
    fn test_decode_wrong_field_count() {
        let doc = format!("{}12:00:01,1.0,2.0\n", HEADER);
        let err = decode_flight_log(&doc).unwrap_err();
        assert!(matches!(err, TelemetryError::Csv { line: 2, .. }));
    }

    #[test]
    fn test_decode_bad_number() {
        let doc = format!("{}12:00:01,abc,2.0,30.0,90.0,2.5,Manual,False\n", HEADER);
        let err = decode_flight_log(&doc).unwrap_err();
        assert!(matches!(err, TelemetryError::Csv { line: 2, .. }));
    }

    #[test]
    fn test_decode_bad_mode() {
        let doc = format!("{}12:00:01,1.0,2.0,30.0,90.0,2.5,Acro,False\n", HEADER);
        assert!(decode_flight_log(&doc).is_err());
    }

    #[test]
    fn test_decode_bad_bool() {
        let doc = format!("{}12:00:01,1.0,2.0,30.0,90.0,2.5,Manual,maybe\n", HEADER);
        let err = decode_flight_log(&doc).unwrap_err();
        assert!(err.to_string().contains("Out of Bounds"));
    }

    #[test]
    fn test_decode_unterminated_quote() {
        let doc = format!("{}\"12:00:01,1.0\n", HEADER);
        let err = decode_flight_log(&doc).unwrap_err();
        assert!(matches!(err, TelemetryError::Csv { line: 2, .. }));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_flight_log("/nonexistent/flight_log.csv").unwrap_err();
        assert!(matches!(err, TelemetryError::Io(_)));
    }

    #[test]
    fn test_read_flight_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let log = vec![LogEntry {
            time: "01:02:03".to_string(),
            x: -51.25,
            y: 0.125,
            altitude: 10.0,
            battery: 0.0,
            speed: 4.75,
            flight_mode: FlightMode::Manual,
            out_of_bounds: true,
        }];
        std::fs::write(&path, encode_flight_log(&log).unwrap()).unwrap();
        assert_eq!(read_flight_log(&path).unwrap(), log);
    }
}
