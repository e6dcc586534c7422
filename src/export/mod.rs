//! # Export Module
//!
//! Flight log export as a CSV document.
//!
//! This module handles:
//! - Fixed column order: `Time, X, Y, Altitude, Battery, Speed, Flight Mode, Out of Bounds`
//! - Encoding the in-memory log to UTF-8 text and writing it to disk
//! - Decoding an exported document back into log entries

pub mod decoder;
pub mod encoder;
pub mod format;

pub use decoder::{decode_flight_log, read_flight_log};
pub use encoder::{encode_flight_log, write_flight_log};
