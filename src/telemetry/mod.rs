//! # Telemetry Module
//!
//! Simulated flight telemetry: the state of one flight and the tick that
//! advances it.
//!
//! This module handles:
//! - Position integration from per-tick displacements
//! - Speed, battery drain and geo-fence evaluation
//! - Cosmetic PID and altitude readings
//! - The append-only flight log

pub mod clock;
pub mod geofence;
pub mod simulator;
pub mod source;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use geofence::GeoFence;
pub use simulator::{apply_sample, TelemetrySimulator};
pub use source::{SimulatedSource, TelemetrySource, TickSample};
pub use types::{FlightMode, FlightState, LogEntry, PidOutput, Position};
