//! # Telemetry Types
//!
//! Core data definitions for the simulated flight: positions, flight modes,
//! log entries and the mutable [`FlightState`] owned by one session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Battery level of a freshly started session (percent)
pub const BATTERY_FULL: f64 = 100.0;

/// Battery floor (percent); reaching it is absorbing
pub const BATTERY_EMPTY: f64 = 0.0;

/// Per-axis displacement range per tick
pub const DISPLACEMENT_MIN: f64 = -5.0;
pub const DISPLACEMENT_MAX: f64 = 5.0;

/// Battery drain range per tick (percent)
pub const DRAIN_MIN: f64 = 0.1;
pub const DRAIN_MAX: f64 = 0.5;

/// Simulated PID term range
pub const PID_MIN: f64 = 0.0;
pub const PID_MAX: f64 = 1.0;

/// Simulated altitude range (metres)
pub const ALTITUDE_MIN: f64 = 10.0;
pub const ALTITUDE_MAX: f64 = 100.0;

/// Wall-clock timestamp format used for log entries (`HH:MM:SS`)
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// Planar drone position in simulation units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a new position
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this position moved by `(dx, dy)`
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to another position
    #[must_use]
    pub fn distance_to(self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Flight mode selected by the operator
///
/// Purely informational: the mode is recorded in every log entry but does not
/// change how the simulated drone moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlightMode {
    #[default]
    Manual,
    Stabilize,
    #[serde(rename = "Altitude Hold")]
    AltitudeHold,
}

impl FlightMode {
    /// All selectable modes, in menu order
    pub const ALL: [FlightMode; 3] = [
        FlightMode::Manual,
        FlightMode::Stabilize,
        FlightMode::AltitudeHold,
    ];

    /// Human-readable label, as shown on the dashboard and in exported logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            FlightMode::Manual => "Manual",
            FlightMode::Stabilize => "Stabilize",
            FlightMode::AltitudeHold => "Altitude Hold",
        }
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FlightMode {
    type Err = String;

    /// Parses a label or a short alias (case-insensitive)
    ///
    /// Accepted: `Manual`/`m`, `Stabilize`/`s`, `Altitude Hold`/`altitude-hold`/`alt`/`a`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" | "m" => Ok(FlightMode::Manual),
            "stabilize" | "s" => Ok(FlightMode::Stabilize),
            "altitude hold" | "altitude-hold" | "altitudehold" | "alt" | "a" => {
                Ok(FlightMode::AltitudeHold)
            }
            other => Err(format!("unknown flight mode: {:?}", other)),
        }
    }
}

/// Simulated PID controller output
///
/// Cosmetic telemetry only, never fed back into the position update.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PidOutput {
    pub p: f64,
    pub i: f64,
    pub d: f64,
}

impl PidOutput {
    #[must_use]
    pub const fn new(p: f64, i: f64, d: f64) -> Self {
        Self { p, i, d }
    }
}

/// One immutable row of recorded telemetry for a single tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Wall-clock time of the tick (`HH:MM:SS`)
    pub time: String,
    pub x: f64,
    pub y: f64,
    /// Altitude in metres
    pub altitude: f64,
    /// Battery after the tick's drain (percent)
    pub battery: f64,
    /// Distance travelled this tick (units per tick)
    pub speed: f64,
    pub flight_mode: FlightMode,
    pub out_of_bounds: bool,
}

/// All mutable flight state of one simulation session
///
/// Created once at session start, advanced exactly once per tick by
/// [`TelemetrySimulator`](super::simulator::TelemetrySimulator).
///
/// Invariant: `path`, `altitudes`, `timestamps` and `log` always have the same
/// length, and `battery` stays within `[0, 100]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightState {
    pub(crate) position: Position,
    pub(crate) previous_position: Position,
    pub(crate) path: Vec<Position>,
    pub(crate) battery: f64,
    pub(crate) altitudes: Vec<f64>,
    pub(crate) timestamps: Vec<String>,
    pub(crate) log: Vec<LogEntry>,
    pub(crate) pid: PidOutput,
}

impl Default for FlightState {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightState {
    /// Creates the session start state: origin, full battery, empty history
    #[must_use]
    pub fn new() -> Self {
        Self::with_battery(BATTERY_FULL)
    }

    /// Creates a start state with a specific battery level
    ///
    /// The level is clamped to `[0, 100]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use drone_telemetry::telemetry::types::FlightState;
    ///
    /// let state = FlightState::with_battery(150.0);
    /// assert_eq!(state.battery(), 100.0);
    /// ```
    #[must_use]
    pub fn with_battery(level: f64) -> Self {
        Self {
            position: Position::default(),
            previous_position: Position::default(),
            path: Vec::new(),
            battery: level.clamp(BATTERY_EMPTY, BATTERY_FULL),
            altitudes: Vec::new(),
            timestamps: Vec::new(),
            log: Vec::new(),
            pid: PidOutput::default(),
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn previous_position(&self) -> Position {
        self.previous_position
    }

    /// Every position visited, oldest first
    #[must_use]
    pub fn path(&self) -> &[Position] {
        &self.path
    }

    #[must_use]
    pub fn battery(&self) -> f64 {
        self.battery
    }

    #[must_use]
    pub fn altitudes(&self) -> &[f64] {
        &self.altitudes
    }

    /// Timestamps index-aligned with [`altitudes`](Self::altitudes)
    #[must_use]
    pub fn timestamps(&self) -> &[String] {
        &self.timestamps
    }

    #[must_use]
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// PID triple drawn on the most recent tick
    #[must_use]
    pub fn pid(&self) -> PidOutput {
        self.pid
    }

    #[must_use]
    pub fn latest_entry(&self) -> Option<&LogEntry> {
        self.log.last()
    }

    /// Number of ticks applied to this state
    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.log.len()
    }

    /// True once the battery has reached the floor
    #[must_use]
    pub fn is_battery_depleted(&self) -> bool {
        self.battery <= BATTERY_EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = FlightState::new();
        assert_eq!(state.position(), Position::new(0.0, 0.0));
        assert_eq!(state.previous_position(), Position::new(0.0, 0.0));
        assert_eq!(state.battery(), 100.0);
        assert!(state.path().is_empty());
        assert!(state.altitudes().is_empty());
        assert!(state.timestamps().is_empty());
        assert!(state.log().is_empty());
        assert_eq!(state.pid(), PidOutput::default());
        assert_eq!(state.tick_count(), 0);
        assert!(state.latest_entry().is_none());
    }

    #[test]
    fn test_with_battery_clamps() {
        assert_eq!(FlightState::with_battery(-3.0).battery(), 0.0);
        assert_eq!(FlightState::with_battery(42.5).battery(), 42.5);
        assert_eq!(FlightState::with_battery(101.0).battery(), 100.0);
    }

    #[test]
    fn test_battery_depleted() {
        assert!(FlightState::with_battery(0.0).is_battery_depleted());
        assert!(!FlightState::with_battery(0.01).is_battery_depleted());
    }

    #[test]
    fn test_position_distance() {
        let a = Position::new(0.0, 0.0);
        let b = a.offset(3.0, 4.0);
        assert_eq!(b, Position::new(3.0, 4.0));
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(b.distance_to(a), 5.0);
    }

    #[test]
    fn test_flight_mode_labels() {
        assert_eq!(FlightMode::Manual.to_string(), "Manual");
        assert_eq!(FlightMode::Stabilize.to_string(), "Stabilize");
        assert_eq!(FlightMode::AltitudeHold.to_string(), "Altitude Hold");
    }

    #[test]
    fn test_flight_mode_parse() {
        for mode in FlightMode::ALL {
            assert_eq!(mode.label().parse::<FlightMode>(), Ok(mode));
        }
        assert_eq!("m".parse::<FlightMode>(), Ok(FlightMode::Manual));
        assert_eq!(" S ".parse::<FlightMode>(), Ok(FlightMode::Stabilize));
        assert_eq!("alt".parse::<FlightMode>(), Ok(FlightMode::AltitudeHold));
        assert_eq!("altitude-hold".parse::<FlightMode>(), Ok(FlightMode::AltitudeHold));
        assert!("acro".parse::<FlightMode>().is_err());
    }

    #[test]
    fn test_flight_mode_serde_label() {
        let json = serde_json::to_string(&FlightMode::AltitudeHold).unwrap();
        assert_eq!(json, "\"Altitude Hold\"");
        let mode: FlightMode = serde_json::from_str("\"Stabilize\"").unwrap();
        assert_eq!(mode, FlightMode::Stabilize);
    }

    #[test]
    fn test_default_flight_mode() {
        assert_eq!(FlightMode::default(), FlightMode::Manual);
    }
}
