//! # Telemetry Snapshot
//!
//! Read-only view of the flight state handed to the render collaborator
//! once per tick, plus the advisory alerts derived from it.

use serde::Serialize;

use crate::telemetry::geofence::GeoFence;
use crate::telemetry::types::{FlightMode, FlightState, LogEntry, PidOutput, Position};

/// Default battery percentage at or below which the low battery alert fires
pub const DEFAULT_LOW_BATTERY_PERCENT: f64 = 10.0;

/// Default number of most recent log rows included in a snapshot
pub const DEFAULT_LOG_TAIL_ROWS: usize = 10;

/// Advisory conditions derived from state
///
/// These are presentation alerts, not errors: the simulation keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Alert {
    OutOfBounds,
    LowBattery,
    BatteryDepleted,
}

impl Alert {
    /// Message shown to the operator
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Alert::OutOfBounds => "Warning: Drone is out of geo-fence bounds!",
            Alert::LowBattery => "Low Battery!",
            Alert::BatteryDepleted => "Battery depleted!",
        }
    }
}

/// Thresholds used when deriving alerts and trimming the log tail
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    pub low_battery_percent: f64,
    pub log_tail_rows: usize,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            low_battery_percent: DEFAULT_LOW_BATTERY_PERCENT,
            log_tail_rows: DEFAULT_LOG_TAIL_ROWS,
        }
    }
}

/// Everything the dashboard draws for one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetrySnapshot<'a> {
    pub tick: usize,
    pub position: Position,
    pub path: &'a [Position],
    pub battery: f64,
    /// Latest altitude, if any tick has run
    pub altitude: Option<f64>,
    /// Latest speed, if any tick has run
    pub speed: Option<f64>,
    pub altitudes: &'a [f64],
    pub timestamps: &'a [String],
    pub pid: PidOutput,
    pub flight_mode: Option<FlightMode>,
    pub out_of_bounds: bool,
    /// Bounds of the fence the flag was evaluated against
    pub fence: GeoFence,
    pub alerts: Vec<Alert>,
    pub log_tail: &'a [LogEntry],
}

impl<'a> TelemetrySnapshot<'a> {
    /// Capture a snapshot of the current flight state
    ///
    /// # Examples
    ///
    /// ```
    /// use drone_telemetry::dashboard::snapshot::{AlertThresholds, TelemetrySnapshot};
    /// use drone_telemetry::telemetry::geofence::GeoFence;
    /// use drone_telemetry::telemetry::types::FlightState;
    ///
    /// let state = FlightState::new();
    /// let snapshot = TelemetrySnapshot::capture(&state, &GeoFence::new(), &AlertThresholds::default());
    /// assert_eq!(snapshot.tick, 0);
    /// assert!(snapshot.alerts.is_empty());
    /// ```
    #[must_use]
    pub fn capture(state: &'a FlightState, fence: &GeoFence, thresholds: &AlertThresholds) -> Self {
        let log = state.log();
        let latest = state.latest_entry();
        let out_of_bounds = latest.is_some_and(|e| e.out_of_bounds);
        let tail_start = log.len().saturating_sub(thresholds.log_tail_rows);

        Self {
            tick: state.tick_count(),
            position: state.position(),
            path: state.path(),
            battery: state.battery(),
            altitude: latest.map(|e| e.altitude),
            speed: latest.map(|e| e.speed),
            altitudes: state.altitudes(),
            timestamps: state.timestamps(),
            pid: state.pid(),
            flight_mode: latest.map(|e| e.flight_mode),
            out_of_bounds,
            fence: *fence,
            alerts: derive_alerts(state.battery(), out_of_bounds, thresholds),
            log_tail: &log[tail_start..],
        }
    }
}

/// Derive the advisory alerts for a battery level and fence flag
#[must_use]
pub fn derive_alerts(battery: f64, out_of_bounds: bool, thresholds: &AlertThresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();
    if out_of_bounds {
        alerts.push(Alert::OutOfBounds);
    }
    if battery <= thresholds.low_battery_percent {
        alerts.push(Alert::LowBattery);
    }
    if battery <= 0.0 {
        alerts.push(Alert::BatteryDepleted);
    }
    alerts
}
