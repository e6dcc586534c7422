//! # Telemetry Simulator
//!
//! Advances a [`FlightState`] by exactly one tick per call.
//!
//! Each tick performs, in order:
//!
//! 1. Save the current position as the previous position
//! 2. Displace the position by the sampled `(dx, dy)`
//! 3. Compute speed as the distance between new and previous position
//! 4. Append the new position to the path
//! 5. Drain the battery, clamping at zero
//! 6. Evaluate the geo-fence
//! 7. Record the sampled PID triple
//! 8. Append the sampled altitude and its timestamp
//! 9. Append a [`LogEntry`] built from the post-update state
//!
//! The simulator holds no loop of its own; a scheduler such as
//! [`Session`](crate::session::Session) decides when to call [`TelemetrySimulator::tick`].

use tracing::debug;

use super::clock::Clock;
use super::geofence::GeoFence;
use super::source::{TelemetrySource, TickSample};
use super::types::{FlightMode, FlightState, LogEntry, BATTERY_EMPTY};
use crate::error::Result;

/// Drives a [`FlightState`] from a telemetry source and a clock
#[derive(Debug)]
pub struct TelemetrySimulator<S, C> {
    source: S,
    clock: C,
    fence: GeoFence,
}

impl<S: TelemetrySource, C: Clock> TelemetrySimulator<S, C> {
    /// Creates a simulator using the standard geo-fence
    pub fn new(source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            fence: GeoFence::new(),
        }
    }

    #[must_use]
    pub fn fence(&self) -> &GeoFence {
        &self.fence
    }

    /// Advance the flight by one tick
    ///
    /// # Arguments
    ///
    /// * `state` - Session flight state, mutated in place
    /// * `mode` - Flight mode selected for this tick
    ///
    /// # Returns
    ///
    /// * `Result<LogEntry>` - The entry appended to the flight log
    ///
    /// # Errors
    ///
    /// Returns the source's error if it cannot produce a reading. The state is
    /// left untouched in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use drone_telemetry::telemetry::clock::SystemClock;
    /// use drone_telemetry::telemetry::simulator::TelemetrySimulator;
    /// use drone_telemetry::telemetry::source::SimulatedSource;
    /// use drone_telemetry::telemetry::types::{FlightMode, FlightState};
    ///
    /// let mut sim = TelemetrySimulator::new(SimulatedSource::seeded(1), SystemClock);
    /// let mut state = FlightState::new();
    /// let entry = sim.tick(&mut state, FlightMode::Stabilize)?;
    /// assert_eq!(state.log().len(), 1);
    /// assert_eq!(entry.flight_mode, FlightMode::Stabilize);
    /// # Ok::<(), drone_telemetry::error::TelemetryError>(())
    /// ```
    pub fn tick(&mut self, state: &mut FlightState, mode: FlightMode) -> Result<LogEntry> {
        let sample = self.source.sample()?;
        let timestamp = self.clock.timestamp();
        Ok(apply_sample(state, mode, &sample, timestamp, &self.fence))
    }
}

/// Apply one tick's readings to the flight state
///
/// Deterministic core of [`TelemetrySimulator::tick`]: all randomness and
/// wall-clock time arrive through `sample` and `timestamp`.
///
/// # Examples
///
/// ```
/// use drone_telemetry::telemetry::geofence::GeoFence;
/// use drone_telemetry::telemetry::simulator::apply_sample;
/// use drone_telemetry::telemetry::source::TickSample;
/// use drone_telemetry::telemetry::types::{FlightMode, FlightState, PidOutput};
///
/// let mut state = FlightState::new();
/// let sample = TickSample { dx: 3.0, dy: 4.0, drain: 0.2, pid: PidOutput::default(), altitude: 50.0 };
/// let entry = apply_sample(&mut state, FlightMode::Manual, &sample, "10:00:00".into(), &GeoFence::new());
/// assert_eq!(entry.speed, 5.0);
/// ```
pub fn apply_sample(
    state: &mut FlightState,
    mode: FlightMode,
    sample: &TickSample,
    timestamp: String,
    fence: &GeoFence,
) -> LogEntry {
    state.previous_position = state.position;
    state.position = state.position.offset(sample.dx, sample.dy);

    let speed = state.position.distance_to(state.previous_position);

    state.path.push(state.position);

    state.battery = (state.battery - sample.drain).max(BATTERY_EMPTY);

    let out_of_bounds = fence.is_out_of_bounds(state.position);

    state.pid = sample.pid;

    state.altitudes.push(sample.altitude);
    state.timestamps.push(timestamp.clone());

    let entry = LogEntry {
        time: timestamp,
        x: state.position.x,
        y: state.position.y,
        altitude: sample.altitude,
        battery: state.battery,
        speed,
        flight_mode: mode,
        out_of_bounds,
    };
    state.log.push(entry.clone());

    debug!(
        "Tick {}: pos=({:.2}, {:.2}) speed={:.2} battery={:.2} alt={:.2} mode={} oob={}",
        state.log.len(),
        entry.x,
        entry.y,
        entry.speed,
        entry.battery,
        entry.altitude,
        entry.flight_mode,
        entry.out_of_bounds
    );

    entry
}
