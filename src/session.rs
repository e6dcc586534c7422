//! # Simulation Session
//!
//! The scheduler around [`TelemetrySimulator`]: owns the session's
//! [`FlightState`], ticks it on a fixed interval, applies flight mode changes
//! between ticks and hands every snapshot to a [`Renderer`].
//!
//! ## Stopping
//!
//! A session ends when the shutdown future resolves, after `max_ticks`, or,
//! if `stop_on_depleted` is set, once the battery reaches zero. Otherwise a
//! depleted battery is absorbing and ticks continue.

use std::future::Future;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dashboard::renderer::Renderer;
use crate::dashboard::snapshot::{Alert, AlertThresholds, TelemetrySnapshot};
use crate::error::Result;
use crate::telemetry::clock::Clock;
use crate::telemetry::simulator::TelemetrySimulator;
use crate::telemetry::source::TelemetrySource;
use crate::telemetry::types::{FlightMode, FlightState, LogEntry};

/// Timing and stop conditions for a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub tick_interval: Duration,
    pub max_ticks: Option<u64>,
    pub stop_on_depleted: bool,
    pub initial_mode: FlightMode,
    pub thresholds: AlertThresholds,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SessionSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.simulation.tick_interval_ms),
            max_ticks: config.simulation.max_ticks,
            stop_on_depleted: config.simulation.stop_on_depleted,
            initial_mode: config.simulation.flight_mode,
            thresholds: config.alert_thresholds(),
        }
    }
}

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    MaxTicks,
    BatteryDepleted,
}

/// One simulated flight from start to shutdown
pub struct Session<S, C, R> {
    simulator: TelemetrySimulator<S, C>,
    renderer: R,
    settings: SessionSettings,
    state: FlightState,
    mode: FlightMode,
    active_alerts: Vec<Alert>,
}

impl<S, C, R> std::fmt::Debug for Session<S, C, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode)
            .field("ticks", &self.state.tick_count())
            .field("battery", &self.state.battery())
            .finish_non_exhaustive()
    }
}

impl<S: TelemetrySource, C: Clock, R: Renderer> Session<S, C, R> {
    /// Creates a session with a fresh flight state
    pub fn new(simulator: TelemetrySimulator<S, C>, renderer: R, settings: SessionSettings) -> Self {
        let mode = settings.initial_mode;
        Self {
            simulator,
            renderer,
            settings,
            state: FlightState::new(),
            mode,
            active_alerts: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &FlightState {
        &self.state
    }

    /// Consumes the session, returning the final flight state
    #[must_use]
    pub fn into_state(self) -> FlightState {
        self.state
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn mode(&self) -> FlightMode {
        self.mode
    }

    /// Select the flight mode used from the next tick on
    pub fn set_mode(&mut self, mode: FlightMode) {
        if mode != self.mode {
            info!("Flight mode changed: {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Run a single tick and render its snapshot
    ///
    /// # Errors
    ///
    /// Returns error if the telemetry source fails or rendering fails
    pub fn step(&mut self) -> Result<LogEntry> {
        let entry = self.simulator.tick(&mut self.state, self.mode)?;

        let snapshot = TelemetrySnapshot::capture(
            &self.state,
            self.simulator.fence(),
            &self.settings.thresholds,
        );
        for alert in &snapshot.alerts {
            if !self.active_alerts.contains(alert) {
                warn!("Tick {}: {}", snapshot.tick, alert.message());
            }
        }
        self.active_alerts = snapshot.alerts.clone();
        self.renderer.render(&snapshot)?;

        Ok(entry)
    }

    /// Tick until a stop condition is met
    ///
    /// # Arguments
    ///
    /// * `modes` - Flight mode selections, applied before the next tick
    /// * `shutdown` - Resolves when the host wants the session to end
    ///
    /// # Returns
    ///
    /// * `Result<StopReason>` - Why the session ended
    ///
    /// # Errors
    ///
    /// Returns the first tick or render error
    pub async fn run<F>(&mut self, mut modes: mpsc::Receiver<FlightMode>, shutdown: F) -> Result<StopReason>
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.settings.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut modes_open = true;
        let start_ticks = self.state.tick_count() as u64;

        info!(
            "Starting simulation at {} ms per tick in {} mode",
            self.settings.tick_interval.as_millis(),
            self.mode
        );

        let reason = loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    break StopReason::Shutdown;
                }

                mode = modes.recv(), if modes_open => {
                    match mode {
                        Some(mode) => self.set_mode(mode),
                        None => {
                            debug!("Flight mode input closed");
                            modes_open = false;
                        }
                    }
                }

                _ = ticker.tick() => {
                    self.step()?;

                    let ticks = self.state.tick_count() as u64 - start_ticks;
                    if self.settings.max_ticks.is_some_and(|max| ticks >= max) {
                        break StopReason::MaxTicks;
                    }
                    if self.settings.stop_on_depleted && self.state.is_battery_depleted() {
                        break StopReason::BatteryDepleted;
                    }
                }
            }
        };

        info!(
            "Simulation stopped ({:?}) after {} ticks, battery {:.2}%",
            reason,
            self.state.tick_count(),
            self.state.battery()
        );

        Ok(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::renderer::TextRenderer;
    use crate::error::TelemetryError;
    use crate::telemetry::clock::SystemClock;
    use crate::telemetry::source::{MockTelemetrySource, SimulatedSource, TickSample};
    use crate::telemetry::types::PidOutput;

    fn settings(max_ticks: Option<u64>) -> SessionSettings {
        SessionSettings {
            tick_interval: Duration::from_millis(1),
            max_ticks,
            ..SessionSettings::default()
        }
    }

    fn seeded_session(
        settings: SessionSettings,
    ) -> Session<SimulatedSource, SystemClock, TextRenderer<Vec<u8>>> {
        let simulator = TelemetrySimulator::new(SimulatedSource::seeded(3), SystemClock);
        Session::new(simulator, TextRenderer::new(Vec::new()), settings)
    }

    fn rendered_ticks<S: TelemetrySource, C: Clock>(
        session: &Session<S, C, TextRenderer<Vec<u8>>>,
    ) -> usize {
        String::from_utf8_lossy(session.renderer().get_ref())
            .matches("=== Tick ")
            .count()
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.simulation.tick_interval_ms = 250;
        config.simulation.max_ticks = Some(7);
        config.simulation.stop_on_depleted = true;
        config.simulation.flight_mode = FlightMode::Stabilize;

        let s = SessionSettings::from_config(&config);
        assert_eq!(s.tick_interval, Duration::from_millis(250));
        assert_eq!(s.max_ticks, Some(7));
        assert!(s.stop_on_depleted);
        assert_eq!(s.initial_mode, FlightMode::Stabilize);
    }

    #[test]
    fn test_step_renders_and_logs() {
        let mut session = seeded_session(settings(None));
        session.step().unwrap();
        session.step().unwrap();
        assert_eq!(session.state().tick_count(), 2);
        assert_eq!(rendered_ticks(&session), 2);
    }

    #[test]
    fn test_step_snapshot_carries_fence() {
        use crate::dashboard::renderer::JsonRenderer;
        use crate::telemetry::geofence::{FENCE_MAX, FENCE_MIN};

        let simulator = TelemetrySimulator::new(SimulatedSource::seeded(3), SystemClock);
        let mut session = Session::new(simulator, JsonRenderer::new(Vec::new()), settings(None));
        session.step().unwrap();

        let out = String::from_utf8(session.renderer.into_inner()).unwrap();
        let json: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(json["fence"]["min"], FENCE_MIN);
        assert_eq!(json["fence"]["max"], FENCE_MAX);
    }

    #[tokio::test]
    async fn test_run_until_max_ticks() {
        let mut session = seeded_session(settings(Some(3)));
        let (_tx, rx) = mpsc::channel(4);

        let reason = session.run(rx, std::future::pending()).await.unwrap();

        assert_eq!(reason, StopReason::MaxTicks);
        assert_eq!(rendered_ticks(&session), 3);
        let state = session.into_state();
        assert_eq!(state.log().len(), 3);
        assert_eq!(state.path().len(), 3);
        assert_eq!(state.altitudes().len(), 3);
        assert_eq!(state.timestamps().len(), 3);
    }

    #[tokio::test]
    async fn test_mode_change_applies_before_tick() {
        let mut session = seeded_session(settings(Some(2)));
        let (tx, rx) = mpsc::channel(4);
        tx.send(FlightMode::AltitudeHold).await.unwrap();
        drop(tx);

        session.run(rx, std::future::pending()).await.unwrap();

        assert_eq!(session.mode(), FlightMode::AltitudeHold);
        assert!(session
            .state()
            .log()
            .iter()
            .all(|e| e.flight_mode == FlightMode::AltitudeHold));
    }

    #[tokio::test]
    async fn test_shutdown_stops_session() {
        let mut session = seeded_session(settings(None));
        let (_tx, rx) = mpsc::channel(1);

        let reason = session.run(rx, async {}).await.unwrap();

        assert_eq!(reason, StopReason::Shutdown);
        assert_eq!(session.state().tick_count(), 0);
    }

    #[tokio::test]
    async fn test_stop_on_depleted() {
        let mut source = MockTelemetrySource::new();
        source.expect_sample().returning(|| {
            Ok(TickSample {
                dx: 0.0,
                dy: 0.0,
                drain: 40.0,
                pid: PidOutput::default(),
                altitude: 50.0,
            })
        });
        let simulator = TelemetrySimulator::new(source, SystemClock);
        let mut session = Session::new(
            simulator,
            TextRenderer::new(Vec::new()),
            SessionSettings {
                stop_on_depleted: true,
                ..settings(Some(100))
            },
        );
        let (_tx, rx) = mpsc::channel(1);

        let reason = session.run(rx, std::future::pending()).await.unwrap();

        assert_eq!(reason, StopReason::BatteryDepleted);
        assert_eq!(session.state().tick_count(), 3);
        assert_eq!(session.state().battery(), 0.0);
    }

    #[test]
    fn test_depleted_battery_keeps_ticking_by_default() {
        let mut source = MockTelemetrySource::new();
        source.expect_sample().returning(|| {
            Ok(TickSample {
                dx: 1.0,
                dy: 0.0,
                drain: 60.0,
                pid: PidOutput::default(),
                altitude: 50.0,
            })
        });
        let simulator = TelemetrySimulator::new(source, SystemClock);
        let mut session = Session::new(simulator, TextRenderer::new(Vec::new()), settings(Some(5)));
        let (_tx, rx) = mpsc::channel(1);

        let reason = tokio_test::block_on(session.run(rx, std::future::pending())).unwrap();

        assert_eq!(reason, StopReason::MaxTicks);
        assert_eq!(session.state().tick_count(), 5);
        assert_eq!(session.state().battery(), 0.0);
    }

    #[tokio::test]
    async fn test_sensor_error_ends_run() {
        let mut source = MockTelemetrySource::new();
        source
            .expect_sample()
            .returning(|| Err(TelemetryError::SensorUnavailable("imu".to_string())));
        let simulator = TelemetrySimulator::new(source, SystemClock);
        let mut session = Session::new(simulator, TextRenderer::new(Vec::new()), settings(None));
        let (_tx, rx) = mpsc::channel(1);

        let result = session.run(rx, std::future::pending()).await;

        assert!(matches!(result, Err(TelemetryError::SensorUnavailable(_))));
        assert_eq!(session.state().tick_count(), 0);
    }
}
