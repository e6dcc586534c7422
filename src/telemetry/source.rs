//! # Telemetry Sources
//!
//! A [`TelemetrySource`] produces the raw readings consumed by one tick:
//! the displacement, battery drain, PID triple and altitude. The only source
//! shipped here is [`SimulatedSource`], which draws them uniformly at random.
//!
//! ## Reproducibility
//!
//! `SimulatedSource::seeded` uses ChaCha8, so the same seed always yields the
//! same flight on every platform.
//!
//! ```
//! use drone_telemetry::telemetry::source::{SimulatedSource, TelemetrySource};
//!
//! let mut a = SimulatedSource::seeded(7);
//! let mut b = SimulatedSource::seeded(7);
//! assert_eq!(a.sample().unwrap(), b.sample().unwrap());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::types::{
    PidOutput, ALTITUDE_MAX, ALTITUDE_MIN, DISPLACEMENT_MAX, DISPLACEMENT_MIN, DRAIN_MAX,
    DRAIN_MIN, PID_MAX, PID_MIN,
};
use crate::error::Result;

/// Raw readings for a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSample {
    /// X displacement
    pub dx: f64,
    /// Y displacement
    pub dy: f64,
    /// Battery drain (percent)
    pub drain: f64,
    pub pid: PidOutput,
    /// Altitude (metres)
    pub altitude: f64,
}

/// Provider of per-tick readings
///
/// Real sensor back ends report missing hardware as
/// [`TelemetryError::SensorUnavailable`](crate::error::TelemetryError::SensorUnavailable)
/// instead of falling back to simulated values.
#[cfg_attr(test, mockall::automock)]
pub trait TelemetrySource: Send {
    /// Produce the readings for the next tick
    fn sample(&mut self) -> Result<TickSample>;
}

/// Uniform random readings, each draw independent of every other
#[derive(Debug, Clone)]
pub struct SimulatedSource<R = ChaCha8Rng> {
    rng: R,
}

impl SimulatedSource<ChaCha8Rng> {
    /// Creates a reproducible source from a seed
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a source seeded from OS entropy
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> SimulatedSource<R> {
    /// Wraps an arbitrary random generator
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> TelemetrySource for SimulatedSource<R> {
    fn sample(&mut self) -> Result<TickSample> {
        let dx = self.rng.gen_range(DISPLACEMENT_MIN..=DISPLACEMENT_MAX);
        let dy = self.rng.gen_range(DISPLACEMENT_MIN..=DISPLACEMENT_MAX);
        let drain = self.rng.gen_range(DRAIN_MIN..=DRAIN_MAX);
        let pid = PidOutput::new(
            self.rng.gen_range(PID_MIN..=PID_MAX),
            self.rng.gen_range(PID_MIN..=PID_MAX),
            self.rng.gen_range(PID_MIN..=PID_MAX),
        );
        let altitude = self.rng.gen_range(ALTITUDE_MIN..=ALTITUDE_MAX);

        Ok(TickSample {
            dx,
            dy,
            drain,
            pid,
            altitude,
        })
    }
}
