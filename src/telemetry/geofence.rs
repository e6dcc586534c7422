//! # Geo-Fence
//!
//! Fixed square boundary of the allowed flight area. Crossing it only raises
//! an advisory flag; the drone keeps flying.

use serde::Serialize;

use super::types::Position;

/// Lower bound of the fence on both axes
pub const FENCE_MIN: f64 = -50.0;

/// Upper bound of the fence on both axes
pub const FENCE_MAX: f64 = 50.0;

/// Axis-aligned square boundary
///
/// Bounds are inclusive: a position exactly on the edge is inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoFence {
    min: f64,
    max: f64,
}

impl Default for GeoFence {
    fn default() -> Self {
        Self {
            min: FENCE_MIN,
            max: FENCE_MAX,
        }
    }
}

impl GeoFence {
    /// Returns the standard `[-50, 50] × [-50, 50]` fence
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Checks whether a position lies inside the fence (edges included)
    ///
    /// # Examples
    ///
    /// ```
    /// use drone_telemetry::telemetry::geofence::GeoFence;
    /// use drone_telemetry::telemetry::types::Position;
    ///
    /// let fence = GeoFence::new();
    /// assert!(fence.contains(Position::new(50.0, -50.0)));
    /// assert!(!fence.contains(Position::new(50.1, 0.0)));
    /// ```
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        (self.min..=self.max).contains(&position.x) && (self.min..=self.max).contains(&position.y)
    }

    /// True iff either coordinate lies strictly outside the fence
    #[must_use]
    pub fn is_out_of_bounds(&self, position: Position) -> bool {
        !self.contains(position)
    }
}
