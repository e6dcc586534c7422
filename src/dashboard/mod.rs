//! # Dashboard Module
//!
//! Boundary between the simulation and whatever draws it.
//!
//! This module handles:
//! - Capturing a per-tick snapshot (position, trail, battery, altitude trend, PID, mode)
//! - Deriving advisory alerts (geo-fence breach, low battery, depleted battery)
//! - Rendering snapshots to a terminal or as JSON lines for a charting front end

pub mod renderer;
pub mod snapshot;

pub use renderer::{JsonRenderer, Renderer, TextRenderer};
pub use snapshot::{Alert, AlertThresholds, TelemetrySnapshot};
