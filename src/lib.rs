//! # Drone Telemetry Library
//!
//! Simulated drone telemetry for a live dashboard.
//!
//! This library provides the simulated flight state and its per-tick update,
//! geo-fence and battery alerts, snapshot rendering for a dashboard front end,
//! and CSV export of the flight log.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod session;
pub mod telemetry;
