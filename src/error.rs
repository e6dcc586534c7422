//! # Error Types
//!
//! Custom error types for Drone Telemetry using `thiserror`.

use thiserror::Error;

/// Main error type for Drone Telemetry
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Flight log CSV document errors
    #[error("CSV error on line {line}: {message}")]
    Csv { line: usize, message: String },

    /// Snapshot serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A telemetry source could not produce a reading
    #[error("Sensor unavailable: {0}")]
    SensorUnavailable(String),
}

impl TelemetryError {
    /// Builds a [`TelemetryError::Csv`] for the given 1-based line number.
    pub(crate) fn csv(line: usize, message: impl Into<String>) -> Self {
        Self::Csv {
            line,
            message: message.into(),
        }
    }
}

impl From<csv::Error> for TelemetryError {
    /// I/O failures stay [`TelemetryError::Io`]; everything else becomes a
    /// [`TelemetryError::Csv`] on the line where the record starts.
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, |pos| pos.line() as usize);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Self::Io(io),
            _ => Self::Csv { line, message },
        }
    }
}

/// Result type alias for Drone Telemetry
pub type Result<T> = std::result::Result<T, TelemetryError>;
