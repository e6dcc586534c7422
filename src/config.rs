//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::dashboard::snapshot::{AlertThresholds, DEFAULT_LOG_TAIL_ROWS, DEFAULT_LOW_BATTERY_PERCENT};
use crate::error::{Result, TelemetryError};
use crate::export::format::DEFAULT_EXPORT_FILE;
use crate::telemetry::types::FlightMode;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Simulation loop configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SimulationConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Fixed seed for a reproducible flight; random when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Stop after this many ticks; run until interrupted when absent
    #[serde(default)]
    pub max_ticks: Option<u64>,

    #[serde(default)]
    pub flight_mode: FlightMode,

    #[serde(default)]
    pub stop_on_depleted: bool,
}

/// Alert configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AlertConfig {
    #[serde(default = "default_low_battery_percent")]
    pub low_battery_percent: f64,
}

/// Dashboard output configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DashboardConfig {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_log_tail_rows")]
    pub log_tail_rows: usize,
}

/// Flight log export configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ExportConfig {
    #[serde(default = "default_export_enabled")]
    pub enabled: bool,

    #[serde(default = "default_export_path")]
    pub path: String,
}

/// Diagnostic log file configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Directory for daily rolling log files; stderr only when absent
    #[serde(default)]
    pub dir: Option<String>,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            seed: None,
            max_ticks: None,
            flight_mode: FlightMode::default(),
            stop_on_depleted: false,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self { low_battery_percent: default_low_battery_percent() }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            log_tail_rows: default_log_tail_rows(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: default_export_enabled(),
            path: default_export_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file_prefix: default_file_prefix(),
        }
    }
}

/// Dashboard output formats
pub const OUTPUT_TEXT: &str = "text";
pub const OUTPUT_JSON: &str = "json";

// Default value functions
fn default_tick_interval_ms() -> u64 { 1000 }

fn default_low_battery_percent() -> f64 { DEFAULT_LOW_BATTERY_PERCENT }

fn default_output() -> String { OUTPUT_TEXT.to_string() }
fn default_log_tail_rows() -> usize { DEFAULT_LOG_TAIL_ROWS }

fn default_export_enabled() -> bool { true }
fn default_export_path() -> String { DEFAULT_EXPORT_FILE.to_string() }

fn default_file_prefix() -> String { "drone-telemetry.log".to_string() }

fn invalid(message: impl std::fmt::Display) -> TelemetryError {
    TelemetryError::Config(toml::de::Error::custom(message))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use drone_telemetry::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.simulation.tick_interval_ms == 0 || self.simulation.tick_interval_ms > 60000 {
            return Err(invalid("tick_interval_ms must be between 1 and 60000"));
        }

        if self.simulation.max_ticks == Some(0) {
            return Err(invalid("max_ticks must be greater than 0"));
        }

        if !(0.0..=100.0).contains(&self.alerts.low_battery_percent) {
            return Err(invalid("low_battery_percent must be between 0.0 and 100.0"));
        }

        if ![OUTPUT_TEXT, OUTPUT_JSON].contains(&self.dashboard.output.as_str()) {
            return Err(invalid("dashboard output must be 'text' or 'json'"));
        }

        if self.dashboard.log_tail_rows == 0 || self.dashboard.log_tail_rows > 1000 {
            return Err(invalid("log_tail_rows must be between 1 and 1000"));
        }

        if self.export.enabled && self.export.path.is_empty() {
            return Err(invalid("export path cannot be empty when enabled"));
        }

        if self.logging.dir.as_deref() == Some("") {
            return Err(invalid("logging dir cannot be empty"));
        }

        if self.logging.file_prefix.is_empty() {
            return Err(invalid("logging file_prefix cannot be empty"));
        }

        Ok(())
    }

    /// Alert thresholds for snapshot capture
    #[must_use]
    pub fn alert_thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            low_battery_percent: self.alerts.low_battery_percent,
            log_tail_rows: self.dashboard.log_tail_rows,
        }
    }

    /// True when snapshots should be emitted as JSON lines
    #[must_use]
    pub fn json_output(&self) -> bool {
        self.dashboard.output == OUTPUT_JSON
    }
}
