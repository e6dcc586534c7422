//! Wall-clock abstraction so ticks can be timestamped deterministically in tests

use chrono::Local;

use super::types::TIMESTAMP_FORMAT;

/// Source of `HH:MM:SS` timestamps for log entries
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send {
    /// Current time formatted as `HH:MM:SS`
    fn timestamp(&self) -> String;
}

/// Local wall-clock time via `chrono`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn timestamp(&self) -> String {
        Local::now().format(TIMESTAMP_FORMAT).to_string()
    }
}
