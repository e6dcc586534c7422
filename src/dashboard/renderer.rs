//! # Snapshot Renderers
//!
//! Hands each tick's [`TelemetrySnapshot`] to an output. Charts and layout are
//! the front end's job; these renderers either print a compact terminal
//! readout or stream the raw snapshot as JSON lines for a charting UI.

use std::io::Write;

use super::snapshot::TelemetrySnapshot;
use crate::error::Result;
use crate::export::encoder::encode_row;

/// Consumer of per-tick snapshots
pub trait Renderer: Send {
    /// Render one snapshot
    fn render(&mut self, snapshot: &TelemetrySnapshot<'_>) -> Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, snapshot: &TelemetrySnapshot<'_>) -> Result<()> {
        (**self).render(snapshot)
    }
}

/// Terminal readout: metrics, fence status, alerts and the log tail
#[derive(Debug)]
pub struct TextRenderer<W> {
    out: W,
    show_log_tail: bool,
}

impl<W: Write + Send> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            show_log_tail: true,
        }
    }

    /// Disable printing of the recent log rows
    #[must_use]
    pub fn without_log_tail(mut self) -> Self {
        self.show_log_tail = false;
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Formats an optional metric with two decimals, `-` when absent
fn metric(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

impl<W: Write + Send> Renderer for TextRenderer<W> {
    fn render(&mut self, snapshot: &TelemetrySnapshot<'_>) -> Result<()> {
        let mode = snapshot
            .flight_mode
            .map_or_else(|| "-".to_string(), |m| m.to_string());

        writeln!(self.out, "=== Tick {} ===", snapshot.tick)?;
        writeln!(
            self.out,
            "Altitude (m): {:>8}   Speed (u/s): {:>8}   PID P: {:.2}",
            metric(snapshot.altitude),
            metric(snapshot.speed),
            snapshot.pid.p
        )?;
        writeln!(
            self.out,
            "Battery (%):  {:>8}   Flight Mode: {:>8}   PID I: {:.2}",
            format!("{:.2}", snapshot.battery),
            mode,
            snapshot.pid.i
        )?;
        writeln!(
            self.out,
            "Position: ({:.2}, {:.2})   Trail: {} points   Geo-fence: {}   PID D: {:.2}",
            snapshot.position.x,
            snapshot.position.y,
            snapshot.path.len(),
            if snapshot.out_of_bounds { "OUTSIDE" } else { "inside" },
            snapshot.pid.d
        )?;

        for alert in &snapshot.alerts {
            writeln!(self.out, "!! {}", alert.message())?;
        }

        if self.show_log_tail && !snapshot.log_tail.is_empty() {
            writeln!(self.out, "--- Flight Log (last {}) ---", snapshot.log_tail.len())?;
            for entry in snapshot.log_tail {
                writeln!(self.out, "{}", encode_row(entry)?)?;
            }
        }

        self.out.flush()?;
        Ok(())
    }
}

/// Streams one JSON document per tick (JSON Lines)
#[derive(Debug)]
pub struct JsonRenderer<W> {
    out: W,
}

impl<W: Write + Send> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Renderer for JsonRenderer<W> {
    fn render(&mut self, snapshot: &TelemetrySnapshot<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}
