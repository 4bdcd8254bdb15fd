//! Console rendering of fleet snapshots.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use fleet_model::prelude::*;
use std::io::{self, Write};
use tracing::warn;

const SEPARATOR_WIDTH: usize = 80;

pub fn status_icon(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Healthy => "✓",
        HealthStatus::Warning => "⚠",
        HealthStatus::Critical => "✗",
    }
}

pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// One line per vehicle, e.g.
/// `  ✓ VEH-001: Engine=78.12°C, Brake=91.3PSI, Battery=12.71V [HEALTHY]`
pub fn format_reading(reading: &Reading) -> String {
    let mut line = format!(
        "  {} {}: Engine={}°C, Brake={}PSI, Battery={}V [{}]",
        status_icon(reading.status),
        reading.vehicle_id,
        reading.engine_temp,
        reading.brake_pressure,
        reading.battery_voltage,
        reading.status.as_str().to_uppercase()
    );

    let anomalies = detect_anomalies(reading);
    if !anomalies.is_empty() {
        let names: Vec<&str> = anomalies.iter().map(|a| a.as_str()).collect();
        line.push_str(&format!(" ({})", names.join(", ")));
    }

    line
}

pub fn format_summary(summary: &FleetSummary) -> String {
    format!(
        "  Fleet: {} vehicles, {} healthy, {} warning, {} critical",
        summary.total, summary.healthy, summary.warning, summary.critical
    )
}

pub fn render_snapshot(
    iteration: u64,
    snapshot: &[Reading],
    at: DateTime<Local>,
    show_json: bool,
) -> serde_json::Result<String> {
    let mut out = format!("\n[Iteration {}] {}\n", iteration, at.format("%H:%M:%S"));

    for reading in snapshot {
        out.push_str(&format_reading(reading));
        out.push('\n');
    }
    out.push_str(&format_summary(&FleetSummary::from_snapshot(snapshot)));
    out.push('\n');

    if show_json {
        out.push_str("\n[JSON OUTPUT]\n");
        out.push_str(&serde_json::to_string_pretty(snapshot)?);
        out.push('\n');
    }
    out.push_str(&separator());
    out.push('\n');

    Ok(out)
}

/// Closing report printed when a run ends.
pub fn format_run_summary(summary: &RunSummary) -> String {
    let headline = match summary.reason {
        StopReason::Cancelled => "Simulation stopped by user".to_string(),
        StopReason::DurationElapsed => format!(
            "Simulation completed after {:.1}s",
            summary.elapsed.as_secs_f64()
        ),
        StopReason::IterationLimit => "Simulation completed".to_string(),
    };
    format!("\n{}\nTotal iterations: {}", headline, summary.iterations)
}

/// Writes a human-readable block per snapshot.
pub struct ConsoleSink<W> {
    writer: W,
    show_json: bool,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout(show_json: bool) -> Self {
        Self::new(io::stdout(), show_json)
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(writer: W, show_json: bool) -> Self {
        Self { writer, show_json }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_snapshot(&mut self, iteration: u64, snapshot: &[Reading]) -> io::Result<()> {
        let rendered = render_snapshot(iteration, snapshot, Local::now(), self.show_json)?;
        self.writer.write_all(rendered.as_bytes())?;
        self.writer.flush()
    }
}

#[async_trait]
impl<W: Write + Send> SnapshotSink for ConsoleSink<W> {
    async fn consume(&mut self, iteration: u64, snapshot: &[Reading]) {
        if let Err(e) = self.write_snapshot(iteration, snapshot) {
            warn!(iteration, "Failed to write snapshot to console: {}", e);
        }
    }
}
