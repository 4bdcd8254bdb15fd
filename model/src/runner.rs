//! Cooperative simulation loop
//!
//! [`FleetSimulator::run`] produces one snapshot per tick and hands it to a
//! [`SnapshotSink`]. Ticks never overlap. The loop stops when the iteration
//! bound is hit, when the configured duration has elapsed, or when the
//! cancellation token fires. Cancellation is observed between iterations and
//! during the inter-tick delay, so an iteration that has started always
//! completes.

use crate::config::SimulatorConfig;
use crate::fleet::FleetSimulator;
use crate::sink::SnapshotSink;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub interval: Duration,
    /// Zero means unbounded.
    pub duration: Duration,
    pub max_iterations: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from(&SimulatorConfig::default())
    }
}

impl From<&SimulatorConfig> for RunOptions {
    fn from(config: &SimulatorConfig) -> Self {
        Self {
            interval: config.interval,
            duration: config.duration,
            max_iterations: config.max_iterations,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    DurationElapsed,
    IterationLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub iterations: u64,
    pub reason: StopReason,
    pub elapsed: Duration,
}

impl FleetSimulator {
    pub async fn run<S>(
        &mut self,
        options: &RunOptions,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> RunSummary
    where
        S: SnapshotSink + ?Sized,
    {
        info!(
            vehicles = self.len(),
            interval = ?options.interval,
            "Starting fleet simulation"
        );

        let started = Instant::now();
        let mut iterations = 0u64;

        let reason = loop {
            if cancel.is_cancelled() {
                break StopReason::Cancelled;
            }
            if options.max_iterations.is_some_and(|max| iterations >= max) {
                break StopReason::IterationLimit;
            }

            iterations += 1;
            let snapshot = self.generate_fleet_data();
            debug!(iteration = iterations, readings = snapshot.len(), "snapshot generated");
            sink.consume(iterations, &snapshot).await;

            if options.max_iterations.is_some_and(|max| iterations >= max) {
                break StopReason::IterationLimit;
            }

            if !options.duration.is_zero() && started.elapsed() >= options.duration {
                break StopReason::DurationElapsed;
            }

            tokio::select! {
                _ = cancel.cancelled() => break StopReason::Cancelled,
                _ = sleep(options.interval) => {}
            }
        };

        let summary = RunSummary {
            iterations,
            reason,
            elapsed: started.elapsed(),
        };
        info!(
            iterations = summary.iterations,
            reason = ?summary.reason,
            "Fleet simulation stopped"
        );
        summary
    }
}
