use crate::emitter::TelemetryEmitter;
use crate::types::Reading;
use async_trait::async_trait;
use tracing::{info, warn};

/// Receives every snapshot produced by the run loop.
///
/// Sinks deal with their own failures; the loop keeps going regardless of
/// what happens inside `consume`.
#[async_trait]
pub trait SnapshotSink: Send {
    async fn consume(&mut self, iteration: u64, snapshot: &[Reading]);
}

#[async_trait]
impl SnapshotSink for Vec<Box<dyn SnapshotSink>> {
    async fn consume(&mut self, iteration: u64, snapshot: &[Reading]) {
        for sink in self.iter_mut() {
            sink.consume(iteration, snapshot).await;
        }
    }
}

#[async_trait]
impl<A: SnapshotSink, B: SnapshotSink> SnapshotSink for (A, B) {
    async fn consume(&mut self, iteration: u64, snapshot: &[Reading]) {
        self.0.consume(iteration, snapshot).await;
        self.1.consume(iteration, snapshot).await;
    }
}

/// `None` discards snapshots.
#[async_trait]
impl<S: SnapshotSink> SnapshotSink for Option<S> {
    async fn consume(&mut self, iteration: u64, snapshot: &[Reading]) {
        if let Some(sink) = self {
            sink.consume(iteration, snapshot).await;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    pub sent: u64,
    pub failed: u64,
    pub last_error: Option<String>,
}

/// Forwards snapshots to a [`TelemetryEmitter`]. A failed delivery is logged
/// and dropped; the next snapshot supersedes it.
pub struct EmitterSink<E> {
    emitter: E,
    stats: DeliveryStats,
}

impl<E: TelemetryEmitter> EmitterSink<E> {
    pub fn new(emitter: E) -> Self {
        Self {
            emitter,
            stats: DeliveryStats::default(),
        }
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    pub fn stats(&self) -> &DeliveryStats {
        &self.stats
    }
}

#[async_trait]
impl<E: TelemetryEmitter> SnapshotSink for EmitterSink<E> {
    async fn consume(&mut self, iteration: u64, snapshot: &[Reading]) {
        match self.emitter.emit(snapshot).await {
            Ok(receipt) => {
                self.stats.sent += 1;
                info!(
                    iteration,
                    emitter = self.emitter.emitter_name(),
                    status = receipt.status,
                    "Sent {} readings",
                    receipt.readings
                );
            }
            Err(e) => {
                self.stats.failed += 1;
                warn!(
                    iteration,
                    emitter = self.emitter.emitter_name(),
                    "Telemetry delivery failed: {}",
                    e
                );
                self.stats.last_error = Some(e.to_string());
            }
        }
    }
}
