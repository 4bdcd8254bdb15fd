use crate::types::Reading;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Collector unreachable: {message}")]
    Unreachable { message: String },

    #[error("Collector rejected snapshot with status {status}")]
    Rejected { status: u16 },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Acknowledgement of a delivered snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitReceipt {
    pub readings: usize,
    pub status: u16,
}

/// Delivers fleet snapshots to a remote collector.
#[async_trait]
pub trait TelemetryEmitter: Send + Sync {
    async fn emit(&self, snapshot: &[Reading]) -> TelemetryResult<EmitReceipt>;

    fn emitter_name(&self) -> &'static str;
}
