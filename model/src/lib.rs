pub mod anomaly;
pub mod config;
pub mod emitter;
pub mod fleet;
pub mod http;
pub mod runner;
pub mod sensor;
pub mod sink;
pub mod types;

pub use anomaly::{detect_anomalies, Anomaly, AnomalySeverity};
pub use config::{ConfigError, EmitterConfig, FleetConfig, SimulatorConfig, DEFAULT_ENDPOINT};
pub use emitter::{EmitReceipt, TelemetryEmitter, TelemetryError, TelemetryResult};
pub use fleet::{vehicle_id, FleetSimulator};
pub use http::HttpEmitter;
pub use runner::{RunOptions, RunSummary, StopReason};
pub use sensor::{VehicleSensorModel, DEGRADATION_PROBABILITY};
pub use sink::{DeliveryStats, EmitterSink, SnapshotSink};
pub use types::{FleetSummary, HealthStatus, Reading, SensorState};

pub use tokio_util::sync::CancellationToken;

pub mod prelude {
    pub use crate::anomaly::*;
    pub use crate::config::*;
    pub use crate::emitter::*;
    pub use crate::fleet::*;
    pub use crate::http::*;
    pub use crate::runner::*;
    pub use crate::sensor::*;
    pub use crate::sink::*;
    pub use crate::types::*;

    pub use tokio_util::sync::CancellationToken;
}
