//! Graded anomaly rules applied to individual readings.
//!
//! Unlike [`HealthStatus`](crate::types::HealthStatus), which only counts hard
//! threshold violations, these rules also flag values approaching a threshold.

use crate::types::{
    Reading, BATTERY_WEAK_THRESHOLD, BRAKE_PRESSURE_LOW_THRESHOLD, ENGINE_OVERHEAT_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use std::fmt;

const ENGINE_TEMP_HIGH_THRESHOLD: f64 = 95.0;
const BRAKE_PRESSURE_SOFT_THRESHOLD: f64 = 70.0;
const BATTERY_SOFT_THRESHOLD: f64 = 12.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Anomaly {
    EngineOverheating,
    EngineTempHigh,
    BrakePressureCritical,
    BrakePressureLow,
    BatteryCritical,
    BatteryWeak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AnomalySeverity {
    Elevated,
    Critical,
}

impl Anomaly {
    pub fn severity(&self) -> AnomalySeverity {
        match self {
            Self::EngineOverheating | Self::BrakePressureCritical | Self::BatteryCritical => {
                AnomalySeverity::Critical
            }
            Self::EngineTempHigh | Self::BrakePressureLow | Self::BatteryWeak => {
                AnomalySeverity::Elevated
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EngineOverheating => "engine_overheating",
            Self::EngineTempHigh => "engine_temp_high",
            Self::BrakePressureCritical => "brake_pressure_critical",
            Self::BrakePressureLow => "brake_pressure_low",
            Self::BatteryCritical => "battery_critical",
            Self::BatteryWeak => "battery_weak",
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// At most one anomaly per sensor, ordered engine, brake, battery.
pub fn detect_anomalies(reading: &Reading) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    if reading.engine_temp > ENGINE_OVERHEAT_THRESHOLD {
        anomalies.push(Anomaly::EngineOverheating);
    } else if reading.engine_temp > ENGINE_TEMP_HIGH_THRESHOLD {
        anomalies.push(Anomaly::EngineTempHigh);
    }

    if reading.brake_pressure < BRAKE_PRESSURE_LOW_THRESHOLD {
        anomalies.push(Anomaly::BrakePressureCritical);
    } else if reading.brake_pressure < BRAKE_PRESSURE_SOFT_THRESHOLD {
        anomalies.push(Anomaly::BrakePressureLow);
    }

    if reading.battery_voltage < BATTERY_WEAK_THRESHOLD {
        anomalies.push(Anomaly::BatteryCritical);
    } else if reading.battery_voltage < BATTERY_SOFT_THRESHOLD {
        anomalies.push(Anomaly::BatteryWeak);
    }

    anomalies
}
