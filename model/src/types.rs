use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::RangeInclusive;

pub const ENGINE_TEMP_RANGE: RangeInclusive<f64> = 60.0..=120.0;
pub const BRAKE_PRESSURE_RANGE: RangeInclusive<f64> = 40.0..=110.0;
pub const BATTERY_VOLTAGE_RANGE: RangeInclusive<f64> = 10.5..=14.5;

pub const ENGINE_OVERHEAT_THRESHOLD: f64 = 100.0;
pub const BRAKE_PRESSURE_LOW_THRESHOLD: f64 = 60.0;
pub const BATTERY_WEAK_THRESHOLD: f64 = 11.8;

/// Derived three-level health classification of a vehicle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Classifies by the number of violated thresholds: none is healthy,
    /// exactly one is a warning, two or more is critical.
    pub fn classify(engine_temp: f64, brake_pressure: f64, battery_voltage: f64) -> Self {
        let violations = [
            engine_temp > ENGINE_OVERHEAT_THRESHOLD,
            brake_pressure < BRAKE_PRESSURE_LOW_THRESHOLD,
            battery_voltage < BATTERY_WEAK_THRESHOLD,
        ]
        .iter()
        .filter(|violated| **violated)
        .count();

        match violations {
            0 => Self::Healthy,
            1 => Self::Warning,
            _ => Self::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Continuous sensor state of one vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorState {
    pub engine_temp: f64,
    pub brake_pressure: f64,
    pub battery_voltage: f64,
}

impl SensorState {
    pub fn new(engine_temp: f64, brake_pressure: f64, battery_voltage: f64) -> Self {
        Self {
            engine_temp,
            brake_pressure,
            battery_voltage,
        }
    }

    /// Pins every quantity into its closed range. Out-of-range values are
    /// moved to the nearest bound, never rejected.
    pub fn clamped(self) -> Self {
        Self {
            engine_temp: clamp_to(self.engine_temp, &ENGINE_TEMP_RANGE),
            brake_pressure: clamp_to(self.brake_pressure, &BRAKE_PRESSURE_RANGE),
            battery_voltage: clamp_to(self.battery_voltage, &BATTERY_VOLTAGE_RANGE),
        }
    }

    pub fn rounded(self) -> Self {
        Self {
            engine_temp: round2(self.engine_temp),
            brake_pressure: round2(self.brake_pressure),
            battery_voltage: round2(self.battery_voltage),
        }
    }

    pub fn status(&self) -> HealthStatus {
        HealthStatus::classify(self.engine_temp, self.brake_pressure, self.battery_voltage)
    }
}

fn clamp_to(value: f64, range: &RangeInclusive<f64>) -> f64 {
    value.clamp(*range.start(), *range.end())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One vehicle's reading, the unit of exchange with telemetry collectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub vehicle_id: String,
    pub engine_temp: f64,
    pub brake_pressure: f64,
    pub battery_voltage: f64,
    #[serde(with = "micros_utc")]
    pub timestamp: DateTime<Utc>,
    pub status: HealthStatus,
}

impl Reading {
    /// Builds the published record for `state`. Status is classified from the
    /// unrounded state; only the reported quantities are rounded. The
    /// timestamp is truncated to microseconds, the precision of the wire form.
    pub fn new(vehicle_id: impl Into<String>, state: SensorState, timestamp: DateTime<Utc>) -> Self {
        let rounded = state.rounded();
        Self {
            vehicle_id: vehicle_id.into(),
            engine_temp: rounded.engine_temp,
            brake_pressure: rounded.brake_pressure,
            battery_voltage: rounded.battery_voltage,
            timestamp: timestamp.trunc_subsecs(6),
            status: state.status(),
        }
    }

    pub fn state(&self) -> SensorState {
        SensorState::new(self.engine_temp, self.brake_pressure, self.battery_voltage)
    }
}

// RFC 3339 with microsecond precision and a `Z` suffix,
// e.g. `2026-01-01T00:00:00.123456Z`.
mod micros_utc {
    use super::*;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Aggregate status counts over one fleet snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub total: usize,
    pub healthy: usize,
    pub warning: usize,
    pub critical: usize,
}

impl FleetSummary {
    pub fn from_snapshot(snapshot: &[Reading]) -> Self {
        snapshot.iter().fold(Self::default(), |mut summary, reading| {
            summary.total += 1;
            match reading.status {
                HealthStatus::Healthy => summary.healthy += 1,
                HealthStatus::Warning => summary.warning += 1,
                HealthStatus::Critical => summary.critical += 1,
            }
            summary
        })
    }
}
