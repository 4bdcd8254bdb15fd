//! Per-vehicle sensor state model
//!
//! Each [`VehicleSensorModel`] owns its sensor state and its random generator.
//! Every call to [`VehicleSensorModel::generate_reading`] advances a bounded
//! random walk by one step and reports the result. Vehicles flagged with the
//! degradation factor at creation receive an extra one-directional drift on
//! every step, so over time they trend toward overheating, low brake pressure
//! and a weak battery.
//!
//! Quantities are clamped to their bounds after each step. The walk is not
//! reflected or renormalized, so a value pushed against a bound can stay
//! pinned there for several steps.

use crate::types::{HealthStatus, Reading, SensorState};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use std::ops::Range;
use tracing::trace;

/// Probability that a newly created vehicle carries the degradation factor.
pub const DEGRADATION_PROBABILITY: f64 = 0.25;

const BASELINE_ENGINE_TEMP: Range<f64> = 70.0..85.0;
const BASELINE_BRAKE_PRESSURE: Range<f64> = 80.0..100.0;
const BASELINE_BATTERY_VOLTAGE: Range<f64> = 12.4..13.2;

const DRIFT_ENGINE_TEMP: Range<f64> = -2.0..3.0;
const DRIFT_BRAKE_PRESSURE: Range<f64> = -3.0..2.0;
const DRIFT_BATTERY_VOLTAGE: Range<f64> = -0.2..0.1;

// Magnitudes of the extra wear applied to degraded vehicles.
const WEAR_ENGINE_TEMP: Range<f64> = 0.0..1.5;
const WEAR_BRAKE_PRESSURE: Range<f64> = 0.0..1.0;
const WEAR_BATTERY_VOLTAGE: Range<f64> = 0.0..0.05;

/// Simulated sensors of a single vehicle.
#[derive(Debug, Clone)]
pub struct VehicleSensorModel<R = StdRng> {
    id: String,
    state: SensorState,
    degraded: bool,
    rng: R,
}

impl<R: Rng> VehicleSensorModel<R> {
    /// Creates a vehicle with random baselines and a randomly drawn
    /// degradation factor, both taken from `rng`.
    pub fn new(id: impl Into<String>, mut rng: R) -> Self {
        let state = SensorState::new(
            rng.gen_range(BASELINE_ENGINE_TEMP),
            rng.gen_range(BASELINE_BRAKE_PRESSURE),
            rng.gen_range(BASELINE_BATTERY_VOLTAGE),
        );
        let degraded = rng.gen_bool(DEGRADATION_PROBABILITY);

        Self {
            id: id.into(),
            state,
            degraded,
            rng,
        }
    }

    /// Creates a vehicle at an explicit state. The state is clamped into
    /// bounds.
    pub fn with_state(id: impl Into<String>, state: SensorState, degraded: bool, rng: R) -> Self {
        Self {
            id: id.into(),
            state: state.clamped(),
            degraded,
            rng,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SensorState {
        self.state
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Health status of the current state, without advancing it.
    pub fn status(&self) -> HealthStatus {
        self.state.status()
    }

    /// Advances the walk by one step and returns a reading stamped with the
    /// current UTC time.
    pub fn generate_reading(&mut self) -> Reading {
        self.generate_reading_at(Utc::now())
    }

    /// Advances the walk by one step and returns a reading stamped with
    /// `timestamp`.
    pub fn generate_reading_at(&mut self, timestamp: DateTime<Utc>) -> Reading {
        self.step();
        self.current_reading_at(timestamp)
    }

    /// Reports the current state without advancing it.
    pub fn current_reading_at(&self, timestamp: DateTime<Utc>) -> Reading {
        Reading::new(self.id.clone(), self.state, timestamp)
    }

    fn step(&mut self) {
        let mut next = SensorState::new(
            self.state.engine_temp + self.rng.gen_range(DRIFT_ENGINE_TEMP),
            self.state.brake_pressure + self.rng.gen_range(DRIFT_BRAKE_PRESSURE),
            self.state.battery_voltage + self.rng.gen_range(DRIFT_BATTERY_VOLTAGE),
        );

        if self.degraded {
            next.engine_temp += self.rng.gen_range(WEAR_ENGINE_TEMP);
            next.brake_pressure -= self.rng.gen_range(WEAR_BRAKE_PRESSURE);
            next.battery_voltage -= self.rng.gen_range(WEAR_BATTERY_VOLTAGE);
        }

        self.state = next.clamped();
        trace!(vehicle_id = %self.id, state = ?self.state, "sensor step");
    }
}
