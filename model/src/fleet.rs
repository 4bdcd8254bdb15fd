use crate::config::SimulatorConfig;
use crate::sensor::VehicleSensorModel;
use crate::types::Reading;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Identifier of the vehicle at zero-based `index`: `VEH-001`, `VEH-002`, ...
pub fn vehicle_id(index: usize) -> String {
    format!("VEH-{:03}", index + 1)
}

/// An ordered, fixed-size fleet of simulated vehicles.
#[derive(Debug, Clone)]
pub struct FleetSimulator {
    vehicles: Vec<VehicleSensorModel>,
}

impl FleetSimulator {
    /// Creates `vehicle_count` vehicles seeded from OS entropy.
    pub fn new(vehicle_count: usize) -> Self {
        Self::from_master_rng(vehicle_count, StdRng::from_entropy())
    }

    /// Creates `vehicle_count` vehicles whose generators all derive from
    /// `seed`. Two fleets built from the same seed evolve identically.
    pub fn with_seed(vehicle_count: usize, seed: u64) -> Self {
        Self::from_master_rng(vehicle_count, StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &SimulatorConfig) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(config.vehicle_count, seed),
            None => Self::new(config.vehicle_count),
        }
    }

    /// Builds a fleet from already constructed vehicles, keeping their order.
    pub fn from_vehicles(vehicles: Vec<VehicleSensorModel>) -> Self {
        Self { vehicles }
    }

    fn from_master_rng(vehicle_count: usize, mut master: StdRng) -> Self {
        let vehicles = (0..vehicle_count)
            .map(|index| {
                let rng = StdRng::seed_from_u64(master.gen());
                VehicleSensorModel::new(vehicle_id(index), rng)
            })
            .collect::<Vec<_>>();

        debug!(
            vehicles = vehicles.len(),
            degraded = vehicles.iter().filter(|v| v.is_degraded()).count(),
            "fleet created"
        );

        Self { vehicles }
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn vehicles(&self) -> &[VehicleSensorModel] {
        &self.vehicles
    }

    pub fn vehicle_ids(&self) -> Vec<&str> {
        self.vehicles.iter().map(|v| v.id()).collect()
    }

    /// Advances every vehicle by one step and returns their readings in
    /// creation order.
    pub fn generate_fleet_data(&mut self) -> Vec<Reading> {
        self.vehicles
            .iter_mut()
            .map(|vehicle| vehicle.generate_reading())
            .collect()
    }

    /// Like [`generate_fleet_data`](Self::generate_fleet_data), but every
    /// reading in the snapshot carries `timestamp`.
    pub fn generate_fleet_data_at(&mut self, timestamp: DateTime<Utc>) -> Vec<Reading> {
        self.vehicles
            .iter_mut()
            .map(|vehicle| vehicle.generate_reading_at(timestamp))
            .collect()
    }
}

impl Default for FleetSimulator {
    fn default() -> Self {
        Self::from_config(&SimulatorConfig::default())
    }
}
