use clap::{Args, Parser, Subcommand};
use fleet_model::{ConfigError, FleetConfig, TelemetryError};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("Invalid argument {name}: {message}")]
    InvalidArgument { name: &'static str, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Parser, Debug)]
#[command(name = "fleet-sim")]
#[command(about = "Simulate vehicle fleet sensors and ship telemetry to a collector")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the simulation and print each snapshot to the console
    Simulate {
        #[command(flatten)]
        fleet: FleetArgs,
        /// Also print every snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the simulation and POST each snapshot to a telemetry collector
    Send {
        #[command(flatten)]
        fleet: FleetArgs,
        /// Collector endpoint URL
        #[arg(long)]
        endpoint: Option<String>,
        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<f64>,
        /// Do not print snapshots to the console
        #[arg(short, long)]
        quiet: bool,
    },
    /// Generate a single snapshot and print it as JSON
    Snapshot {
        #[command(flatten)]
        fleet: FleetArgs,
    },
}

/// Options shared by every subcommand. Flags override values from `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct FleetArgs {
    /// TOML config file with [simulator] and [emitter] tables
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Number of vehicles in the fleet
    #[arg(short, long)]
    pub vehicles: Option<usize>,
    /// Seconds between snapshots
    #[arg(short, long)]
    pub interval: Option<f64>,
    /// Total run time in seconds (0 runs until interrupted)
    #[arg(short, long)]
    pub duration: Option<f64>,
    /// Stop after this many snapshots
    #[arg(long)]
    pub max_iterations: Option<u64>,
    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

impl FleetArgs {
    pub fn resolve(&self) -> HarnessResult<FleetConfig> {
        let mut config = match &self.config {
            Some(path) => FleetConfig::load(path)?,
            None => FleetConfig::default(),
        };

        let simulator = &mut config.simulator;
        if let Some(vehicles) = self.vehicles {
            simulator.vehicle_count = vehicles;
        }
        if let Some(interval) = self.interval {
            simulator.interval = seconds("interval", interval)?;
        }
        if let Some(duration) = self.duration {
            simulator.duration = seconds("duration", duration)?;
        }
        if let Some(max_iterations) = self.max_iterations {
            simulator.max_iterations = Some(max_iterations);
        }
        if let Some(seed) = self.seed {
            simulator.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Applies `send` flags on top of a resolved config.
pub fn override_emitter(
    config: &mut FleetConfig,
    endpoint: Option<String>,
    timeout: Option<f64>,
) -> HarnessResult<()> {
    if let Some(endpoint) = endpoint {
        config.emitter.endpoint = endpoint;
    }
    if let Some(timeout) = timeout {
        config.emitter.timeout = seconds("timeout", timeout)?;
    }
    config.validate()?;
    Ok(())
}

pub fn seconds(name: &'static str, value: f64) -> HarnessResult<Duration> {
    Duration::try_from_secs_f64(value).map_err(|e| HarnessError::InvalidArgument {
        name,
        message: e.to_string(),
    })
}
