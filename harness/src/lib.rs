pub mod cli;
pub mod display;

pub use cli::{override_emitter, Cli, Commands, FleetArgs, HarnessError, HarnessResult};
pub use display::{format_reading, format_summary, render_snapshot, ConsoleSink};
