use clap::Parser;
use fleet_harness::cli::{override_emitter, Cli, Commands, FleetArgs, HarnessResult};
use fleet_harness::display::{format_run_summary, separator, ConsoleSink};
use fleet_model::prelude::*;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { fleet, json } => {
            simulate(&fleet, json).await?;
        }
        Commands::Send {
            fleet,
            endpoint,
            timeout,
            quiet,
        } => {
            send(&fleet, endpoint, timeout, quiet).await?;
        }
        Commands::Snapshot { fleet } => {
            snapshot(&fleet)?;
        }
    }

    Ok(())
}

/// Cancels the returned token on the first Ctrl-C.
fn interrupt_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, finishing current iteration");
            trigger.cancel();
        }
    });
    cancel
}

fn print_banner(title: &str, config: &SimulatorConfig) {
    println!("{}", title);
    println!("Monitoring {} vehicles", config.vehicle_count);
    println!("Update interval: {:.1}s", config.interval.as_secs_f64());
    println!("{}", separator());
}

fn print_summary(summary: &RunSummary) {
    println!("{}", format_run_summary(summary));
}

async fn simulate(args: &FleetArgs, json: bool) -> HarnessResult<()> {
    let config = args.resolve()?;
    let mut fleet = FleetSimulator::from_config(&config.simulator);
    let mut sink = ConsoleSink::stdout(json);

    print_banner("Starting vehicle sensor simulation...", &config.simulator);

    let summary = fleet
        .run(
            &RunOptions::from(&config.simulator),
            &mut sink,
            &interrupt_token(),
        )
        .await;

    print_summary(&summary);
    Ok(())
}

async fn send(
    args: &FleetArgs,
    endpoint: Option<String>,
    timeout: Option<f64>,
    quiet: bool,
) -> HarnessResult<()> {
    let mut config = args.resolve()?;
    override_emitter(&mut config, endpoint, timeout)?;

    let emitter = HttpEmitter::new(config.emitter.clone())?;
    let mut fleet = FleetSimulator::from_config(&config.simulator);
    let console = (!quiet).then(|| ConsoleSink::stdout(false));
    let mut sink = (console, EmitterSink::new(emitter));

    print_banner("Starting telemetry transmission...", &config.simulator);
    println!("Target: {}", sink.1.emitter().endpoint());
    println!("{}", separator());

    let summary = fleet
        .run(
            &RunOptions::from(&config.simulator),
            &mut sink,
            &interrupt_token(),
        )
        .await;

    print_summary(&summary);
    let stats = sink.1.stats();
    println!("Delivered: {}, failed: {}", stats.sent, stats.failed);
    if let Some(error) = &stats.last_error {
        println!("Last error: {}", error);
    }

    Ok(())
}

fn snapshot(args: &FleetArgs) -> HarnessResult<()> {
    let config = args.resolve()?;
    let mut fleet = FleetSimulator::from_config(&config.simulator);
    let readings = fleet.generate_fleet_data();
    println!("{}", serde_json::to_string_pretty(&readings)?);
    Ok(())
}
