use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use aurora_engine::config::LoggingConfig;
use aurora_engine::{AuroraEngine, AuroraError, EngineConfig, GeographicPoint, SpaceWeatherSample};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "aurora-engine",
    version,
    about = "Aurora intensity verdict from a solar-wind sample",
    allow_negative_numbers = true
)]
struct Cli {
    /// Planetary Kp index (0-9)
    #[arg(long)]
    kp: f64,
    /// IMF Bz in nT (negative = southward)
    #[arg(long)]
    bz: f64,
    /// Total IMF strength Bt in nT
    #[arg(long)]
    bt: f64,
    /// Solar wind speed in km/s
    #[arg(long)]
    speed: f64,
    /// Proton density in particles/cm³
    #[arg(long)]
    density: f64,
    /// Observer latitude in degrees; prints a location report together with --lon
    #[arg(long, requires = "lon")]
    lat: Option<f64>,
    /// Observer longitude in degrees
    #[arg(long, requires = "lat")]
    lon: Option<f64>,
    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<AuroraError>() {
            Some(aurora_err) if aurora_err.is_input_range() => {
                eprintln!("{}", aurora_err.user_message());
                ExitCode::from(2)
            }
            _ => {
                eprintln!("Error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = EngineConfig::load_from_path(cli.config.clone())?;
    init_logging(&config.logging, cli.verbose);
    debug!(?config, "Loaded configuration");

    let engine = AuroraEngine::from_config(&config)?;
    let sample = SpaceWeatherSample::new(cli.kp, cli.bz, cli.bt, cli.speed, cli.density);

    let output = match (cli.lat, cli.lon) {
        (Some(lat), Some(lon)) => {
            let report = engine.evaluate_location(&sample, &GeographicPoint::new(lat, lon))?;
            serde_json::to_string_pretty(&report)
        }
        _ => {
            let verdict = engine.evaluate(&sample)?;
            serde_json::to_string_pretty(&verdict)
        }
    }
    .context("Failed to serialize output")?;

    println!("{output}");
    Ok(())
}

/// Install the global subscriber. Logs go to stderr so stdout stays pure JSON.
fn init_logging(config: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let result = if config.format == "json" {
        tracing::subscriber::set_global_default(
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        tracing::subscriber::set_global_default(
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr)),
        )
    };

    if let Err(err) = result {
        eprintln!("Failed to install log subscriber: {err}");
    }
}
