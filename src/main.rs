use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use diffdrive_odometry::config::{DEFAULT_SAMPLING_INTERVAL_S, DEFAULT_TICK_POLICY};
use diffdrive_odometry::input::RunInput;
use diffdrive_odometry::runtime::{self, RunOptions, RuntimeError};
use diffdrive_odometry::scheduler::TickPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Dead-reckoning pose estimation for a differential-drive vehicle
///
/// Reads eight numbers (pulses/rev, pulses/s, wheel radius, axle width,
/// x, y, yaw in degrees, elapsed time) and prints the integrated trajectory.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Read parameters from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Seconds between integration steps
    #[arg(short, long, default_value_t = DEFAULT_SAMPLING_INTERVAL_S)]
    sampling_interval: f64,

    /// Behaviour when the loop wakes up late
    #[arg(short, long, value_enum, default_value_t = DEFAULT_TICK_POLICY)]
    policy: TickPolicy,

    /// Run on virtual time instead of waiting in real time
    #[arg(long)]
    simulated: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

async fn run(args: Args) -> Result<(), RuntimeError> {
    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let input = RunInput::parse(&text)?;

    let options = RunOptions {
        sampling_interval: args.sampling_interval,
        policy: args.policy,
        simulated: args.simulated,
    };
    let report = runtime::run(&input, &options).await?;

    match args.format {
        OutputFormat::Text => println!("{}", report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Setup logging on stderr (set RUST_LOG=debug for per-tick output)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
