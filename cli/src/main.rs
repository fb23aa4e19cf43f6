//! Particle Restart CLI
//!
//! Replays a single particle history from its restart file.
//!
//! # Example
//!
//! ```bash
//! # Replay in the default sphere model
//! particle-restart particle_12_7.json
//!
//! # Multigroup replay with a model file, writing the particle track
//! particle-restart particle_12_7.json --model model.toml --multigroup --track
//! ```

mod config;

use anyhow::Result;
use clap::Parser;
use config::ModelConfig;
use particle_restart_core::core::Verbosity;
use particle_restart_core::output::ConsoleReport;
use particle_restart_core::rng::DEFAULT_MASTER_SEED;
use particle_restart_core::{PrnStream, ReplayDriver, RestartSettings, TallyAccumulator};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Particle Restart
///
/// Reconstructs the state and random number stream of one particle from a
/// production run and replays its history in isolation.
#[derive(Parser, Debug)]
#[command(name = "particle-restart")]
#[command(version, about, long_about = None)]
struct Args {
    /// Particle restart file written by the production run
    checkpoint: PathBuf,

    /// TOML model file (sphere material, energy groups)
    #[arg(short = 'm', long)]
    model: Option<PathBuf>,

    /// Interpret the stored energy as a multigroup group index
    #[arg(long)]
    multigroup: bool,

    /// Write the particle track
    #[arg(long)]
    track: bool,

    /// Directory receiving the track file
    #[arg(long, default_value = ".")]
    track_dir: PathBuf,

    /// Master seed of the production run
    #[arg(long, default_value_t = DEFAULT_MASTER_SEED)]
    seed: u64,
}

/// Default log filter: library detail at the replay verbosity
fn default_filter() -> EnvFilter {
    EnvFilter::new(format!(
        "warn,particle_restart_core={}",
        Verbosity::max().tracing_level()
    ))
}

fn main() -> Result<()> {
    // Logs go to stderr, the particle report to stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();

    let model = match &args.model {
        Some(path) => ModelConfig::load(path)?,
        None => ModelConfig::default(),
    };
    let energy = model.energy_treatment(args.multigroup)?;
    let engine = model.engine()?;

    info!(
        checkpoint = %args.checkpoint.display(),
        master_seed = args.seed,
        multigroup = args.multigroup,
        track = args.track,
        "Starting particle replay"
    );

    let settings = RestartSettings {
        write_track: args.track,
        track_dir: args.track_dir.clone(),
    };
    let mut driver = ReplayDriver::new(
        settings,
        energy,
        engine,
        PrnStream::new(args.seed),
        TallyAccumulator::new(),
        ConsoleReport::stdout(),
    );

    let report = driver.run(&args.checkpoint)?;

    println!();
    println!(" Run mode:          {}", report.run_mode);
    println!(" Stream seed:       {}", report.seed);
    println!(" Fate:              {}", report.terminal);
    println!(" Checkpoint SHA256: {}", report.checkpoint_digest);
    if let Some(track) = &report.track_file {
        println!(" Track file:        {}", track.display());
    }

    Ok(())
}
