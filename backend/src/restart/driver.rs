//! Replay driver
//!
//! Orchestrates a single-particle replay:
//!
//! ```text
//! 1. Raise verbosity to maximum
//! 2. Load the checkpoint and reconstruct the particle
//! 3. Clear all tallies
//! 4. Mark the particle for track output if requested
//! 5. Seed the pseudorandom stream
//! 6. Transport until a terminal fate
//! 7. Report the terminal particle
//! ```
//!
//! Phases only move forward: `Idle → Loaded → Seeded → Transporting →
//! Reported`. A failure at any stage moves to `Aborted` and no later stage
//! runs. A driver replays exactly one particle.
//!
//! # Example
//!
//! ```rust,ignore
//! use particle_restart_core::restart::{ReplayDriver, RestartSettings};
//!
//! let mut driver = ReplayDriver::new(
//!     RestartSettings::default(),
//!     EnergyTreatment::ContinuousEnergy,
//!     HomogeneousSphere::new(10.0, 0.5, 0.1)?,
//!     PrnStream::default(),
//!     TallyAccumulator::new(),
//!     ConsoleReport::stdout(),
//! );
//! let report = driver.run(Path::new("particle_3_7.json"))?;
//! println!("seed {} -> {}", report.seed, report.terminal);
//! ```

use crate::checkpoint::load_checkpoint;
use crate::core::Verbosity;
use crate::energy::EnergyTreatment;
use crate::models::{Particle, RunMode};
use crate::output::{write_track_file, TrajectoryOutput};
use crate::restart::{derive_particle_seed, reconstruct_particle, RestartError};
use crate::rng::RandomStream;
use crate::tally::TallyStore;
use crate::transport::{TerminalState, TransportEngine};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Replay configuration
#[derive(Debug, Clone)]
pub struct RestartSettings {
    /// Record and write the per-event track of the particle
    pub write_track: bool,

    /// Directory receiving track files
    pub track_dir: PathBuf,
}

impl Default for RestartSettings {
    fn default() -> Self {
        Self {
            write_track: false,
            track_dir: PathBuf::from("."),
        }
    }
}

/// Stage of a replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReplayPhase {
    Idle,
    Loaded,
    Seeded,
    Transporting,
    Reported,
    Aborted,
}

impl fmt::Display for ReplayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReplayPhase::Idle => "idle",
            ReplayPhase::Loaded => "loaded",
            ReplayPhase::Seeded => "seeded",
            ReplayPhase::Transporting => "transporting",
            ReplayPhase::Reported => "reported",
            ReplayPhase::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// Outcome of a completed replay
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub checkpoint: PathBuf,
    /// SHA-256 of the checkpoint document
    pub checkpoint_digest: String,
    pub run_mode: RunMode,
    /// Stream seed the particle was replayed with
    pub seed: u64,
    pub terminal: TerminalState,
    /// Particle state after transport
    pub particle: Particle,
    pub track_file: Option<PathBuf>,
}

/// Single-particle replay driver
pub struct ReplayDriver<E, R, T, O>
where
    E: TransportEngine,
    R: RandomStream,
    T: TallyStore,
    O: TrajectoryOutput,
{
    settings: RestartSettings,
    verbosity: Verbosity,
    energy: EnergyTreatment,
    engine: E,
    stream: R,
    tallies: T,
    output: O,
    phase: ReplayPhase,
}

impl<E, R, T, O> ReplayDriver<E, R, T, O>
where
    E: TransportEngine,
    R: RandomStream,
    T: TallyStore,
    O: TrajectoryOutput,
{
    pub fn new(
        settings: RestartSettings,
        energy: EnergyTreatment,
        engine: E,
        stream: R,
        tallies: T,
        output: O,
    ) -> Self {
        Self {
            settings,
            verbosity: Verbosity::default(),
            energy,
            engine,
            stream,
            tallies,
            output,
            phase: ReplayPhase::Idle,
        }
    }

    pub fn phase(&self) -> ReplayPhase {
        self.phase
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn stream(&self) -> &R {
        &self.stream
    }

    pub fn tallies(&self) -> &T {
        &self.tallies
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Replay the particle stored in `checkpoint`
    ///
    /// # Errors
    ///
    /// Any failure aborts the replay and is returned unchanged; the driver
    /// is left in `ReplayPhase::Aborted`. Calling `run` on a driver that is
    /// not idle returns `RestartError::AlreadyRun`.
    pub fn run(&mut self, checkpoint: &Path) -> Result<ReplayReport, RestartError> {
        if self.phase != ReplayPhase::Idle {
            return Err(RestartError::AlreadyRun(self.phase.to_string()));
        }

        let result = self.execute(checkpoint);
        if let Err(ref e) = result {
            error!(phase = %self.phase, checkpoint = %checkpoint.display(), "particle replay aborted: {}", e);
            self.phase = ReplayPhase::Aborted;
        }
        result
    }

    fn execute(&mut self, checkpoint: &Path) -> Result<ReplayReport, RestartError> {
        // This is a debugging run
        self.verbosity.raise_to_max();

        self.verbosity.message(
            5,
            format!("Loading particle restart file {}...", checkpoint.display()),
        );
        let record = load_checkpoint(checkpoint)?;
        let mut particle = reconstruct_particle(&record, &self.energy)?;
        self.enter(ReplayPhase::Loaded);

        // Only tracking errors, not scoring
        self.tallies.clear();

        if self.settings.write_track {
            particle.write_track = true;
        }

        let seed = derive_particle_seed(record.run_mode, &record.context, record.particle_id);
        self.stream.set_stream_seed(seed);
        self.enter(ReplayPhase::Seeded);
        info!(particle_id = particle.id, run_mode = %record.run_mode, seed, "stream seeded");

        self.verbosity
            .message(9, format!("Simulating Particle {}", particle.id));
        self.enter(ReplayPhase::Transporting);
        let terminal = self
            .engine
            .transport(&mut particle, &mut self.stream, &mut self.tallies)?;

        let track_file = if particle.write_track {
            Some(write_track_file(
                &self.settings.track_dir,
                record.context.current_batch(),
                &particle,
            )?)
        } else {
            None
        };

        self.output.print_particle(&particle)?;
        self.enter(ReplayPhase::Reported);
        info!(particle_id = particle.id, %terminal, n_event = particle.n_event, "particle replay finished");

        Ok(ReplayReport {
            checkpoint: checkpoint.to_path_buf(),
            checkpoint_digest: record.digest,
            run_mode: record.run_mode,
            seed,
            terminal,
            particle,
            track_file,
        })
    }

    fn enter(&mut self, next: ReplayPhase) {
        debug_assert!(next > self.phase, "replay phases only move forward");
        debug!(from = %self.phase, to = %next, "replay phase");
        self.phase = next;
    }
}
