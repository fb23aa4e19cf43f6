//! Particle Restart Core - Rust Engine
//!
//! Deterministic single-particle restart and replay for Monte Carlo particle
//! transport.
//!
//! # Architecture
//!
//! - **core**: Restart context (batch/generation counters) and verbosity
//! - **models**: Domain types (Particle, RunMode)
//! - **checkpoint**: Per-particle restart files (load, write, digest)
//! - **restart**: Seed derivation, state reconstruction, replay driver
//! - **rng**: Multi-stream LCG with skip-ahead
//! - **energy**: Continuous-energy / multigroup treatment
//! - **tally**: Tally store
//! - **transport**: Transport engine trait and reference sphere engine
//! - **output**: Particle report and track files
//!
//! # Critical Invariants
//!
//! 1. The replay seed is bit-identical to the one the production run assigned
//! 2. A malformed checkpoint never yields a partially-built particle
//! 3. All randomness is deterministic (seeded stream)

// Module declarations
pub mod checkpoint;
pub mod core;
pub mod energy;
pub mod models;
pub mod output;
pub mod restart;
pub mod rng;
pub mod tally;
pub mod transport;

// Re-exports for convenience
pub use checkpoint::{load_checkpoint, write_checkpoint, CheckpointRecord, FormatError};
pub use crate::core::SimulationContext;
pub use energy::{EnergyTable, EnergyTreatment, MultigroupEnergyTable};
pub use models::{Particle, ParticleType, RunMode, SourceSite, UnknownRunModeError};
pub use restart::{
    derive_particle_seed, reconstruct_particle, ReplayDriver, ReplayPhase, ReplayReport,
    RestartError, RestartSettings,
};
pub use rng::{PrnStream, RandomStream};
pub use tally::{TallyAccumulator, TallyStore};
pub use transport::{TerminalState, TransportEngine, TransportError};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn particle_restart_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(ffi::derive_seed, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::read_checkpoint, m)?)?;
    Ok(())
}
