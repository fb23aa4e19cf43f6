//! Particle restart - deterministic single-particle replay
//!
//! Reconstructs the stream seed and particle state that existed when the
//! production run created a particle, then replays its history in
//! isolation.
//!
//! See `driver.rs` for the orchestration.

pub mod driver;
pub mod error;
pub mod reconstruct;
pub mod seed;

pub use driver::{ReplayDriver, ReplayPhase, ReplayReport, RestartSettings};
pub use error::RestartError;
pub use reconstruct::reconstruct_particle;
pub use seed::derive_particle_seed;
