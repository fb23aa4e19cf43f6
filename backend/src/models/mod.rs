//! Domain models for particle replay

pub mod particle;
pub mod run_mode;

// Re-exports
pub use particle::{Particle, ParticleType, SourceSite, TrackPoint, Vec3};
pub use run_mode::{RunMode, UnknownRunModeError};
