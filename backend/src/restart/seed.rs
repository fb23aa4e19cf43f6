//! Stream seed derivation
//!
//! The production run assigned every particle a stream seed from its id and
//! the point of the run at which it was created. Deriving the same value
//! from the checkpoint is what makes a replay bit-identical.

use crate::core::SimulationContext;
use crate::models::RunMode;

/// Seed the original run assigned to `particle_id`
///
/// - Eigenvalue: `(elapsed + current_generation - 1) * n_particles + id`,
///   where `elapsed = (current_batch - 1) * generations_per_batch`
/// - Fixed source: `id`
///
/// Pure: reads the context snapshot only. Arithmetic wraps at 64 bits like
/// the production run's integer seed.
///
/// # Example
/// ```
/// use particle_restart_core::{derive_particle_seed, RunMode, SimulationContext};
///
/// // 10 generations elapsed before batch 3 (5 per batch), 3rd generation
/// let ctx = SimulationContext::new(3, 5, 3, 1000).unwrap();
/// assert_eq!(derive_particle_seed(RunMode::Eigenvalue, &ctx, 7), 12007);
/// assert_eq!(derive_particle_seed(RunMode::FixedSource, &ctx, 42), 42);
/// ```
pub fn derive_particle_seed(run_mode: RunMode, context: &SimulationContext, particle_id: u64) -> u64 {
    match run_mode {
        RunMode::Eigenvalue => context
            .overall_generation()
            .wrapping_sub(1)
            .wrapping_mul(context.n_particles())
            .wrapping_add(particle_id),
        RunMode::FixedSource => particle_id,
    }
}
