//! Simulation context captured at the restart point
//!
//! An eigenvalue run is organized in batches, each holding a fixed number of
//! generations. The original run assigned every particle a stream position
//! derived from the global generation counter at creation time, so the
//! replay needs exactly the counters that were live at that instant.
//!
//! The context is a plain value handed to seed derivation and state
//! reconstruction. Nothing here reads process-wide state.

use crate::checkpoint::FormatError;
use serde::{Deserialize, Serialize};

/// Batch/generation bookkeeping at the instant the particle was created
///
/// All counters are 1-based, as written by the production run.
///
/// # Example
/// ```
/// use particle_restart_core::SimulationContext;
///
/// // Batch 3 of a run with 5 generations per batch, 2nd generation
/// let ctx = SimulationContext::new(3, 5, 2, 1000).unwrap();
/// assert_eq!(ctx.generations_elapsed_before_restart(), 10);
/// assert_eq!(ctx.overall_generation(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationContext {
    /// Batch index at the restart point
    current_batch: u64,
    /// Number of generations in one batch
    generations_per_batch: u64,
    /// Generation index within the current batch
    current_generation: u64,
    /// Particles simulated per generation
    n_particles: u64,
}

impl SimulationContext {
    /// Create a validated context
    ///
    /// # Errors
    /// Returns `FormatError::InvalidValue` if any counter is zero or the
    /// generation index exceeds the number of generations per batch.
    pub fn new(
        current_batch: u64,
        generations_per_batch: u64,
        current_generation: u64,
        n_particles: u64,
    ) -> Result<Self, FormatError> {
        for (field, value) in [
            ("current_batch", current_batch),
            ("generations_per_batch", generations_per_batch),
            ("current_generation", current_generation),
            ("n_particles", n_particles),
        ] {
            if value == 0 {
                return Err(FormatError::InvalidValue {
                    field: field.to_string(),
                    reason: "must be a positive integer".to_string(),
                });
            }
        }

        if current_generation > generations_per_batch {
            return Err(FormatError::InvalidValue {
                field: "current_generation".to_string(),
                reason: format!(
                    "generation {} exceeds generations_per_batch {}",
                    current_generation, generations_per_batch
                ),
            });
        }

        Ok(Self {
            current_batch,
            generations_per_batch,
            current_generation,
            n_particles,
        })
    }

    pub fn current_batch(&self) -> u64 {
        self.current_batch
    }

    pub fn generations_per_batch(&self) -> u64 {
        self.generations_per_batch
    }

    pub fn current_generation(&self) -> u64 {
        self.current_generation
    }

    pub fn n_particles(&self) -> u64 {
        self.n_particles
    }

    /// Generations fully completed before the restart batch began
    ///
    /// `(current_batch - 1) * generations_per_batch`
    pub fn generations_elapsed_before_restart(&self) -> u64 {
        (self.current_batch - 1).wrapping_mul(self.generations_per_batch)
    }

    /// Global 1-based generation counter of the restart point
    pub fn overall_generation(&self) -> u64 {
        self.generations_elapsed_before_restart()
            .wrapping_add(self.current_generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_counter_rejected() {
        let err = SimulationContext::new(0, 1, 1, 100).unwrap_err();
        assert!(matches!(
            err,
            FormatError::InvalidValue { ref field, .. } if field == "current_batch"
        ));

        let err = SimulationContext::new(1, 1, 1, 0).unwrap_err();
        assert!(matches!(
            err,
            FormatError::InvalidValue { ref field, .. } if field == "n_particles"
        ));
    }

    #[test]
    fn test_generation_beyond_batch_rejected() {
        let err = SimulationContext::new(2, 3, 4, 100).unwrap_err();
        assert!(matches!(
            err,
            FormatError::InvalidValue { ref field, .. } if field == "current_generation"
        ));
    }

    #[test]
    fn test_first_batch_has_no_elapsed_generations() {
        let ctx = SimulationContext::new(1, 4, 1, 500).unwrap();
        assert_eq!(ctx.generations_elapsed_before_restart(), 0);
        assert_eq!(ctx.overall_generation(), 1);
    }
}
