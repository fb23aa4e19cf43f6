//! Tests for stream seed derivation
//!
//! CRITICAL: A replay is only useful if it reproduces the production seed
//! exactly.

use particle_restart_core::{derive_particle_seed, RunMode, SimulationContext};
use proptest::prelude::*;

#[test]
fn test_fixed_source_seed_is_particle_id() {
    let ctx = SimulationContext::new(17, 4, 2, 50_000).unwrap();
    assert_eq!(derive_particle_seed(RunMode::FixedSource, &ctx, 42), 42);
}

#[test]
fn test_eigenvalue_seed_worked_example() {
    // 10 generations elapsed before the restart batch, 3rd generation
    // of that batch, 1000 particles per generation, particle 7
    let ctx = SimulationContext::new(3, 5, 3, 1000).unwrap();
    assert_eq!(ctx.generations_elapsed_before_restart(), 10);
    assert_eq!(derive_particle_seed(RunMode::Eigenvalue, &ctx, 7), 12007);
}

#[test]
fn test_eigenvalue_single_generation_batches() {
    // One generation per batch: batch 11 has 10 batches before it
    let ctx = SimulationContext::new(11, 1, 1, 1000).unwrap();
    assert_eq!(derive_particle_seed(RunMode::Eigenvalue, &ctx, 7), 10_007);
}

#[test]
fn test_eigenvalue_seeds_unique_across_generations() {
    let n = 20;
    let mut seen = std::collections::HashSet::new();
    for batch in 1..=4 {
        for generation in 1..=3 {
            let ctx = SimulationContext::new(batch, 3, generation, n).unwrap();
            for id in 1..=n {
                assert!(
                    seen.insert(derive_particle_seed(RunMode::Eigenvalue, &ctx, id)),
                    "duplicate seed at batch {} generation {} id {}",
                    batch,
                    generation,
                    id
                );
            }
        }
    }
    assert_eq!(seen.len(), 4 * 3 * 20);
}

proptest! {
    #[test]
    fn prop_seed_derivation_is_deterministic(
        batch in 1u64..10_000,
        per_batch in 1u64..50,
        generation_offset in 0u64..50,
        n_particles in 1u64..10_000_000,
        id in 1u64..10_000_000,
    ) {
        let generation = 1 + generation_offset % per_batch;
        let ctx = SimulationContext::new(batch, per_batch, generation, n_particles).unwrap();
        let same = SimulationContext::new(batch, per_batch, generation, n_particles).unwrap();
        for mode in [RunMode::Eigenvalue, RunMode::FixedSource] {
            prop_assert_eq!(
                derive_particle_seed(mode, &ctx, id),
                derive_particle_seed(mode, &same, id)
            );
        }
    }

    #[test]
    fn prop_fixed_source_independent_of_context(
        batch in 1u64..1000,
        n_particles in 1u64..1_000_000,
        id in 1u64..u64::MAX,
    ) {
        let ctx = SimulationContext::new(batch, 1, 1, n_particles).unwrap();
        prop_assert_eq!(derive_particle_seed(RunMode::FixedSource, &ctx, id), id);
    }

    #[test]
    fn prop_eigenvalue_matches_closed_form(
        batch in 1u64..1000,
        per_batch in 1u64..20,
        generation_offset in 0u64..20,
        n_particles in 1u64..100_000,
        id in 1u64..100_000,
    ) {
        let generation = 1 + generation_offset % per_batch;
        let ctx = SimulationContext::new(batch, per_batch, generation, n_particles).unwrap();
        let elapsed = (batch - 1) * per_batch;
        prop_assert_eq!(
            derive_particle_seed(RunMode::Eigenvalue, &ctx, id),
            (elapsed + generation - 1) * n_particles + id
        );
    }
}
