//! Particle state reconstruction
//!
//! Maps checkpoint attributes onto a working particle. The stored energy is
//! read as a raw energy or as a group index, depending on the run's energy
//! treatment, never both.

use crate::checkpoint::{CheckpointRecord, FormatError};
use crate::energy::EnergyTreatment;
use crate::models::Particle;
use crate::restart::RestartError;

/// Build the particle described by `record`
///
/// In multigroup mode the working energy is the tabulated average of the
/// stored group. Every shadow "last" field equals its current field on
/// return, so downstream deltas start at zero.
///
/// # Errors
///
/// * `RestartError::Format` - multigroup energy is not a non-negative integer
/// * `RestartError::EnergyGroupOutOfRange` - group not in the energy table
pub fn reconstruct_particle(
    record: &CheckpointRecord,
    treatment: &EnergyTreatment,
) -> Result<Particle, RestartError> {
    let (energy, group) = match treatment {
        EnergyTreatment::ContinuousEnergy => (record.energy, 0),
        EnergyTreatment::Multigroup(table) => {
            let group = group_index(record.energy)?;
            let energy = table.energy_bin_average(group).ok_or(
                RestartError::EnergyGroupOutOfRange {
                    group,
                    n_groups: table.num_groups(),
                },
            )?;
            (energy, group)
        }
    };

    // `Particle::new` primes the shadow fields from the values above
    Ok(Particle::new(
        record.particle_id,
        record.particle_type,
        record.weight,
        energy,
        group,
        record.position,
        record.direction,
    ))
}

/// Interpret a stored energy value as a group index
fn group_index(value: f64) -> Result<usize, FormatError> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < usize::MAX as f64 {
        Ok(value as usize)
    } else {
        Err(FormatError::InvalidValue {
            field: "energy".to_string(),
            reason: format!("{} is not a valid energy group index", value),
        })
    }
}
