//! Energy treatment: continuous energy or multigroup
//!
//! In multigroup mode a particle carries a group index and its working
//! energy is the tabulated average of that group. Group 0 is the highest
//! energy group; boundaries are stored in descending order.

use thiserror::Error;

/// Lookup of tabulated group-average energies
pub trait EnergyTable {
    /// Average energy (eV) of `group`, or `None` if the group does not exist
    fn energy_bin_average(&self, group: usize) -> Option<f64>;

    fn num_groups(&self) -> usize;
}

/// Errors building a multigroup energy table
#[derive(Debug, Error, PartialEq)]
pub enum EnergyTableError {
    #[error("Energy group structure needs at least two boundaries, got {0}")]
    TooFewBoundaries(usize),

    #[error("Energy boundary {index} is not a finite non-negative value: {value}")]
    InvalidBoundary { index: usize, value: f64 },

    #[error("Energy boundaries must be strictly descending (index {index})")]
    NotDescending { index: usize },

    #[error("Energy group structure has no groups")]
    Empty,
}

/// How stored checkpoint energies are interpreted
///
/// Exactly one interpretation applies to a run; a multigroup run always
/// carries the table needed to resolve group indices.
pub enum EnergyTreatment {
    /// Stored value is the energy in eV
    ContinuousEnergy,
    /// Stored value is a group index resolved through the table
    Multigroup(Box<dyn EnergyTable>),
}

impl EnergyTreatment {
    pub fn is_multigroup(&self) -> bool {
        matches!(self, EnergyTreatment::Multigroup(_))
    }
}

impl std::fmt::Debug for EnergyTreatment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnergyTreatment::ContinuousEnergy => write!(f, "ContinuousEnergy"),
            EnergyTreatment::Multigroup(table) => {
                write!(f, "Multigroup({} groups)", table.num_groups())
            }
        }
    }
}

/// Group structure with precomputed bin averages
///
/// # Example
/// ```
/// use particle_restart_core::energy::{EnergyTable, MultigroupEnergyTable};
///
/// let table = MultigroupEnergyTable::from_group_boundaries(vec![20.0e6, 1.0e6, 0.0]).unwrap();
/// assert_eq!(table.num_groups(), 2);
/// assert_eq!(table.energy_bin_average(0), Some(10.5e6));
/// assert_eq!(table.energy_bin_average(1), Some(0.5e6));
/// assert_eq!(table.energy_bin_average(2), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MultigroupEnergyTable {
    averages: Vec<f64>,
}

impl MultigroupEnergyTable {
    /// Build from descending group boundaries; average is the bin midpoint
    pub fn from_group_boundaries(boundaries: Vec<f64>) -> Result<Self, EnergyTableError> {
        if boundaries.len() < 2 {
            return Err(EnergyTableError::TooFewBoundaries(boundaries.len()));
        }
        for (index, &value) in boundaries.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(EnergyTableError::InvalidBoundary { index, value });
            }
        }
        for (index, pair) in boundaries.windows(2).enumerate() {
            if pair[1] >= pair[0] {
                return Err(EnergyTableError::NotDescending { index: index + 1 });
            }
        }

        let averages = boundaries
            .windows(2)
            .map(|pair| 0.5 * (pair[0] + pair[1]))
            .collect();
        Ok(Self { averages })
    }

    /// Build from explicitly tabulated averages (group 0 first)
    pub fn from_averages(averages: Vec<f64>) -> Result<Self, EnergyTableError> {
        if averages.is_empty() {
            return Err(EnergyTableError::Empty);
        }
        for (index, &value) in averages.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(EnergyTableError::InvalidBoundary { index, value });
            }
        }
        Ok(Self { averages })
    }

    pub fn averages(&self) -> &[f64] {
        &self.averages
    }
}

impl EnergyTable for MultigroupEnergyTable {
    fn energy_bin_average(&self, group: usize) -> Option<f64> {
        self.averages.get(group).copied()
    }

    fn num_groups(&self) -> usize {
        self.averages.len()
    }
}
