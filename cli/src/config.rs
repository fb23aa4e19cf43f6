//! Replay model file
//!
//! ```toml
//! [sphere]
//! radius = 10.0     # cm
//! sigma_t = 0.5     # 1/cm
//! sigma_a = 0.1     # 1/cm
//! max_events = 100000
//!
//! [energy_groups]
//! boundaries = [2.0e7, 1.0e6, 1.0, 0.0]   # or: averages = [...]
//! ```

use anyhow::{bail, Context, Result};
use particle_restart_core::transport::{HomogeneousSphere, MAX_EVENTS};
use particle_restart_core::{EnergyTreatment, MultigroupEnergyTable};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Reference sphere material and size
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SphereConfig {
    pub radius: f64,
    pub sigma_t: f64,
    pub sigma_a: f64,
    #[serde(default = "default_max_events")]
    pub max_events: u64,
}

fn default_max_events() -> u64 {
    MAX_EVENTS
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            sigma_t: 1.0,
            sigma_a: 0.1,
            max_events: MAX_EVENTS,
        }
    }
}

/// Multigroup structure, given either as boundaries or as averages
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EnergyGroupsConfig {
    /// Descending group boundaries (eV)
    pub boundaries: Option<Vec<f64>>,
    /// Group-average energies (eV), group 0 first
    pub averages: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    #[serde(default)]
    pub sphere: SphereConfig,
    pub energy_groups: Option<EnergyGroupsConfig>,
}

impl ModelConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Invalid model file {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn engine(&self) -> Result<HomogeneousSphere> {
        let s = &self.sphere;
        Ok(HomogeneousSphere::new(s.radius, s.sigma_t, s.sigma_a)?.with_max_events(s.max_events))
    }

    pub fn energy_treatment(&self, multigroup: bool) -> Result<EnergyTreatment> {
        if !multigroup {
            return Ok(EnergyTreatment::ContinuousEnergy);
        }

        let groups = self
            .energy_groups
            .as_ref()
            .context("Multigroup replay needs an [energy_groups] section in the model file")?;
        let table = match (&groups.boundaries, &groups.averages) {
            (Some(boundaries), None) => {
                MultigroupEnergyTable::from_group_boundaries(boundaries.clone())?
            }
            (None, Some(averages)) => MultigroupEnergyTable::from_averages(averages.clone())?,
            (Some(_), Some(_)) => {
                bail!("[energy_groups] takes either boundaries or averages, not both")
            }
            (None, None) => bail!("[energy_groups] needs boundaries or averages"),
        };
        Ok(EnergyTreatment::Multigroup(Box::new(table)))
    }
}
