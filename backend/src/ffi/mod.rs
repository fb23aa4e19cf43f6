//! Python bindings
//!
//! Exposes seed derivation and checkpoint inspection so analysis scripts can
//! cross-check a replay against production output.

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::Path;

use crate::checkpoint::load_checkpoint;
use crate::core::SimulationContext;
use crate::models::{RunMode, UnknownRunModeError};
use crate::restart::{derive_particle_seed, RestartError};

fn to_py_err(err: RestartError) -> PyErr {
    match err {
        RestartError::Io { .. } => PyErr::new::<PyIOError, _>(err.to_string()),
        other => PyErr::new::<PyValueError, _>(other.to_string()),
    }
}

/// Stream seed the production run assigned to a particle
///
/// # Example (from Python)
///
/// ```python
/// from particle_restart_core import derive_seed
///
/// assert derive_seed("eigenvalue", 3, 5, 3, 1000, 7) == 12007
/// ```
#[pyfunction]
pub fn derive_seed(
    run_mode: &str,
    current_batch: u64,
    generations_per_batch: u64,
    current_generation: u64,
    n_particles: u64,
    particle_id: u64,
) -> PyResult<u64> {
    let run_mode: RunMode = run_mode
        .parse()
        .map_err(|e: UnknownRunModeError| PyErr::new::<PyValueError, _>(e.to_string()))?;
    let context = SimulationContext::new(
        current_batch,
        generations_per_batch,
        current_generation,
        n_particles,
    )
    .map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))?;

    Ok(derive_particle_seed(run_mode, &context, particle_id))
}

/// Load a particle restart file into a dictionary
///
/// Keys: `current_batch`, `generations_per_batch`, `current_generation`,
/// `n_particles`, `run_mode`, `id`, `type`, `weight`, `energy`, `position`,
/// `direction`, `digest`, `seed`.
#[pyfunction]
pub fn read_checkpoint(py: Python, path: &str) -> PyResult<Py<PyDict>> {
    let record = load_checkpoint(Path::new(path)).map_err(to_py_err)?;
    let seed = derive_particle_seed(record.run_mode, &record.context, record.particle_id);

    let dict = PyDict::new(py);
    dict.set_item("current_batch", record.context.current_batch())?;
    dict.set_item("generations_per_batch", record.context.generations_per_batch())?;
    dict.set_item("current_generation", record.context.current_generation())?;
    dict.set_item("n_particles", record.context.n_particles())?;
    dict.set_item("run_mode", record.run_mode.as_tag())?;
    dict.set_item("id", record.particle_id)?;
    dict.set_item("type", record.particle_type.tag())?;
    dict.set_item("weight", record.weight)?;
    dict.set_item("energy", record.energy)?;
    dict.set_item("position", record.position.to_vec())?;
    dict.set_item("direction", record.direction.to_vec())?;
    dict.set_item("digest", record.digest)?;
    dict.set_item("seed", seed)?;

    Ok(dict.into())
}
