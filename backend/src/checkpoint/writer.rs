//! Checkpoint writing
//!
//! Production runs write one file per anomalous particle, named after the
//! batch and the particle id so files from different batches never clash.

use super::record::CheckpointRecord;
use crate::restart::RestartError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the restart file for `particle_id` in `batch`
///
/// # Example
/// ```
/// use particle_restart_core::checkpoint::checkpoint_file_name;
///
/// assert_eq!(checkpoint_file_name(3, 7), "particle_3_7.json");
/// ```
pub fn checkpoint_file_name(batch: u64, particle_id: u64) -> String {
    format!("particle_{}_{}.json", batch, particle_id)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RestartError {
    let path = path.to_path_buf();
    move |source| RestartError::Io { path, source }
}

/// Write `record` into `output_dir`, returning the file path
pub fn write_checkpoint(output_dir: &Path, record: &CheckpointRecord) -> Result<PathBuf, RestartError> {
    fs::create_dir_all(output_dir).map_err(io_error(output_dir))?;

    let path = output_dir.join(checkpoint_file_name(
        record.context.current_batch(),
        record.particle_id,
    ));
    let file = File::create(&path).map_err(io_error(&path))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &record.to_document())
        .map_err(|e| RestartError::Serialization(format!("Checkpoint serialization failed: {}", e)))?;
    writer.flush().map_err(io_error(&path))?;

    info!(path = %path.display(), particle_id = record.particle_id, "wrote particle restart file");
    Ok(path)
}
