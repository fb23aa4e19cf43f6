//! Checkpoint loading
//!
//! The file handle lives only inside [`load_checkpoint`]; it is released on
//! every exit path, including parse failures.

use super::format::FormatError;
use super::record::CheckpointRecord;
use crate::restart::RestartError;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Load a particle restart file
///
/// Fails wholesale: either every required field is present and well typed,
/// or no record is returned.
///
/// # Errors
///
/// * `RestartError::Io` - the file cannot be opened
/// * `RestartError::Format` - malformed document, missing or mistyped field
/// * `RestartError::UnknownRunMode` - run-mode tag outside the supported set
pub fn load_checkpoint(path: &Path) -> Result<CheckpointRecord, RestartError> {
    let document = read_document(path)?;
    let record = CheckpointRecord::from_document(&document)?;

    debug!(
        path = %path.display(),
        particle_id = record.particle_id,
        run_mode = %record.run_mode,
        digest = %record.digest,
        "loaded particle restart file"
    );
    Ok(record)
}

fn read_document(path: &Path) -> Result<Value, RestartError> {
    let file = File::open(path).map_err(|source| RestartError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| FormatError::Malformed(e.to_string()).into())
}
