//! Replay errors
//!
//! Every failure is fatal: the binary reports it and exits. Nothing in a
//! replay is retried.

use crate::checkpoint::FormatError;
use crate::models::UnknownRunModeError;
use crate::output::OutputError;
use crate::transport::TransportError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestartError {
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid particle restart file: {0}")]
    Format(#[from] FormatError),

    #[error(transparent)]
    UnknownRunMode(#[from] UnknownRunModeError),

    #[error("Energy group {group} does not exist ({n_groups} groups tabulated)")]
    EnergyGroupOutOfRange { group: usize, n_groups: usize },

    #[error("Transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Output failed: {0}")]
    Output(#[from] OutputError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Replay driver already used (phase {0})")]
    AlreadyRun(String),
}
