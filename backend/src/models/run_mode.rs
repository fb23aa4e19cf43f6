//! Run mode of the production run that wrote a checkpoint
//!
//! The checkpoint stores the mode as a loose string tag. It is parsed into a
//! closed enum at the boundary so seed derivation can match exhaustively.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Transport mode of the original run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunMode {
    /// Iterated fission generations; stream position depends on the
    /// global generation counter
    #[serde(rename = "eigenvalue")]
    Eigenvalue,

    /// Independent histories; stream position depends on the particle id only
    #[serde(rename = "fixed source")]
    FixedSource,
}

/// Run-mode tag outside the supported set
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unexpected run mode: {tag:?}")]
pub struct UnknownRunModeError {
    pub tag: String,
}

impl RunMode {
    /// Tag as written to checkpoint files
    ///
    /// # Example
    /// ```
    /// use particle_restart_core::RunMode;
    ///
    /// assert_eq!(RunMode::FixedSource.as_tag(), "fixed source");
    /// assert_eq!("eigenvalue".parse::<RunMode>().unwrap(), RunMode::Eigenvalue);
    /// assert!("particle restart".parse::<RunMode>().is_err());
    /// ```
    pub fn as_tag(&self) -> &'static str {
        match self {
            RunMode::Eigenvalue => "eigenvalue",
            RunMode::FixedSource => "fixed source",
        }
    }
}

impl FromStr for RunMode {
    type Err = UnknownRunModeError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "eigenvalue" => Ok(RunMode::Eigenvalue),
            "fixed source" => Ok(RunMode::FixedSource),
            other => Err(UnknownRunModeError {
                tag: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}
