//! Transport engines
//!
//! An engine advances a particle event by event until it reaches a terminal
//! fate, drawing every random number from the supplied stream and scoring
//! into the supplied tally store.

pub mod sphere;

pub use sphere::HomogeneousSphere;

use crate::models::{Particle, Vec3};
use crate::rng::RandomStream;
use crate::tally::TallyStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum events in one history before the particle is killed
pub const MAX_EVENTS: u64 = 1_000_000;

/// How a history ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalState {
    Absorbed,
    /// Escaped through a vacuum boundary
    Leaked,
    /// Killed after the maximum number of events
    MaxEventsReached,
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminalState::Absorbed => "absorbed",
            TerminalState::Leaked => "leaked",
            TerminalState::MaxEventsReached => "maximum events reached",
        };
        f.write_str(s)
    }
}

/// Fatal transport failure
///
/// Reproducing these is the point of a particle replay; they are never
/// retried or suppressed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("Particle {id} could not be located in any cell (position {position:?})")]
    Lost { id: u64, position: Vec3 },

    #[error("Particle {id} has a non-normalized direction (|u| = {norm})")]
    InvalidDirection { id: u64, norm: f64 },

    #[error("Particle {id} reached a non-finite state: {what}")]
    NonFiniteState { id: u64, what: &'static str },

    #[error("Invalid transport model: {0}")]
    InvalidModel(String),
}

/// Transport engine consumed by the replay driver
pub trait TransportEngine {
    /// Advance `particle` in place until it dies
    fn transport(
        &mut self,
        particle: &mut Particle,
        rng: &mut dyn RandomStream,
        tallies: &mut dyn TallyStore,
    ) -> Result<TerminalState, TransportError>;
}
