//! Tally accumulators
//!
//! A tally sums one kind of score over the events of a history. Transport
//! engines call [`TallyStore::score`] for every scoring event; the store
//! adds the value to each registered tally of that kind.
//!
//! A particle replay clears the store before transport: with no tallies
//! registered nothing can be scored, and the run reproduces the trajectory
//! only.

use serde::{Deserialize, Serialize};

/// What a tally accumulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreKind {
    /// Weight entering each collision
    Collision,
    /// Weight absorbed
    Absorption,
    /// Weight times distance travelled
    TrackLength,
}

/// Tally store consumed by the replay driver and transport engines
pub trait TallyStore {
    /// Remove every tally
    fn clear(&mut self);

    fn is_empty(&self) -> bool;

    /// Add `value` to every tally scoring `kind`
    fn score(&mut self, kind: ScoreKind, value: f64);
}

/// Single named tally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub name: String,
    pub kind: ScoreKind,
    /// Accumulated value
    pub value: f64,
    /// Number of scoring events
    pub n_scores: u64,
}

/// In-memory tally store
///
/// # Example
/// ```
/// use particle_restart_core::tally::{ScoreKind, TallyAccumulator, TallyStore};
///
/// let mut tallies = TallyAccumulator::new();
/// tallies.add_tally("flux", ScoreKind::TrackLength);
/// tallies.score(ScoreKind::TrackLength, 2.5);
/// assert_eq!(tallies.get("flux").unwrap().value, 2.5);
///
/// tallies.clear();
/// tallies.score(ScoreKind::TrackLength, 2.5);
/// assert!(tallies.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TallyAccumulator {
    tallies: Vec<Tally>,
}

impl TallyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tally; a tally with the same name is replaced
    pub fn add_tally(&mut self, name: impl Into<String>, kind: ScoreKind) {
        let name = name.into();
        self.tallies.retain(|t| t.name != name);
        self.tallies.push(Tally {
            name,
            kind,
            value: 0.0,
            n_scores: 0,
        });
    }

    pub fn get(&self, name: &str) -> Option<&Tally> {
        self.tallies.iter().find(|t| t.name == name)
    }

    pub fn tallies(&self) -> &[Tally] {
        &self.tallies
    }

    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    /// Sum of all tallies of `kind`
    pub fn total(&self, kind: ScoreKind) -> f64 {
        self.tallies
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.value)
            .sum()
    }
}

impl TallyStore for TallyAccumulator {
    fn clear(&mut self) {
        self.tallies.clear();
    }

    fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    fn score(&mut self, kind: ScoreKind, value: f64) {
        for tally in self.tallies.iter_mut().filter(|t| t.kind == kind) {
            tally.value += value;
            tally.n_scores += 1;
        }
    }
}
