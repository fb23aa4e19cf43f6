//! Particle model
//!
//! The working representation advanced by a transport engine. Alongside the
//! current physical state it keeps shadow "last" copies that physics and
//! tally code use to compute per-step deltas (path length, energy
//! deposition, direction change).
//!
//! # Critical Invariants
//!
//! 1. Directly after reconstruction every shadow field equals its current
//!    field, so the first step reports a zero delta
//! 2. `energy` is always a physical energy (eV); in multigroup mode it is the
//!    tabulated average of `group`

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cartesian 3-vector (position in cm or unit direction)
pub type Vec3 = [f64; 3];

pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn norm(a: &Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// Particle species, stored in checkpoints as an integer tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleType {
    Neutron,
    Photon,
    Electron,
    Positron,
}

impl ParticleType {
    /// Integer tag used in checkpoint files
    pub fn tag(&self) -> i64 {
        match self {
            ParticleType::Neutron => 0,
            ParticleType::Photon => 1,
            ParticleType::Electron => 2,
            ParticleType::Positron => 3,
        }
    }

    /// Inverse of [`ParticleType::tag`]
    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            0 => Some(ParticleType::Neutron),
            1 => Some(ParticleType::Photon),
            2 => Some(ParticleType::Electron),
            3 => Some(ParticleType::Positron),
            _ => None,
        }
    }

    /// Charged species deposit their energy locally
    pub fn is_charged(&self) -> bool {
        matches!(self, ParticleType::Electron | ParticleType::Positron)
    }
}

impl fmt::Display for ParticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParticleType::Neutron => "neutron",
            ParticleType::Photon => "photon",
            ParticleType::Electron => "electron",
            ParticleType::Positron => "positron",
        };
        f.write_str(name)
    }
}

/// One recorded state along a particle track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub position: Vec3,
    pub direction: Vec3,
    pub energy: f64,
    pub weight: f64,
}

/// State of a particle when it was created (banked)
///
/// A restart file records this site, not the state at the point of failure:
/// replaying from the birth site with the particle's stream seed reproduces
/// the whole history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceSite {
    pub weight: f64,
    pub energy: f64,
    pub group: usize,
    pub position: Vec3,
    pub direction: Vec3,
}

/// Particle state during a replay
///
/// Fields are public: transport engines mutate them directly while
/// advancing the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Unique identity within the original run
    pub id: u64,
    pub particle_type: ParticleType,
    pub alive: bool,

    pub weight: f64,
    /// Energy in eV
    pub energy: f64,
    /// Energy group (multigroup mode only, 0 otherwise)
    pub group: usize,
    pub position: Vec3,
    pub direction: Vec3,

    pub weight_last: f64,
    pub energy_last: f64,
    pub group_last: usize,
    pub position_last: Vec3,
    /// Position at the last tally crossing (collision site)
    pub position_last_current: Vec3,
    pub direction_last: Vec3,

    /// Collisions undergone in this history
    pub n_collision: u64,
    /// Events processed in this history
    pub n_event: u64,

    /// Birth state, fixed at construction
    pub source_site: SourceSite,

    /// Record every event into `track`
    pub write_track: bool,
    pub track: Vec<TrackPoint>,
}

impl Particle {
    /// Create a live particle with all shadow fields primed
    ///
    /// # Example
    /// ```
    /// use particle_restart_core::{Particle, ParticleType};
    ///
    /// let p = Particle::new(
    ///     7,
    ///     ParticleType::Neutron,
    ///     1.0,
    ///     2.0e6,
    ///     0,
    ///     [0.0, 0.0, 0.0],
    ///     [1.0, 0.0, 0.0],
    /// );
    /// assert!(p.alive);
    /// assert_eq!(p.position_last, p.position);
    /// assert_eq!(p.energy_last, p.energy);
    /// ```
    pub fn new(
        id: u64,
        particle_type: ParticleType,
        weight: f64,
        energy: f64,
        group: usize,
        position: Vec3,
        direction: Vec3,
    ) -> Self {
        let mut particle = Self {
            id,
            particle_type,
            alive: true,
            weight,
            energy,
            group,
            position,
            direction,
            weight_last: 0.0,
            energy_last: 0.0,
            group_last: 0,
            position_last: [0.0; 3],
            position_last_current: [0.0; 3],
            direction_last: [0.0; 3],
            n_collision: 0,
            n_event: 0,
            source_site: SourceSite {
                weight,
                energy,
                group,
                position,
                direction,
            },
            write_track: false,
            track: Vec::new(),
        };
        particle.prime_last_state();
        particle
    }

    /// Copy every current field into its shadow "last" field
    ///
    /// A restarted particle has no genuine previous step; priming yields a
    /// zero initial delta and keeps the first step from scoring spuriously.
    pub fn prime_last_state(&mut self) {
        self.weight_last = self.weight;
        self.position_last_current = self.position;
        self.position_last = self.position;
        self.direction_last = self.direction;
        self.energy_last = self.energy;
        self.group_last = self.group;
    }

    /// Store pre-event state at the start of a transport step
    pub fn store_pre_event_state(&mut self) {
        self.weight_last = self.weight;
        self.energy_last = self.energy;
        self.direction_last = self.direction;
        self.position_last = self.position;
    }

    /// Move along the current direction
    pub fn advance(&mut self, distance: f64) {
        for i in 0..3 {
            self.position[i] += distance * self.direction[i];
        }
    }

    /// Append the current state to the track if tracking is on
    pub fn record_track_point(&mut self) {
        if self.write_track {
            self.track.push(TrackPoint {
                position: self.position,
                direction: self.direction,
                energy: self.energy,
                weight: self.weight,
            });
        }
    }

    /// True when every shadow field equals its current field
    pub fn has_zero_delta(&self) -> bool {
        self.weight_last == self.weight
            && self.energy_last == self.energy
            && self.group_last == self.group
            && self.position_last == self.position
            && self.position_last_current == self.position
            && self.direction_last == self.direction
    }
}
