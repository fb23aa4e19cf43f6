//! One-speed analog transport in a homogeneous sphere
//!
//! Reference engine for replays outside a full geometry/physics stack:
//! a single material fills a sphere centred on the origin, surrounded by
//! vacuum.
//!
//! # Event loop
//!
//! ```text
//! For each event:
//! 1. Select sub-stream (photon or tracking)
//! 2. Store pre-event state in the shadow fields
//! 3. Distance to boundary vs. sampled distance to collision
//! 4. Advance, score track length
//! 5. Boundary: leak. Collision: absorb or scatter isotropically
//! 6. Kill after `max_events`
//! ```
//!
//! Charged particles (electrons, positrons) deposit locally at their first
//! event without drawing a collision distance.
//!
//! Event-level messages are emitted at `trace`, per-history messages at
//! `debug` (see [`crate::core::Verbosity::tracing_level`]).

use super::{TerminalState, TransportEngine, TransportError, MAX_EVENTS};
use crate::models::particle::{dot, norm};
use crate::models::{Particle, ParticleType, Vec3};
use crate::rng::{RandomStream, StreamId};
use crate::tally::{ScoreKind, TallyStore};
use std::f64::consts::PI;
use tracing::{debug, trace, warn};

/// Allowed deviation of |u| from 1
const DIRECTION_TOLERANCE: f64 = 1e-6;

/// Homogeneous sphere with vacuum boundary
///
/// # Example
/// ```
/// use particle_restart_core::transport::HomogeneousSphere;
///
/// let sphere = HomogeneousSphere::new(10.0, 0.5, 0.1).unwrap().with_max_events(1000);
/// assert_eq!(sphere.max_events(), 1000);
/// assert!(HomogeneousSphere::new(10.0, 0.5, 0.7).is_err()); // sigma_a > sigma_t
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HomogeneousSphere {
    /// Radius (cm)
    radius: f64,
    /// Macroscopic total cross section (1/cm)
    sigma_t: f64,
    /// Macroscopic absorption cross section (1/cm)
    sigma_a: f64,
    max_events: u64,
}

impl HomogeneousSphere {
    pub fn new(radius: f64, sigma_t: f64, sigma_a: f64) -> Result<Self, TransportError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(TransportError::InvalidModel(format!(
                "sphere radius must be positive, got {}",
                radius
            )));
        }
        if !(sigma_t.is_finite() && sigma_t >= 0.0) {
            return Err(TransportError::InvalidModel(format!(
                "total cross section must be non-negative, got {}",
                sigma_t
            )));
        }
        if !(sigma_a.is_finite() && sigma_a >= 0.0 && sigma_a <= sigma_t) {
            return Err(TransportError::InvalidModel(format!(
                "absorption cross section must lie in [0, sigma_t], got {}",
                sigma_a
            )));
        }

        Ok(Self {
            radius,
            sigma_t,
            sigma_a,
            max_events: MAX_EVENTS,
        })
    }

    pub fn with_max_events(mut self, max_events: u64) -> Self {
        self.max_events = max_events.max(1);
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn max_events(&self) -> u64 {
        self.max_events
    }

    /// Distance along `u` from `r` (inside) to the sphere surface
    fn distance_to_boundary(&self, r: &Vec3, u: &Vec3) -> f64 {
        let b = dot(r, u);
        let c = dot(r, r) - self.radius * self.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return 0.0;
        }
        (-b + discriminant.sqrt()).max(0.0)
    }

    fn check_state(&self, particle: &Particle) -> Result<(), TransportError> {
        let id = particle.id;
        if !particle.position.iter().all(|x| x.is_finite()) {
            return Err(TransportError::NonFiniteState { id, what: "position" });
        }
        if !particle.direction.iter().all(|x| x.is_finite()) {
            return Err(TransportError::NonFiniteState { id, what: "direction" });
        }
        if !(particle.energy.is_finite() && particle.weight.is_finite()) {
            return Err(TransportError::NonFiniteState {
                id,
                what: "energy or weight",
            });
        }

        let u = norm(&particle.direction);
        if (u - 1.0).abs() > DIRECTION_TOLERANCE {
            return Err(TransportError::InvalidDirection { id, norm: u });
        }

        if norm(&particle.position) > self.radius {
            return Err(TransportError::Lost {
                id,
                position: particle.position,
            });
        }
        Ok(())
    }

    /// Process a collision; returns the fate if the particle died
    fn collide(
        &self,
        particle: &mut Particle,
        rng: &mut dyn RandomStream,
        tallies: &mut dyn TallyStore,
    ) -> Option<TerminalState> {
        particle.n_collision += 1;
        tallies.score(ScoreKind::Collision, particle.weight);
        particle.position_last_current = particle.position;

        if particle.particle_type.is_charged() || rng.prn() < self.sigma_a / self.sigma_t {
            tallies.score(ScoreKind::Absorption, particle.weight);
            particle.alive = false;
            trace!(id = particle.id, "Absorbed");
            return Some(TerminalState::Absorbed);
        }

        let mu = 2.0 * rng.prn() - 1.0;
        let phi = 2.0 * PI * rng.prn();
        let sin_theta = (1.0 - mu * mu).max(0.0).sqrt();
        particle.direction = [sin_theta * phi.cos(), sin_theta * phi.sin(), mu];
        trace!(id = particle.id, mu, "Scattered");
        None
    }
}

impl TransportEngine for HomogeneousSphere {
    fn transport(
        &mut self,
        particle: &mut Particle,
        rng: &mut dyn RandomStream,
        tallies: &mut dyn TallyStore,
    ) -> Result<TerminalState, TransportError> {
        self.check_state(particle)?;
        debug!(id = particle.id, particle_type = %particle.particle_type, "simulating particle");

        let stream = match particle.particle_type {
            ParticleType::Photon => StreamId::Photon,
            _ => StreamId::Tracking,
        };

        let mut n_event: u64 = 0;
        particle.record_track_point();

        let terminal = loop {
            rng.select_stream(stream);
            particle.store_pre_event_state();

            let d_boundary = self.distance_to_boundary(&particle.position, &particle.direction);
            let d_collision = if particle.particle_type.is_charged() {
                0.0
            } else if self.sigma_t == 0.0 {
                f64::INFINITY
            } else {
                -rng.prn().ln() / self.sigma_t
            };

            let distance = d_boundary.min(d_collision);
            particle.advance(distance);
            tallies.score(ScoreKind::TrackLength, particle.weight * distance);

            let fate = if d_collision > d_boundary {
                trace!(id = particle.id, "Leaked out of vacuum boundary");
                particle.alive = false;
                Some(TerminalState::Leaked)
            } else {
                self.collide(particle, rng, tallies)
            };

            n_event += 1;
            particle.n_event = n_event;
            particle.record_track_point();

            if let Some(fate) = fate {
                break fate;
            }

            if !particle.position.iter().all(|x| x.is_finite()) {
                return Err(TransportError::NonFiniteState {
                    id: particle.id,
                    what: "position",
                });
            }

            if n_event == self.max_events {
                warn!(
                    id = particle.id,
                    "Particle {} underwent maximum number of events.", particle.id
                );
                particle.alive = false;
                break TerminalState::MaxEventsReached;
            }
        };

        debug!(id = particle.id, %terminal, n_event, "history finished");
        Ok(terminal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PrnStream;
    use crate::tally::TallyAccumulator;

    fn neutron_at_origin() -> Particle {
        Particle::new(
            1,
            ParticleType::Neutron,
            1.0,
            1.0e6,
            0,
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
        )
    }

    #[test]
    fn test_distance_to_boundary_from_centre() {
        let sphere = HomogeneousSphere::new(5.0, 1.0, 0.5).unwrap();
        let d = sphere.distance_to_boundary(&[0.0, 0.0, 0.0], &[1.0, 0.0, 0.0]);
        assert!((d - 5.0).abs() < 1e-12);

        let d = sphere.distance_to_boundary(&[3.0, 0.0, 0.0], &[-1.0, 0.0, 0.0]);
        assert!((d - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_void_sphere_leaks_in_one_event() {
        let mut sphere = HomogeneousSphere::new(5.0, 0.0, 0.0).unwrap();
        let mut p = neutron_at_origin();
        let mut rng = PrnStream::default();
        let mut tallies = TallyAccumulator::new();

        let fate = sphere.transport(&mut p, &mut rng, &mut tallies).unwrap();
        assert_eq!(fate, TerminalState::Leaked);
        assert_eq!(p.n_event, 1);
        assert!(!p.alive);
        assert!((p.position[2] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_pure_absorber_absorbs_at_first_collision() {
        // Huge sphere, pure absorber: first collision is always inside
        let mut sphere = HomogeneousSphere::new(1.0e9, 1.0, 1.0).unwrap();
        let mut p = neutron_at_origin();
        let mut rng = PrnStream::default();
        rng.set_stream_seed(3);
        let mut tallies = TallyAccumulator::new();
        tallies.add_tally("absorption", ScoreKind::Absorption);

        let fate = sphere.transport(&mut p, &mut rng, &mut tallies).unwrap();
        assert_eq!(fate, TerminalState::Absorbed);
        assert_eq!(p.n_collision, 1);
        assert_eq!(p.position_last_current, p.position);
        assert_eq!(tallies.get("absorption").unwrap().value, 1.0);
    }

    #[test]
    fn test_max_events_kills_particle() {
        // Pure scatterer in a huge sphere never leaks within a few events
        let mut sphere = HomogeneousSphere::new(1.0e12, 1.0, 0.0)
            .unwrap()
            .with_max_events(5);
        let mut p = neutron_at_origin();
        let mut rng = PrnStream::default();
        rng.set_stream_seed(11);

        let fate = sphere
            .transport(&mut p, &mut rng, &mut TallyAccumulator::new())
            .unwrap();
        assert_eq!(fate, TerminalState::MaxEventsReached);
        assert_eq!(p.n_event, 5);
        assert!(!p.alive);
    }

    #[test]
    fn test_particle_outside_sphere_is_lost() {
        let mut sphere = HomogeneousSphere::new(1.0, 1.0, 0.5).unwrap();
        let mut p = neutron_at_origin();
        p.position = [2.0, 0.0, 0.0];
        let err = sphere
            .transport(&mut p, &mut PrnStream::default(), &mut TallyAccumulator::new())
            .unwrap_err();
        assert!(matches!(err, TransportError::Lost { id: 1, .. }));
    }

    #[test]
    fn test_non_normalized_direction_rejected() {
        let mut sphere = HomogeneousSphere::new(1.0, 1.0, 0.5).unwrap();
        let mut p = neutron_at_origin();
        p.direction = [1.0, 1.0, 0.0];
        let err = sphere
            .transport(&mut p, &mut PrnStream::default(), &mut TallyAccumulator::new())
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidDirection { .. }));
    }

    #[test]
    fn test_electron_deposits_locally() {
        let mut sphere = HomogeneousSphere::new(1.0, 0.0, 0.0).unwrap();
        let mut p = neutron_at_origin();
        p.particle_type = ParticleType::Electron;
        let fate = sphere
            .transport(&mut p, &mut PrnStream::default(), &mut TallyAccumulator::new())
            .unwrap();
        assert_eq!(fate, TerminalState::Absorbed);
        assert_eq!(p.position, [0.0, 0.0, 0.0]);
    }
}
