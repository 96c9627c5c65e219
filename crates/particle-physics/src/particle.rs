//! Soft circular particles and the arena that owns them

use crate::config::ConfigError;
use glam::Vec2;
use std::fmt;

/// Stable particle identifier, assigned once at spawn time.
/// Only used to order pairs so each contact is handled once per sub-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleId(pub u32);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A soft disc in normalized domain coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    id: ParticleId,
    /// Center position, may leave the domain until the boundary pass runs
    pub position: Vec2,
    pub velocity: Vec2,
    /// Force accumulator, zeroed at the start of every sub-step
    pub force: Vec2,
    mass: f32,
    radius: f32,
}

impl Particle {
    pub fn id(&self) -> ParticleId {
        self.id
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Add `f` to the force accumulator
    #[inline]
    pub fn apply_force(&mut self, f: Vec2) {
        self.force += f;
    }

    #[inline]
    pub fn reset_force(&mut self) {
        self.force = Vec2::ZERO;
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.force.is_finite()
    }
}

/// Owns the particle population and hands out ids.
///
/// Particles keep their spawn order, which is also the order snapshots are
/// published in.
#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    particles: Vec<Particle>,
    next_id: u32,
}

impl ParticleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            next_id: 0,
        }
    }

    /// Add a particle and return its id
    pub fn spawn(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        radius: f32,
        mass: f32,
    ) -> Result<ParticleId, ConfigError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::NonPositiveRadius(radius));
        }
        if !(mass.is_finite() && mass > 0.0) {
            return Err(ConfigError::NonPositiveMass(mass));
        }
        if !(position.is_finite() && velocity.is_finite()) {
            return Err(ConfigError::NonFiniteState);
        }

        let id = ParticleId(self.next_id);
        self.next_id += 1;
        self.particles.push(Particle {
            id,
            position,
            velocity,
            force: Vec2::ZERO,
            mass,
            radius,
        });
        Ok(id)
    }

    /// Drop every particle and restart ids from zero
    pub fn reset(&mut self) {
        self.particles.clear();
        self.next_id = 0;
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.index_of(id).map(|i| &self.particles[i])
    }

    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.index_of(id).map(move |i| &mut self.particles[i])
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    /// Largest radius in the population, zero when empty
    pub fn max_radius(&self) -> f32 {
        self.particles
            .iter()
            .map(Particle::radius)
            .fold(0.0, f32::max)
    }

    fn index_of(&self, id: ParticleId) -> Option<usize> {
        // ids are handed out in increasing order and never removed one by one
        self.particles.binary_search_by_key(&id, Particle::id).ok()
    }
}

impl<'a> IntoIterator for &'a ParticleSet {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}
