//! Read-only measurements of a particle population.
//!
//! None of these modify state. Non-finite particles are reported, never
//! repaired.

use glam::Vec2;
use particle_physics::{Bounds, Particle, ParticleId};

/// Total kinetic energy, sum of `0.5 * m * |v|²`
pub fn kinetic_energy(particles: &[Particle]) -> f32 {
    particles
        .iter()
        .map(|p| 0.5 * p.mass() * p.velocity.length_squared())
        .sum()
}

/// Total linear momentum, sum of `m * v`
pub fn momentum(particles: &[Particle]) -> Vec2 {
    particles.iter().map(|p| p.mass() * p.velocity).sum()
}

/// Append the ids of particles with NaN or infinite position, velocity or force
pub fn collect_non_finite(particles: &[Particle], out: &mut Vec<ParticleId>) {
    out.extend(particles.iter().filter(|p| !p.is_finite()).map(Particle::id));
}

/// Number of particles that are not fully inside `bounds`
pub fn count_outside(particles: &[Particle], bounds: &Bounds) -> usize {
    particles
        .iter()
        .filter(|p| !bounds.contains(p.position, p.radius()))
        .count()
}
