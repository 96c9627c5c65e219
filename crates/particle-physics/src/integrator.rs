//! Time integration and wall handling
//!
//! Semi-implicit (symplectic) Euler: velocity is advanced first and the new
//! velocity moves the particle. Afterwards each wall is checked on its own,
//! clamping the center to `radius` inside the wall and reflecting the normal
//! velocity component scaled by the restitution.

use crate::config::{Bounds, PhysicsConfig};
use crate::particle::Particle;

/// Walls plus the restitution applied on contact with them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub bounds: Bounds,
    pub restitution: f32,
}

impl Boundary {
    pub fn new(bounds: Bounds, restitution: f32) -> Self {
        Self {
            bounds,
            restitution,
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.bounds, config.restitution)
    }

    /// Clamp `p` inside the walls and bounce its velocity.
    ///
    /// Every wall is tested unconditionally, top and bottom first, then right
    /// and left. A particle wider than the domain ends up pinned against the
    /// last wall tested on that axis.
    pub fn reflect(&self, p: &mut Particle) {
        let r = p.radius();
        let Bounds { min, max } = self.bounds;

        if p.position.y + r > max.y {
            p.position.y = max.y - r;
            p.velocity.y *= -self.restitution;
        }
        if p.position.y - r < min.y {
            p.position.y = min.y + r;
            p.velocity.y *= -self.restitution;
        }
        if p.position.x + r > max.x {
            p.position.x = max.x - r;
            p.velocity.x *= -self.restitution;
        }
        if p.position.x - r < min.x {
            p.position.x = min.x + r;
            p.velocity.x *= -self.restitution;
        }
    }
}

/// Advance one particle by `dt` from its accumulated force
#[inline]
pub fn integrate(p: &mut Particle, dt: f32) {
    let acceleration = p.force / p.mass();
    p.velocity += acceleration * dt;
    p.position += p.velocity * dt;
}

/// Integrate every particle, then resolve wall contacts
pub fn integrate_all(particles: &mut [Particle], dt: f32, boundary: &Boundary) {
    for p in particles.iter_mut() {
        integrate(p, dt);
        boundary.reflect(p);
    }
}
