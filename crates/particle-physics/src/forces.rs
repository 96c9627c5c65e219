//! Force accumulation: uniform gravity and penalty spring-damper contacts
//!
//! Contacts are found in two passes. The first reads the particle slice and
//! the grid and records one [`Contact`] per touching pair; the second adds
//! those forces into the accumulators. Nothing moves between the passes, so
//! every contact of a sub-step sees the same pre-integration state.

use crate::config::PhysicsConfig;
use crate::grid::SpatialHashGrid;
use crate::particle::Particle;
use glam::Vec2;

/// Linear spring-damper acting along the line of centers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactModel {
    /// Force per unit overlap
    pub spring: f32,
    /// Force per unit closing speed
    pub damping: f32,
}

impl ContactModel {
    pub fn new(spring: f32, damping: f32) -> Self {
        Self { spring, damping }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.spring_constant, config.damping_constant)
    }
}

/// A resolved pair. `force` acts on `b`, its negation on `a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: usize,
    pub b: usize,
    pub force: Vec2,
}

/// Add `mass * gravity` to every particle
pub fn apply_gravity(particles: &mut [Particle], gravity: Vec2) {
    for p in particles.iter_mut() {
        let weight = p.mass() * gravity;
        p.apply_force(weight);
    }
}

/// Contact force on `p2` from `p1`, or `None` when they don't overlap.
///
/// F = k * overlap - c * dot(v2 - v1, n), along n pointing from p1 to p2.
/// Coincident centers have no normal and yield no force. Large overlaps are
/// not clamped.
pub fn contact_force(p1: &Particle, p2: &Particle, model: &ContactModel) -> Option<Vec2> {
    let delta = p2.position - p1.position;
    let dist_sq = delta.length_squared();
    let sum_radii = p1.radius() + p2.radius();

    if dist_sq >= sum_radii * sum_radii || dist_sq == 0.0 {
        return None;
    }

    let dist = dist_sq.sqrt();
    let overlap = sum_radii - dist;
    let normal = delta / dist;

    let spring = model.spring * overlap;
    let closing = (p2.velocity - p1.velocity).dot(normal);
    let damping = model.damping * closing;

    Some((spring - damping) * normal)
}

/// Contacts between particle `i` and its grid neighbors with a larger id
fn push_contacts(
    i: usize,
    particles: &[Particle],
    grid: &SpatialHashGrid,
    model: &ContactModel,
    candidates: &mut Vec<usize>,
    out: &mut Vec<Contact>,
) {
    let p1 = &particles[i];
    candidates.clear();
    grid.query_neighbors_into(p1.position, candidates);

    for &j in candidates.iter() {
        let p2 = &particles[j];
        if p1.id() >= p2.id() {
            continue;
        }
        if let Some(force) = contact_force(p1, p2, model) {
            out.push(Contact { a: i, b: j, force });
        }
    }
}

/// Collect every touching pair exactly once, ordered by the first particle's
/// slice index. `grid` must have been rebuilt from `particles`.
#[cfg(not(feature = "parallel"))]
pub fn detect_contacts(
    particles: &[Particle],
    grid: &SpatialHashGrid,
    model: &ContactModel,
    out: &mut Vec<Contact>,
) {
    out.clear();
    let mut candidates = Vec::new();
    for i in 0..particles.len() {
        push_contacts(i, particles, grid, model, &mut candidates, out);
    }
}

/// Collect every touching pair exactly once, ordered by the first particle's
/// slice index. `grid` must have been rebuilt from `particles`.
#[cfg(feature = "parallel")]
pub fn detect_contacts(
    particles: &[Particle],
    grid: &SpatialHashGrid,
    model: &ContactModel,
    out: &mut Vec<Contact>,
) {
    use rayon::prelude::*;

    out.clear();
    // rayon keeps source order when collecting, so the result matches the
    // serial scan
    let found: Vec<Contact> = (0..particles.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let mut candidates = Vec::new();
            let mut local = Vec::new();
            push_contacts(i, particles, grid, model, &mut candidates, &mut local);
            local
        })
        .collect();
    out.extend(found);
}

/// Add each contact's equal and opposite forces into the accumulators
pub fn apply_contacts(particles: &mut [Particle], contacts: &[Contact]) {
    for contact in contacts {
        particles[contact.a].apply_force(-contact.force);
        particles[contact.b].apply_force(contact.force);
    }
}

/// Detect and apply all contact forces for one sub-step.
///
/// Returns the number of pair interactions applied. `contacts` is scratch
/// space reused across calls.
pub fn resolve_collisions(
    particles: &mut [Particle],
    grid: &SpatialHashGrid,
    model: &ContactModel,
    contacts: &mut Vec<Contact>,
) -> usize {
    detect_contacts(particles, grid, model, contacts);
    apply_contacts(particles, contacts);
    contacts.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::particle::ParticleSet;

    const MODEL: ContactModel = ContactModel {
        spring: 30_000.0,
        damping: 50.0,
    };

    fn pair(a: Vec2, b: Vec2, radius: f32) -> ParticleSet {
        let mut set = ParticleSet::new();
        set.spawn(a, Vec2::ZERO, radius, 1.0).unwrap();
        set.spawn(b, Vec2::ZERO, radius, 1.0).unwrap();
        set
    }

    fn rebuilt_grid(set: &ParticleSet, radius: f32) -> SpatialHashGrid {
        let mut grid = SpatialHashGrid::new(GridConfig::for_radius(radius)).unwrap();
        grid.rebuild(set.as_slice());
        grid
    }

    #[test]
    fn test_gravity_scales_with_mass() {
        let mut set = ParticleSet::new();
        set.spawn(Vec2::ZERO, Vec2::ZERO, 0.1, 1.0).unwrap();
        set.spawn(Vec2::ZERO, Vec2::ZERO, 0.1, 2.5).unwrap();

        apply_gravity(set.as_mut_slice(), Vec2::new(0.0, -9.8));

        assert_eq!(set.as_slice()[0].force, Vec2::new(0.0, -9.8));
        assert_eq!(set.as_slice()[1].force, Vec2::new(0.0, -24.5));
    }

    #[test]
    fn test_overlapping_pair_repels() {
        let set = pair(Vec2::new(0.5, 0.5), Vec2::new(0.52, 0.5), 0.05);
        let [p1, p2] = set.as_slice() else {
            unreachable!()
        };

        let force = contact_force(p1, p2, &MODEL).unwrap();
        // overlap 0.08, pointing from p1 to p2
        assert!((force.x - 30_000.0 * 0.08).abs() < 1e-1);
        assert_eq!(force.y, 0.0);
    }

    #[test]
    fn test_separated_pair_has_no_force() {
        let set = pair(Vec2::new(0.2, 0.5), Vec2::new(0.5, 0.5), 0.05);
        let [p1, p2] = set.as_slice() else {
            unreachable!()
        };
        assert_eq!(contact_force(p1, p2, &MODEL), None);
    }

    #[test]
    fn test_exactly_touching_pair_has_no_force() {
        let set = pair(Vec2::new(0.25, 0.5), Vec2::new(0.75, 0.5), 0.25);
        let [p1, p2] = set.as_slice() else {
            unreachable!()
        };
        assert_eq!(contact_force(p1, p2, &MODEL), None);
    }

    #[test]
    fn test_coincident_centers_are_skipped() {
        let set = pair(Vec2::splat(0.5), Vec2::splat(0.5), 0.05);
        let [p1, p2] = set.as_slice() else {
            unreachable!()
        };
        assert_eq!(contact_force(p1, p2, &MODEL), None);
    }

    #[test]
    fn test_damping_resists_approach() {
        let mut set = pair(Vec2::new(0.5, 0.5), Vec2::new(0.55, 0.5), 0.05);
        let spring_only = {
            let [p1, p2] = set.as_slice() else {
                unreachable!()
            };
            contact_force(p1, p2, &MODEL).unwrap()
        };

        // closing in: dot(v2 - v1, n) < 0, so damping adds to the repulsion
        set.as_mut_slice()[0].velocity = Vec2::new(1.0, 0.0);
        let [p1, p2] = set.as_slice() else {
            unreachable!()
        };
        let approaching = contact_force(p1, p2, &MODEL).unwrap();
        assert!((approaching.x - (spring_only.x + 50.0)).abs() < 1e-2);
    }

    #[test]
    fn test_pair_forces_cancel_exactly() {
        let mut set = pair(Vec2::new(0.41, 0.43), Vec2::new(0.44, 0.47), 0.05);
        set.as_mut_slice()[0].velocity = Vec2::new(0.3, -0.2);
        set.as_mut_slice()[1].velocity = Vec2::new(-0.7, 0.1);
        let grid = rebuilt_grid(&set, 0.05);

        let mut contacts = Vec::new();
        let n = resolve_collisions(set.as_mut_slice(), &grid, &MODEL, &mut contacts);

        assert_eq!(n, 1);
        let [p1, p2] = set.as_slice() else {
            unreachable!()
        };
        assert_eq!(p1.force, -p2.force);
        assert_ne!(p1.force, Vec2::ZERO);
    }

    #[test]
    fn test_cluster_of_three_resolves_three_pairs() {
        let mut set = ParticleSet::new();
        set.spawn(Vec2::new(0.50, 0.50), Vec2::ZERO, 0.05, 1.0).unwrap();
        set.spawn(Vec2::new(0.54, 0.50), Vec2::ZERO, 0.05, 1.0).unwrap();
        set.spawn(Vec2::new(0.52, 0.54), Vec2::ZERO, 0.05, 1.0).unwrap();
        let grid = rebuilt_grid(&set, 0.05);

        let mut contacts = Vec::new();
        let n = resolve_collisions(set.as_mut_slice(), &grid, &MODEL, &mut contacts);

        assert_eq!(n, 3);
        let mut pairs: Vec<_> = contacts.iter().map(|c| (c.a, c.b)).collect();
        pairs.sort();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_contacts_ordered_by_first_index() {
        let mut set = ParticleSet::new();
        for i in 0..6 {
            set.spawn(Vec2::new(0.3 + 0.06 * i as f32, 0.5), Vec2::ZERO, 0.05, 1.0)
                .unwrap();
        }
        let grid = rebuilt_grid(&set, 0.05);

        let mut contacts = Vec::new();
        detect_contacts(set.as_slice(), &grid, &MODEL, &mut contacts);

        assert_eq!(contacts.len(), 5);
        assert!(contacts.windows(2).all(|w| w[0].a <= w[1].a));
        assert!(contacts.iter().all(|c| c.a < c.b));
    }

    #[test]
    fn test_net_contact_force_is_zero() {
        let mut set = ParticleSet::new();
        for i in 0..5 {
            for j in 0..5 {
                let jitter = 0.003 * ((i * 7 + j * 3) % 5) as f32;
                set.spawn(
                    Vec2::new(0.3 + 0.08 * i as f32 + jitter, 0.3 + 0.08 * j as f32),
                    Vec2::ZERO,
                    0.05,
                    1.0,
                )
                .unwrap();
            }
        }
        let grid = rebuilt_grid(&set, 0.05);

        let mut contacts = Vec::new();
        let n = resolve_collisions(set.as_mut_slice(), &grid, &MODEL, &mut contacts);
        assert!(n > 0);

        let net: Vec2 = set.iter().map(|p| p.force).sum();
        assert!(net.length() < 1e-2);
    }

    #[test]
    #[cfg(feature = "parallel")]
    fn test_parallel_detection_matches_serial_scan() {
        let mut set = ParticleSet::new();
        for i in 0..12 {
            for j in 0..12 {
                let jitter = 0.002 * ((i * 5 + j * 11) % 7) as f32;
                set.spawn(
                    Vec2::new(0.1 + 0.018 * i as f32 + jitter, 0.1 + 0.018 * j as f32 - jitter),
                    Vec2::new(0.1 * (i % 3) as f32, -0.1 * (j % 4) as f32),
                    0.01,
                    1.0,
                )
                .unwrap();
            }
        }
        let grid = rebuilt_grid(&set, 0.01);

        let mut parallel = Vec::new();
        detect_contacts(set.as_slice(), &grid, &MODEL, &mut parallel);

        let mut serial = Vec::new();
        let mut candidates = Vec::new();
        for i in 0..set.len() {
            push_contacts(i, set.as_slice(), &grid, &MODEL, &mut candidates, &mut serial);
        }

        assert!(!serial.is_empty());
        assert_eq!(parallel, serial);
    }
}
