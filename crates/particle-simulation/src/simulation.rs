//! Fixed-step driver for the contact simulation
//!
//! One sub-step runs, in order: reset forces, add gravity, rebuild the grid,
//! resolve contacts, integrate and bounce off the walls. All contact forces
//! of a sub-step are accumulated before any particle moves.

use crate::diagnostics;
use particle_physics::{
    apply_gravity, integrate_all, resolve_collisions, Boundary, Contact, ContactModel, Particle,
    ParticleId, PhysicsConfig, SpatialHashGrid,
};

/// What happened during one [`advance`] call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Sub-steps executed
    pub sub_steps: u32,
    /// Pair interactions applied, summed over all sub-steps
    pub contacts: usize,
    /// Particles whose position, velocity or force is no longer finite
    pub non_finite: Vec<ParticleId>,
}

impl StepReport {
    pub fn is_finite(&self) -> bool {
        self.non_finite.is_empty()
    }
}

/// Per-sub-step kernels and scratch space, built once from a config
pub(crate) struct Stepper {
    model: ContactModel,
    boundary: Boundary,
    gravity: glam::Vec2,
    dt: f32,
    contacts: Vec<Contact>,
}

impl Stepper {
    pub(crate) fn new(config: &PhysicsConfig) -> Self {
        Self {
            model: ContactModel::from_config(config),
            boundary: Boundary::from_config(config),
            gravity: config.gravity,
            dt: config.time_step,
            contacts: Vec::new(),
        }
    }

    /// Run one sub-step, returning the number of contacts applied
    pub(crate) fn sub_step(
        &mut self,
        particles: &mut [Particle],
        grid: &mut SpatialHashGrid,
    ) -> usize {
        for p in particles.iter_mut() {
            p.reset_force();
        }
        apply_gravity(particles, self.gravity);

        grid.rebuild(particles);
        let contacts = resolve_collisions(particles, grid, &self.model, &mut self.contacts);

        integrate_all(particles, self.dt, &self.boundary);
        contacts
    }

    pub(crate) fn run(
        &mut self,
        particles: &mut [Particle],
        grid: &mut SpatialHashGrid,
        sub_steps: u32,
    ) -> StepReport {
        let mut report = StepReport {
            sub_steps,
            ..Default::default()
        };

        for _ in 0..sub_steps {
            report.contacts += self.sub_step(particles, grid);
        }

        diagnostics::collect_non_finite(particles, &mut report.non_finite);
        for id in &report.non_finite {
            log::warn!("particle {} has non-finite state", id);
        }

        report
    }
}

/// Advance `particles` in place by `sub_steps` sub-steps.
///
/// `config` is assumed valid (see [`PhysicsConfig::validate`]) and `grid`
/// must use a cell size of at least the largest particle diameter. The grid
/// is rebuilt every sub-step, whatever it held before is discarded.
pub fn advance(
    particles: &mut [Particle],
    grid: &mut SpatialHashGrid,
    config: &PhysicsConfig,
    sub_steps: u32,
) -> StepReport {
    let max_radius = particles.iter().map(Particle::radius).fold(0.0, f32::max);
    debug_assert!(
        grid.cell_size() >= 2.0 * max_radius,
        "cell size {} is smaller than the largest particle diameter {}",
        grid.cell_size(),
        2.0 * max_radius
    );
    Stepper::new(config).run(particles, grid, sub_steps)
}
