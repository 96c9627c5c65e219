//! Caller-owned simulation state

use crate::simulation::{StepReport, Stepper};
use crate::snapshot::{write_snapshot, ParticleInstance};
use particle_physics::{
    ConfigError, GridConfig, Particle, ParticleSet, PhysicsConfig, SpatialHashGrid,
};

/// Particles, broad-phase grid and configuration for one simulation.
///
/// Built once with validated inputs; stepping afterwards cannot fail.
pub struct SimulationState {
    particles: ParticleSet,
    grid: SpatialHashGrid,
    config: PhysicsConfig,
    stepper: Stepper,
    frames: u64,
    sub_steps: u64,
}

impl SimulationState {
    pub fn new(
        particles: ParticleSet,
        physics: PhysicsConfig,
        grid: GridConfig,
    ) -> Result<Self, ConfigError> {
        physics.validate()?;
        grid.check_covers(particles.max_radius())?;
        let extent = physics.bounds.size().min_element();
        if 2.0 * particles.max_radius() > extent {
            return Err(ConfigError::ParticleLargerThanDomain {
                max_radius: particles.max_radius(),
                extent,
            });
        }
        let stepper = Stepper::new(&physics);
        let grid = SpatialHashGrid::new(grid)?;

        log::info!(
            "Simulation ready: {} particles, dt {}, {} sub-steps per frame, cell size {}",
            particles.len(),
            physics.time_step,
            physics.sub_steps_per_frame,
            grid.cell_size()
        );

        Ok(Self {
            particles,
            grid,
            config: physics,
            stepper,
            frames: 0,
            sub_steps: 0,
        })
    }

    /// Run `sub_steps` sub-steps without counting a frame
    pub fn advance(&mut self, sub_steps: u32) -> StepReport {
        let report = self
            .stepper
            .run(self.particles.as_mut_slice(), &mut self.grid, sub_steps);
        self.sub_steps += u64::from(sub_steps);
        report
    }

    /// Run one frame worth of sub-steps
    pub fn step_frame(&mut self) -> StepReport {
        let report = self.advance(self.config.sub_steps_per_frame);
        self.frames += 1;
        log::trace!(
            "frame {}: {} contacts over {} sub-steps",
            self.frames,
            report.contacts,
            report.sub_steps
        );
        report
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.as_slice()
    }

    pub fn particle_set(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn grid(&self) -> &SpatialHashGrid {
        &self.grid
    }

    /// Frames completed through [`Self::step_frame`]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Total sub-steps run
    pub fn sub_steps(&self) -> u64 {
        self.sub_steps
    }

    /// Simulated seconds elapsed
    pub fn elapsed(&self) -> f64 {
        self.sub_steps as f64 * f64::from(self.config.time_step)
    }

    /// Write the renderer snapshot for the current state
    pub fn snapshot(&self, colors: &[u32], out: &mut Vec<ParticleInstance>) {
        write_snapshot(self.particles.as_slice(), colors, out);
    }
}
