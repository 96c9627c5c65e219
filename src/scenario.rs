//! Scenario files and initial particle placement
//!
//! A scenario is a YAML document with optional `physics`, `grid` and `spawn`
//! sections. Missing fields fall back to the reference values:
//!
//! ```yaml
//! physics:
//!   gravity: [0.0, -9.8]
//!   time_step: 1.0e-4
//!   sub_steps_per_frame: 10
//!   restitution: 0.8
//! spawn:
//!   count: 100
//!   radius: 0.0125
//!   seed: 7
//! ```

use glam::Vec2;
use particle_physics::{
    ConfigError, GridConfig, ParticleSet, PhysicsConfig, PARTICLE_MASS, PARTICLE_RADIUS,
};
use particle_simulation::pack_rgba;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub physics: PhysicsConfig,
    /// Defaults to the diameter of the spawned particles
    pub grid: Option<GridConfig>,
    pub spawn: SpawnConfig,
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let scenario: Scenario = serde_yaml::from_reader(reader)?;
        log::info!("Loaded scenario {}", path.display());
        Ok(scenario)
    }

    pub fn grid(&self) -> GridConfig {
        self.grid
            .unwrap_or_else(|| GridConfig::for_radius(self.spawn.radius))
    }
}

/// How the initial population is sampled
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub count: usize,
    pub radius: f32,
    pub mass: f32,
    /// Centers are drawn uniformly from `[low, high]` on both axes
    pub position_range: [f32; 2],
    /// Velocity components are drawn uniformly from `[-max_speed, max_speed]`
    pub max_speed: f32,
    pub seed: u64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            count: 100,
            radius: PARTICLE_RADIUS,
            mass: PARTICLE_MASS,
            position_range: [0.1, 0.9],
            max_speed: 0.5,
            seed: 0,
        }
    }
}

impl SpawnConfig {
    /// Check the sampling ranges; particle properties are checked on spawn
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [low, high] = self.position_range;
        // the sampled span has to be finite too
        if !(low <= high && (high - low).is_finite()) {
            return Err(ConfigError::InvalidSpawnRange { low, high });
        }
        if !(self.max_speed >= 0.0 && (2.0 * self.max_speed).is_finite()) {
            return Err(ConfigError::NegativeSpeed(self.max_speed));
        }
        Ok(())
    }

    /// Sample the population and a palette color for every particle
    pub fn populate(&self) -> Result<(ParticleSet, Vec<u32>), ConfigError> {
        self.validate()?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let palette = palette();
        let [low, high] = self.position_range;

        let mut particles = ParticleSet::with_capacity(self.count);
        let mut colors = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            let position = Vec2::new(rng.random_range(low..=high), rng.random_range(low..=high));
            let velocity = Vec2::new(
                rng.random_range(-self.max_speed..=self.max_speed),
                rng.random_range(-self.max_speed..=self.max_speed),
            );
            particles.spawn(position, velocity, self.radius, self.mass)?;
            colors.push(palette[rng.random_range(0..palette.len())]);
        }

        log::info!("✓ Spawned {} particles (seed {})", particles.len(), self.seed);
        Ok((particles, colors))
    }
}

/// Warm accent colors from Catppuccin Mocha, packed RGBA
fn palette() -> [u32; 8] {
    let c = &catppuccin::PALETTE.mocha.colors;
    [
        &c.red, &c.maroon, &c.peach, &c.yellow, &c.green, &c.teal, &c.sapphire, &c.mauve,
    ]
    .map(|color| pack_rgba(color.rgb.r, color.rgb.g, color.rgb.b, 0xFF))
}
