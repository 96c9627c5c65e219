//! Runtime configuration for the contact simulation
//!
//! Values are checked once when a simulation is built. Stepping never
//! re-validates, so anything that would divide by zero or hash particles into
//! nonsense cells has to be caught here.

use crate::constants::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("time step must be positive and finite, got {0}")]
    NonPositiveTimeStep(f32),
    #[error("cell size must be positive and finite, got {0}")]
    NonPositiveCellSize(f32),
    #[error("spring constant must be positive and finite, got {0}")]
    NonPositiveSpringConstant(f32),
    #[error("damping constant must be non-negative and finite, got {0}")]
    NegativeDamping(f32),
    #[error("restitution must lie in [0, 1], got {0}")]
    RestitutionOutOfRange(f32),
    #[error("sub-steps per frame must be at least 1")]
    ZeroSubSteps,
    #[error("gravity must be finite, got {0}")]
    NonFiniteGravity(Vec2),
    #[error("bounds must satisfy min < max on both axes, got min {min} max {max}")]
    InvalidBounds { min: Vec2, max: Vec2 },
    #[error("particle radius must be positive and finite, got {0}")]
    NonPositiveRadius(f32),
    #[error("particle mass must be positive and finite, got {0}")]
    NonPositiveMass(f32),
    #[error("particle position and velocity must be finite")]
    NonFiniteState,
    #[error("cell size {cell_size} is smaller than the largest particle diameter ({max_radius} radius)")]
    CellTooSmall { cell_size: f32, max_radius: f32 },
    #[error("particle radius {max_radius} does not fit inside bounds of extent {extent}")]
    ParticleLargerThanDomain { max_radius: f32, extent: f32 },
    #[error("spawn range must be finite with low <= high, got [{low}, {high}]")]
    InvalidSpawnRange { low: f32, high: f32 },
    #[error("spawn speed must be non-negative and finite, got {0}")]
    NegativeSpeed(f32),
}

/// Axis-aligned walls the particles bounce off
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// The `[0,1]×[0,1]` domain
    pub fn unit() -> Self {
        Self::new(Vec2::from_array(DOMAIN_MIN), Vec2::from_array(DOMAIN_MAX))
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Whether a particle of `radius` centered at `position` lies fully inside
    pub fn contains(&self, position: Vec2, radius: f32) -> bool {
        position.x >= self.min.x + radius
            && position.x <= self.max.x - radius
            && position.y >= self.min.y + radius
            && position.y <= self.max.y - radius
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = self.min.is_finite()
            && self.max.is_finite()
            && self.min.x < self.max.x
            && self.min.y < self.max.y;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidBounds {
                min: self.min,
                max: self.max,
            })
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unit()
    }
}

/// Physics parameters shared by every sub-step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Uniform acceleration, applied as `mass * gravity`
    pub gravity: Vec2,
    /// Sub-step length (DT)
    pub time_step: f32,
    /// Sub-steps per rendered frame
    pub sub_steps_per_frame: u32,
    /// K_SPRING
    pub spring_constant: f32,
    /// K_DAMPING
    pub damping_constant: f32,
    /// Wall restitution in `[0, 1]`
    pub restitution: f32,
    pub bounds: Bounds,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::from_array(GRAVITY),
            time_step: DT,
            sub_steps_per_frame: UPDATES_PER_FRAME,
            spring_constant: K_SPRING,
            damping_constant: K_DAMPING,
            restitution: RESTITUTION,
            bounds: Bounds::unit(),
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(ConfigError::NonPositiveTimeStep(self.time_step));
        }
        if self.sub_steps_per_frame == 0 {
            return Err(ConfigError::ZeroSubSteps);
        }
        if !(self.spring_constant.is_finite() && self.spring_constant > 0.0) {
            return Err(ConfigError::NonPositiveSpringConstant(
                self.spring_constant,
            ));
        }
        if !(self.damping_constant.is_finite() && self.damping_constant >= 0.0) {
            return Err(ConfigError::NegativeDamping(self.damping_constant));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(ConfigError::RestitutionOutOfRange(self.restitution));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::NonFiniteGravity(self.gravity));
        }
        self.bounds.validate()
    }
}

/// Broad-phase grid configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Bucket width, normally the particle diameter
    pub cell_size: f32,
}

impl GridConfig {
    /// Cell size equal to the diameter of a particle of `radius`
    pub fn for_radius(radius: f32) -> Self {
        Self {
            cell_size: 2.0 * radius,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size.is_finite() && self.cell_size > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::NonPositiveCellSize(self.cell_size))
        }
    }

    /// Fails unless every pair that can touch lands in neighboring cells
    pub fn check_covers(&self, max_radius: f32) -> Result<(), ConfigError> {
        self.validate()?;
        if self.cell_size < 2.0 * max_radius {
            return Err(ConfigError::CellTooSmall {
                cell_size: self.cell_size,
                max_radius,
            });
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::for_radius(PARTICLE_RADIUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_physics_is_valid() {
        let config = PhysicsConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.sub_steps_per_frame, 10);
        assert_eq!(config.gravity, Vec2::new(0.0, -9.8));
    }

    #[test]
    fn test_rejects_bad_time_step() {
        let mut config = PhysicsConfig::default();
        config.time_step = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveTimeStep(0.0)));

        config.time_step = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveTimeStep(_))
        ));
    }

    #[test]
    fn test_rejects_restitution_above_one() {
        let config = PhysicsConfig {
            restitution: 1.2,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::RestitutionOutOfRange(1.2))
        );
    }

    #[test]
    fn test_zero_damping_is_allowed() {
        let config = PhysicsConfig {
            damping_constant: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let config = PhysicsConfig {
            bounds: Bounds::new(Vec2::ONE, Vec2::ZERO),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_grid_for_radius() {
        let grid = GridConfig::for_radius(0.05);
        assert_eq!(grid.cell_size, 0.1);
        assert_eq!(grid.check_covers(0.05), Ok(()));
        assert!(matches!(
            grid.check_covers(0.06),
            Err(ConfigError::CellTooSmall { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_cell_size() {
        let grid = GridConfig { cell_size: 0.0 };
        assert_eq!(grid.validate(), Err(ConfigError::NonPositiveCellSize(0.0)));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::unit();
        assert!(bounds.contains(Vec2::splat(0.5), 0.1));
        assert!(bounds.contains(Vec2::new(0.1, 0.9), 0.1));
        assert!(!bounds.contains(Vec2::new(0.05, 0.5), 0.1));
    }
}
