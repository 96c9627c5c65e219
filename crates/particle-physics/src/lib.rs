//! # Particle Physics Engine
//!
//! CPU kernels for a 2D discrete-element simulation of soft discs: a spatial
//! hash broad phase, a penalty spring-damper contact model, and a symplectic
//! Euler integrator with clamp-and-reflect walls.

pub mod config;
pub mod constants;
pub mod forces;
pub mod grid;
pub mod integrator;
pub mod particle;

pub use config::*;
pub use constants::*;
pub use forces::*;
pub use grid::*;
pub use integrator::*;
pub use particle::*;
