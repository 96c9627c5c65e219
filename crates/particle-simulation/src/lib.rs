//! # Particle Simulation Engine
//!
//! Steps a population of soft discs through gravity, contact and wall forces
//! at a fixed sub-step, and publishes a flat snapshot for renderers.

pub mod diagnostics;
pub mod simulation;
pub mod snapshot;
pub mod state;

pub use simulation::*;
pub use snapshot::*;
pub use state::*;
