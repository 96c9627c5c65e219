//! Reference parameter values for the contact simulation
//!
//! All lengths are normalized to the width of the simulation domain, so the
//! default domain is the unit square.

/// Sub-step length in seconds.
/// Must stay around 1e-4 for the default spring constant, larger steps let
/// particles tunnel deep into each other before the spring pushes back.
pub const DT: f32 = 1.0e-4;

/// Sub-steps advanced per rendered frame
pub const UPDATES_PER_FRAME: u32 = 10;

/// Gravitational acceleration (x, y)
pub const GRAVITY: [f32; 2] = [0.0, -9.8];

/// Penalty spring stiffness between overlapping particles
pub const K_SPRING: f32 = 30_000.0;

/// Damping along the contact normal
pub const K_DAMPING: f32 = 50.0;

/// Fraction of normal velocity kept after bouncing off a wall
pub const RESTITUTION: f32 = 0.8;

/// Default particle mass
pub const PARTICLE_MASS: f32 = 1.0;

/// Default particle radius (10 px on an 800 px wide window)
pub const PARTICLE_RADIUS: f32 = 10.0 / 800.0;

/// Lower corner of the default domain
pub const DOMAIN_MIN: [f32; 2] = [0.0, 0.0];

/// Upper corner of the default domain
pub const DOMAIN_MAX: [f32; 2] = [1.0, 1.0];
