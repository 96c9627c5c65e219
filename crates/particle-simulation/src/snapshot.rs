//! Renderer-facing view of the particle population
//!
//! Layout matches a 16 byte storage-buffer element so a renderer can upload
//! the snapshot slice directly with `bytemuck::cast_slice`.

use bytemuck::{Pod, Zeroable};
use particle_physics::Particle;

/// Opaque white
pub const DEFAULT_COLOR: u32 = 0xFFFF_FFFF;

/// Pack 8-bit RGBA channels as `0xRRGGBBAA`
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// Center in normalized domain coordinates
    pub position: [f32; 2],
    pub radius: f32,
    /// Packed `0xRRGGBBAA`
    pub color: u32,
}

/// Overwrite `out` with one instance per particle, in particle order.
///
/// `colors[i]` tints particle `i`; particles past the end of `colors` get
/// [`DEFAULT_COLOR`].
pub fn write_snapshot(particles: &[Particle], colors: &[u32], out: &mut Vec<ParticleInstance>) {
    out.clear();
    out.extend(particles.iter().enumerate().map(|(i, p)| ParticleInstance {
        position: p.position.to_array(),
        radius: p.radius(),
        color: colors.get(i).copied().unwrap_or(DEFAULT_COLOR),
    }));
}
