//! Uniform spatial hash used as the collision broad phase.
//!
//! Particles are bucketed by `floor(position / cell_size)` on each axis. With
//! `cell_size` at least the largest particle diameter, any two touching
//! particles sit in the same or adjacent cells, so scanning the 3×3 block
//! around a particle finds every contact candidate.
//!
//! The grid stores particle *indices* into the slice it was rebuilt from; it
//! never owns particles and must be rebuilt whenever positions change.

use crate::config::{ConfigError, GridConfig};
use crate::particle::Particle;
use glam::{IVec2, Vec2};
use std::collections::HashMap;

/// Integer cell coordinate packed into a single hash key.
///
/// The two `i32` axis indices are reinterpreted as `u32` and stored in the
/// high and low halves of a `u64`, which is a bijection between cell pairs
/// and keys, so distinct cells never share a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey(u64);

impl CellKey {
    pub fn new(cell: IVec2) -> Self {
        Self(((cell.x as u32 as u64) << 32) | (cell.y as u32 as u64))
    }

    pub fn cell(self) -> IVec2 {
        IVec2::new((self.0 >> 32) as u32 as i32, self.0 as u32 as i32)
    }
}

/// Offsets of the 3×3 neighborhood, own cell first
const NEIGHBORHOOD: [IVec2; 9] = [
    IVec2::new(0, 0),
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
];

#[derive(Debug, Clone)]
pub struct SpatialHashGrid {
    cell_size: f32,
    buckets: HashMap<CellKey, Vec<usize>>,
}

impl SpatialHashGrid {
    pub fn new(config: GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!("Spatial hash grid with cell size {}", config.cell_size);
        Ok(Self {
            cell_size: config.cell_size,
            buckets: HashMap::new(),
        })
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of non-empty cells
    pub fn occupied_cells(&self) -> usize {
        self.buckets.len()
    }

    /// Empty every bucket
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Cell containing `position`, rounding toward negative infinity
    pub fn cell_of(&self, position: Vec2) -> IVec2 {
        (position / self.cell_size).floor().as_ivec2()
    }

    /// Append particle `index` to the bucket of the cell at `position`
    pub fn insert(&mut self, index: usize, position: Vec2) {
        let key = CellKey::new(self.cell_of(position));
        self.buckets.entry(key).or_default().push(index);
    }

    /// Clear and re-insert every particle of `particles` by slice index
    pub fn rebuild(&mut self, particles: &[Particle]) {
        self.clear();
        for (index, particle) in particles.iter().enumerate() {
            self.insert(index, particle.position);
        }
    }

    /// Indices bucketed in the cell of `position`
    pub fn bucket(&self, position: Vec2) -> &[usize] {
        self.buckets
            .get(&CellKey::new(self.cell_of(position)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Candidates from the 3×3 block of cells around `position`.
    ///
    /// The result may contain the querying particle itself; callers filter
    /// self and already-visited pairs.
    pub fn query_neighbors(&self, position: Vec2) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_neighbors_into(position, &mut out);
        out
    }

    /// Same as [`Self::query_neighbors`] but appends into a reusable buffer
    pub fn query_neighbors_into(&self, position: Vec2, out: &mut Vec<usize>) {
        let center = self.cell_of(position);
        for offset in NEIGHBORHOOD {
            if let Some(bucket) = self.buckets.get(&CellKey::new(center + offset)) {
                out.extend_from_slice(bucket);
            }
        }
    }
}
