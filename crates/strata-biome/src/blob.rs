//! Organic biome regions ("blobs").
//!
//! Chunk positions are domain-warped by two seeded simplex fields, then
//! floor-divided into square cells of side `min_biome_size_chunks`. Every chunk
//! in a cell snaps to the same representative (the cell centre), so anything
//! sampled at the representative is shared by the whole blob. Warping bends
//! the cell edges into curves; with zero irregularity the cells are exact
//! squares.
//!
//! Nothing is cached: the representative is recomputed on every call.

use glam::DVec2;
use noise::{NoiseFn, Simplex};

use crate::seed::{self, det_floor, salt};

/// A horizontal chunk coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
    /// Chunk X.
    pub x: i32,
    /// Chunk Z.
    pub z: i32,
}

impl ChunkPos {
    /// Creates a chunk position.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing the block column `(block_x, block_z)`.
    pub const fn from_block(block_x: i32, block_z: i32) -> Self {
        Self::new(block_x >> 4, block_z >> 4)
    }
}

/// Snaps chunk coordinates to their blob representative.
pub struct BlobPartitioner {
    warp_x: Simplex,
    warp_z: Simplex,
    size: i32,
    amplitude: f64,
    frequency: f64,
}

impl BlobPartitioner {
    /// Create a partitioner with cells of `size` chunks (clamped to at least 1)
    /// and boundary warp scaled by `irregularity` in `[0, 1]`.
    pub fn new(world_seed: u64, size: u32, irregularity: f64) -> Self {
        let size = size.clamp(1, i32::MAX as u32) as i32;
        let side = f64::from(size);
        Self {
            warp_x: Simplex::new(seed::noise_seed(world_seed, salt::WARP_X)),
            warp_z: Simplex::new(seed::noise_seed(world_seed, salt::WARP_Z)),
            size,
            amplitude: irregularity.clamp(0.0, 1.0) * max_warp(size),
            frequency: 1.0 / (4.0 * side),
        }
    }

    /// Cell side length in chunks.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Representative chunk of the blob containing `(chunk_x, chunk_z)`.
    pub fn snap_to_blob(&self, chunk_x: i32, chunk_z: i32) -> ChunkPos {
        let warped = self.warp(chunk_x, chunk_z);
        let side = f64::from(self.size);
        let cell_x = det_floor(warped.x / side) as i64;
        let cell_z = det_floor(warped.y / side) as i64;
        let half = i64::from(self.size / 2);
        let size = i64::from(self.size);
        ChunkPos::new(
            saturate(cell_x * size + half),
            saturate(cell_z * size + half),
        )
    }

    /// Warped position of a chunk centre.
    fn warp(&self, chunk_x: i32, chunk_z: i32) -> DVec2 {
        // Chunk centres avoid sampling exactly on cell edges.
        let p = DVec2::new(f64::from(chunk_x) + 0.5, f64::from(chunk_z) + 0.5);
        if self.amplitude == 0.0 {
            return p;
        }
        let q = p * self.frequency;
        let offset = DVec2::new(self.warp_x.get([q.x, q.y]), self.warp_z.get([q.x, q.y]));
        p + offset.clamp(DVec2::NEG_ONE, DVec2::ONE) * self.amplitude
    }
}

/// Largest warp offset, in chunks, that keeps a `ceil(sqrt(size))` square core
/// of every cell in place.
fn max_warp(size: i32) -> f64 {
    let size = size.max(1) as u32;
    let root = size.isqrt();
    let core = if root * root < size { root + 1 } else { root };
    let margin = (size - core) / 2;
    f64::from(margin) + 0.45
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn distinct_in_window(blobs: &BlobPartitioner, origin_x: i32, origin_z: i32) -> usize {
        let s = blobs.size();
        let mut seen = HashSet::new();
        for dx in 0..s {
            for dz in 0..s {
                seen.insert(blobs.snap_to_blob(origin_x + dx, origin_z + dz));
            }
        }
        seen.len()
    }

    #[test]
    fn test_from_block() {
        assert_eq!(ChunkPos::from_block(0, 15), ChunkPos::new(0, 0));
        assert_eq!(ChunkPos::from_block(16, -1), ChunkPos::new(1, -1));
        assert_eq!(ChunkPos::from_block(-16, -17), ChunkPos::new(-1, -2));
    }

    #[test]
    fn test_zero_irregularity_gives_exact_cells() {
        let blobs = BlobPartitioner::new(42, 8, 0.0);
        assert_eq!(blobs.snap_to_blob(0, 0), ChunkPos::new(4, 4));
        assert_eq!(blobs.snap_to_blob(7, 7), ChunkPos::new(4, 4));
        assert_eq!(blobs.snap_to_blob(8, 0), ChunkPos::new(12, 4));
        assert_eq!(blobs.snap_to_blob(-1, -8), ChunkPos::new(-4, -4));
        assert_eq!(blobs.snap_to_blob(-9, 3), ChunkPos::new(-12, 4));
    }

    #[test]
    fn test_deterministic_and_order_independent() {
        let a = BlobPartitioner::new(7, 6, 0.8);
        let b = BlobPartitioner::new(7, 6, 0.8);
        let forward: Vec<_> = (-100..100).map(|i| a.snap_to_blob(i, i * 3)).collect();
        let backward: Vec<_> = (-100..100).rev().map(|i| b.snap_to_blob(i, i * 3)).collect();
        assert!(forward.iter().eq(backward.iter().rev()));
    }

    #[test]
    fn test_snap_is_stable_for_representatives_at_zero_irregularity() {
        let blobs = BlobPartitioner::new(3, 5, 0.0);
        for x in -30..30 {
            let rep = blobs.snap_to_blob(x, -x);
            assert_eq!(blobs.snap_to_blob(rep.x, rep.z), rep);
        }
    }

    #[test]
    fn test_window_distinct_counts() {
        let regular = BlobPartitioner::new(11, 8, 0.0);
        let organic = BlobPartitioner::new(11, 8, 1.0);
        for ox in (-200..200).step_by(13) {
            for oz in (-200..200).step_by(17) {
                assert!(distinct_in_window(&regular, ox, oz) <= 4);
                assert!(distinct_in_window(&organic, ox, oz) <= 9);
            }
        }
    }

    #[test]
    fn test_irregularity_bends_edges() {
        let straight = BlobPartitioner::new(99, 8, 0.0);
        let warped = BlobPartitioner::new(99, 8, 1.0);
        let differs = (-64..64)
            .flat_map(|x| (-64..64).map(move |z| (x, z)))
            .any(|(x, z)| straight.snap_to_blob(x, z) != warped.snap_to_blob(x, z));
        assert!(differs);
    }

    #[test]
    fn test_blobs_never_smaller_than_size() {
        const LO: i32 = -72;
        const HI: i32 = 72;
        for seed in 0..3 {
            for size in 1..=8u32 {
                let blobs = BlobPartitioner::new(seed, size, 1.0);
                let mut counts: HashMap<ChunkPos, usize> = HashMap::new();
                for x in LO..HI {
                    for z in LO..HI {
                        *counts.entry(blobs.snap_to_blob(x, z)).or_default() += 1;
                    }
                }
                // Blobs near the sampled edge may extend outside it.
                let s = size as i32;
                let inner = |v: i32| v > LO + 2 * s && v < HI - 2 * s;
                let smallest = counts
                    .iter()
                    .filter(|(rep, _)| inner(rep.x) && inner(rep.z))
                    .map(|(_, n)| *n)
                    .min()
                    .unwrap();
                assert!(
                    smallest >= size as usize,
                    "seed {seed} size {size}: blob of {smallest} chunks"
                );
            }
        }
    }

    #[test]
    fn test_max_warp_leaves_core() {
        assert!(max_warp(1) < 0.5);
        assert!(max_warp(2) < 0.5);
        assert!(max_warp(4) < 1.5);
        for size in 1..=64 {
            assert!(max_warp(size) < f64::from(size) / 2.0);
        }
    }

    #[test]
    fn test_size_one_is_identity_cells() {
        let blobs = BlobPartitioner::new(1, 1, 0.0);
        assert_eq!(blobs.snap_to_blob(5, -5), ChunkPos::new(5, -5));
        assert_eq!(BlobPartitioner::new(1, 0, 0.0).size(), 1);
    }
}
