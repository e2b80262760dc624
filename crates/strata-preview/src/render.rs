//! Parallel ASCII biome maps.
//!
//! Map rows are handed to a pool of scoped worker threads over a bounded
//! channel; finished rows come back on a second channel and are stitched
//! together on the calling thread.

use std::fmt::Write as _;

use crossbeam_channel::{bounded, unbounded};
use hashbrown::HashMap;
use strata_biome::{BiomeId, BiomeMetadataIndex, GenerationContext};
use tracing::debug;

const GLYPHS: &[u8] = b"#.~^*+=%@&ox:-ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnpqrstuvwyz0123456789";

/// Area and height of one preview map.
#[derive(Clone, Copy, Debug)]
pub struct MapSpec {
    /// Chunk X at the centre of the map.
    pub center_chunk_x: i32,
    /// Chunk Z at the centre of the map.
    pub center_chunk_z: i32,
    /// Half-width of the map in chunks.
    pub radius_chunks: u32,
    /// Chunks covered by one map cell along each axis.
    pub chunks_per_cell: u32,
    /// Block Y sampled.
    pub y: i32,
}

impl MapSpec {
    /// Cells along each side.
    pub fn side(&self) -> usize {
        let cell = self.chunks_per_cell.max(1);
        ((self.radius_chunks.saturating_mul(2)) / cell).max(1) as usize
    }

    /// Block position sampled for a cell: the centre of the cell's middle chunk.
    fn sample_point(&self, col: usize, row: usize) -> (i32, i32) {
        let cell = i64::from(self.chunks_per_cell.max(1));
        let origin_x = i64::from(self.center_chunk_x) - i64::from(self.radius_chunks);
        let origin_z = i64::from(self.center_chunk_z) - i64::from(self.radius_chunks);
        let chunk_x = origin_x + col as i64 * cell + cell / 2;
        let chunk_z = origin_z + row as i64 * cell + cell / 2;
        let to_block = |chunk: i64| (chunk * 16 + 8).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        (to_block(chunk_x), to_block(chunk_z))
    }
}

/// A rendered square grid of biome ids, row-major.
#[derive(Debug, PartialEq, Eq)]
pub struct BiomeMap {
    side: usize,
    cells: Vec<BiomeId>,
}

/// One legend line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    /// Biome shown.
    pub id: BiomeId,
    /// Its namespaced key.
    pub key: String,
    /// Character used on the map.
    pub glyph: char,
    /// Cells it covers.
    pub count: usize,
}

/// Render `spec` using `threads` workers (0 = one per CPU).
pub fn render(ctx: &GenerationContext, spec: &MapSpec, threads: usize) -> BiomeMap {
    let side = spec.side();
    let threads = if threads == 0 { num_cpus::get() } else { threads }.clamp(1, side);

    let (row_tx, row_rx) = bounded::<usize>(side);
    let (done_tx, done_rx) = unbounded::<(usize, Vec<BiomeId>)>();
    for row in 0..side {
        if row_tx.send(row).is_err() {
            break;
        }
    }
    drop(row_tx);

    std::thread::scope(|scope| {
        for _ in 0..threads {
            let rows = row_rx.clone();
            let done = done_tx.clone();
            scope.spawn(move || {
                while let Ok(row) = rows.recv() {
                    let cells = (0..side)
                        .map(|col| {
                            let (x, z) = spec.sample_point(col, row);
                            ctx.biome_at(x, spec.y, z)
                        })
                        .collect();
                    if done.send((row, cells)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(done_tx);

    let mut cells = vec![ctx.fallback(); side * side];
    for (row, data) in done_rx.try_iter() {
        cells[row * side..(row + 1) * side].copy_from_slice(&data);
    }
    debug!(dimension = ctx.dimension(), side, threads, "Map rendered");
    BiomeMap { side, cells }
}

impl BiomeMap {
    /// Cells along each side.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Row-major cells.
    pub fn cells(&self) -> &[BiomeId] {
        &self.cells
    }

    /// Distinct biomes with their glyph and cell count, most common first.
    ///
    /// Glyphs are assigned in id order so a biome keeps its glyph between maps
    /// of the same dimension.
    pub fn legend(&self, index: &BiomeMetadataIndex) -> Vec<LegendEntry> {
        let mut counts: HashMap<BiomeId, usize> = HashMap::new();
        for id in &self.cells {
            *counts.entry(*id).or_default() += 1;
        }
        let mut ids: Vec<BiomeId> = counts.keys().copied().collect();
        ids.sort();

        let mut legend: Vec<LegendEntry> = ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| LegendEntry {
                id,
                key: index
                    .get(id)
                    .map(|record| record.key.to_string())
                    .unwrap_or_else(|| format!("<unknown {}>", id.0)),
                glyph: GLYPHS.get(i).map(|&b| b as char).unwrap_or('?'),
                count: counts[&id],
            })
            .collect();
        legend.sort_by(|a, b| b.count.cmp(&a.count).then(a.id.cmp(&b.id)));
        legend
    }

    /// The map as text, one line per row, using the glyphs from `legend`.
    pub fn to_ascii(&self, legend: &[LegendEntry]) -> String {
        let glyphs: HashMap<BiomeId, char> = legend.iter().map(|e| (e.id, e.glyph)).collect();
        let mut out = String::with_capacity(self.side * (self.side + 1));
        for row in self.cells.chunks(self.side) {
            for id in row {
                out.push(glyphs.get(id).copied().unwrap_or('?'));
            }
            out.push('\n');
        }
        out
    }
}

/// Legend as text lines: glyph, key, share of the map.
pub fn format_legend(legend: &[LegendEntry], total: usize) -> String {
    let mut out = String::new();
    for entry in legend {
        let share = entry.count as f64 * 100.0 / total.max(1) as f64;
        let _ = writeln!(out, "  {}  {:<40} {:>6.2}%", entry.glyph, entry.key, share);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use strata_biome::BiomeMetadataIndex;
    use strata_config::DimensionConfig;

    fn context() -> GenerationContext {
        let (index, _) = BiomeMetadataIndex::from_registered(crate::catalog::builtin());
        GenerationContext::from_config(&DimensionConfig::default(), Arc::new(index), 4242)
            .unwrap()
            .0
    }

    fn spec() -> MapSpec {
        MapSpec {
            center_chunk_x: 0,
            center_chunk_z: 0,
            radius_chunks: 64,
            chunks_per_cell: 4,
            y: 64,
        }
    }

    #[test]
    fn test_side() {
        assert_eq!(spec().side(), 32);
        let tiny = MapSpec {
            radius_chunks: 1,
            chunks_per_cell: 8,
            ..spec()
        };
        assert_eq!(tiny.side(), 1);
    }

    #[test]
    fn test_parallel_matches_single_thread() {
        let ctx = context();
        let single = render(&ctx, &spec(), 1);
        let parallel = render(&ctx, &spec(), 7);
        assert_eq!(single, parallel);
        assert_eq!(single.cells().len(), 32 * 32);
    }

    #[test]
    fn test_cells_match_direct_queries() {
        let ctx = context();
        let spec = spec();
        let map = render(&ctx, &spec, 3);
        for (row, col) in [(0, 0), (5, 17), (31, 31)] {
            let (x, z) = spec.sample_point(col, row);
            assert_eq!(map.cells()[row * map.side() + col], ctx.biome_at(x, spec.y, z));
        }
    }

    #[test]
    fn test_legend_and_ascii() {
        let ctx = context();
        let map = render(&ctx, &spec(), 0);
        let legend = map.legend(ctx.index());
        assert_eq!(legend.iter().map(|e| e.count).sum::<usize>(), 32 * 32);
        assert!(legend.windows(2).all(|w| w[0].count >= w[1].count));

        let ascii = map.to_ascii(&legend);
        let lines: Vec<&str> = ascii.lines().collect();
        assert_eq!(lines.len(), 32);
        assert!(lines.iter().all(|l| l.chars().count() == 32));
        assert!(!ascii.contains('?'));

        let text = format_legend(&legend, map.cells().len());
        assert_eq!(text.lines().count(), legend.len());
    }
}
