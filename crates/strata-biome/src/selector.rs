//! Climate-to-biome selection.
//!
//! Given a climate point and a candidate pool, pick the biome whose climate
//! coordinates lie within tolerance. When nothing matches the tolerance is
//! widened a bounded number of times, then the climatically nearest candidate
//! wins. Several matches are resolved by a weighted pick from an RNG seeded on
//! the (snapped) chunk coordinate, so repeated queries agree.

use rand::Rng;
use tracing::{debug, trace};

use crate::biome::{BiomeId, BiomeMetadataIndex};
use crate::climate::ClimatePoint;
use crate::pool::CandidatePool;
use crate::seed::{self, salt};

/// Multiplier applied to the tolerance on each widening step.
pub const WIDEN_FACTOR: f64 = 2.0;
/// Maximum number of widening steps before falling back to the nearest candidate.
pub const MAX_WIDEN_STEPS: u32 = 3;

/// A pool member resolved against the index.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    id: BiomeId,
    weight: u32,
    distance: f64,
}

/// Picks a biome for a climate point from a candidate pool.
#[derive(Clone, Debug)]
pub struct ClimateSelector {
    world_seed: u64,
    tolerance: f64,
    fallback: BiomeId,
}

impl ClimateSelector {
    /// Create a selector with the dimension's base tolerance and fallback biome.
    pub fn new(world_seed: u64, tolerance: f64, fallback: BiomeId) -> Self {
        Self {
            world_seed,
            tolerance: tolerance.max(0.0),
            fallback,
        }
    }

    /// Configured base tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Biome returned when nothing in the pool resolves.
    pub fn fallback(&self) -> BiomeId {
        self.fallback
    }

    /// Select a biome for `climate` at the given chunk. Never fails.
    ///
    /// Pool members missing from the index are skipped. If none remain the
    /// fallback biome is returned.
    pub fn select(
        &self,
        climate: ClimatePoint,
        chunk_x: i32,
        chunk_z: i32,
        pool: &CandidatePool,
        index: &BiomeMetadataIndex,
    ) -> BiomeId {
        let candidates: Vec<Candidate> = pool
            .entries()
            .iter()
            .filter_map(|entry| match index.get(entry.id) {
                Some(record) => Some(Candidate {
                    id: entry.id,
                    weight: entry.weight.max(1),
                    distance: climate.distance(ClimatePoint::of(record)),
                }),
                None => {
                    debug!(biome = entry.id.0, "Pool member missing from index; skipped");
                    None
                }
            })
            .collect();

        if candidates.is_empty() {
            trace!(dimension = pool.dimension(), "No resolvable candidates; using fallback");
            return self.fallback;
        }

        let mut tolerance = self.tolerance;
        for step in 0..=MAX_WIDEN_STEPS {
            let matches: Vec<Candidate> = candidates
                .iter()
                .copied()
                .filter(|c| c.distance <= tolerance)
                .collect();
            if !matches.is_empty() {
                if step > 0 {
                    trace!(step, tolerance, "Tolerance widened");
                }
                return self.weighted_pick(&matches, chunk_x, chunk_z);
            }
            tolerance *= WIDEN_FACTOR;
        }

        trace!(chunk_x, chunk_z, "No match after widening; using nearest candidate");
        nearest(&candidates).unwrap_or(self.fallback)
    }

    fn weighted_pick(&self, matches: &[Candidate], chunk_x: i32, chunk_z: i32) -> BiomeId {
        if let [only] = matches {
            return only.id;
        }
        let total: u64 = matches.iter().map(|c| u64::from(c.weight)).sum();
        let mut rng = seed::coord_rng(self.world_seed, salt::SELECT, chunk_x, chunk_z);
        let mut roll = rng.random_range(0..total);
        for candidate in matches {
            let weight = u64::from(candidate.weight);
            if roll < weight {
                return candidate.id;
            }
            roll -= weight;
        }
        matches[matches.len() - 1].id
    }
}

/// Closest candidate; the earliest pool member wins ties.
fn nearest(candidates: &[Candidate]) -> Option<BiomeId> {
    let mut best: Option<&Candidate> = None;
    for candidate in candidates {
        match best {
            Some(b) if candidate.distance >= b.distance => {}
            _ => best = Some(candidate),
        }
    }
    best.map(|c| c.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{BiomeCategory, RegisteredBiome};

    /// Desert at normalized (1.0, 0.0), Forest at (0.5, 0.6), Tundra at (-1.0, -0.2).
    fn fixture() -> (BiomeMetadataIndex, BiomeId, BiomeId, BiomeId) {
        let (index, _) = BiomeMetadataIndex::from_registered(vec![
            RegisteredBiome::new("minecraft:desert", 2.0, 0.5, BiomeCategory::Desert),
            RegisteredBiome::new("minecraft:forest", 1.375, 0.8, BiomeCategory::Forest),
            RegisteredBiome::new("minecraft:snowy_tundra", -0.5, 0.4, BiomeCategory::Icy),
        ]);
        let id = |key: &str| index.lookup_str(key).unwrap().id;
        let (desert, forest, tundra) = (id("desert"), id("forest"), id("snowy_tundra"));
        (index, desert, forest, tundra)
    }

    #[test]
    fn test_widening_converges_on_nearest() {
        // Distances from (0.8, 0.4): Forest ~0.361, Desert ~0.447.
        // 0.2 matches nothing; the first widening (0.4) admits only Forest.
        let (index, desert, forest, _) = fixture();
        let pool = CandidatePool::from_ids("strata:test", [desert, forest]);
        let selector = ClimateSelector::new(1, 0.2, desert);
        for (x, z) in [(0, 0), (5, -9), (1000, 1000)] {
            assert_eq!(selector.select(ClimatePoint::new(0.8, 0.4), x, z, &pool, &index), forest);
        }
    }

    #[test]
    fn test_widening_mirrored_prefers_desert() {
        // Distances from (0.95, -0.35): Desert ~0.354, Forest ~1.05.
        let (index, desert, forest, _) = fixture();
        let pool = CandidatePool::from_ids("strata:test", [forest, desert]);
        let selector = ClimateSelector::new(1, 0.2, forest);
        assert_eq!(
            selector.select(ClimatePoint::new(0.95, -0.35), 3, 4, &pool, &index),
            desert
        );
    }

    #[test]
    fn test_nearest_after_max_widening() {
        let (index, desert, forest, tundra) = fixture();
        let pool = CandidatePool::from_ids("strata:test", [desert, forest, tundra]);
        // 0.01 widens to 0.08 at most; Tundra at ~0.2 is still the nearest.
        let selector = ClimateSelector::new(1, 0.01, desert);
        assert_eq!(
            selector.select(ClimatePoint::new(-0.8, -0.2), 0, 0, &pool, &index),
            tundra
        );
    }

    #[test]
    fn test_nearest_tie_uses_pool_order() {
        let (twins, _) = BiomeMetadataIndex::from_registered(vec![
            RegisteredBiome::new("pack:a", 0.75, 1.0, BiomeCategory::None),
            RegisteredBiome::new("pack:b", 0.75, 0.0, BiomeCategory::None),
        ]);
        let a = twins.lookup_str("pack:a").unwrap().id;
        let b = twins.lookup_str("pack:b").unwrap().id;
        // Both sit exactly 1.0 away from the origin; widening from 0.01 never reaches them.
        let selector = ClimateSelector::new(1, 0.01, a);
        let ab = CandidatePool::from_ids("strata:test", [a, b]);
        let ba = CandidatePool::from_ids("strata:test", [b, a]);
        let target = ClimatePoint::new(0.0, 0.0);
        assert_eq!(selector.select(target, 0, 0, &ab, &twins), a);
        assert_eq!(selector.select(target, 0, 0, &ba, &twins), b);
    }

    #[test]
    fn test_weighted_pick_deterministic_and_biased() {
        let (index, _) = BiomeMetadataIndex::from_registered(vec![
            RegisteredBiome::new("pack:common", 0.75, 0.5, BiomeCategory::None),
            RegisteredBiome::new("pack:rare", 0.75, 0.5, BiomeCategory::None),
        ]);
        let common = index.lookup_str("pack:common").unwrap().id;
        let rare = index.lookup_str("pack:rare").unwrap().id;
        let mut rules = strata_config::PoolRules {
            include_base: false,
            include_sources: vec!["pack".into()],
            ..Default::default()
        };
        rules.weights.insert("pack:common".into(), 9);
        let pool = CandidatePool::build("strata:test", &rules, &index).pool;
        let selector = ClimateSelector::new(77, 0.1, common);
        let target = ClimatePoint::new(0.0, 0.0);

        let mut common_count = 0;
        for x in 0..2000 {
            let pick = selector.select(target, x, -x, &pool, &index);
            assert_eq!(pick, selector.select(target, x, -x, &pool, &index));
            assert!(pick == common || pick == rare);
            if pick == common {
                common_count += 1;
            }
        }
        assert!(
            (1600..1990).contains(&common_count),
            "expected ~90% common, got {common_count}/2000"
        );
    }

    #[test]
    fn test_missing_members_fall_back() {
        let (index, desert, _, _) = fixture();
        let selector = ClimateSelector::new(1, 0.2, desert);
        let ghost = CandidatePool::from_ids("strata:test", [BiomeId(999)]);
        assert_eq!(selector.select(ClimatePoint::new(0.0, 0.0), 0, 0, &ghost, &index), desert);
        let empty = CandidatePool::from_ids("strata:test", []);
        assert_eq!(selector.select(ClimatePoint::new(0.0, 0.0), 0, 0, &empty, &index), desert);
    }

    #[test]
    fn test_missing_member_skipped_not_fatal() {
        let (index, desert, forest, _) = fixture();
        let pool = CandidatePool::from_ids("strata:test", [BiomeId(500), forest]);
        let selector = ClimateSelector::new(1, 0.2, desert);
        assert_eq!(selector.select(ClimatePoint::new(0.5, 0.6), 0, 0, &pool, &index), forest);
    }
}
