//! Region-mode bridge.
//!
//! Region dimensions leave placement to an external weighted-region
//! distributor. This module only hands that collaborator what it needs: one
//! entry per pool member, carrying the biome's climate as a parameter tuple
//! and its weight.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::biome::{BiomeKey, BiomeMetadataIndex};
use crate::pool::CandidatePool;

/// A closed parameter range `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Parameter {
    /// The full normalized range `[-1, 1]`.
    pub const FULL: Parameter = Parameter { min: -1.0, max: 1.0 };

    /// Range between two bounds, given in either order.
    pub fn new(min: f64, max: f64) -> Self {
        Parameter {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Degenerate range holding only `value`.
    pub fn point(value: f64) -> Self {
        Parameter { min: value, max: value }
    }

    /// Returns `true` if `value` lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Climate target of one region entry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClimateParameters {
    /// Normalized temperature.
    pub temperature: Parameter,
    /// Normalized moisture.
    pub humidity: Parameter,
    /// Inland distance axis. Full range unless the host narrows it.
    pub continentalness: Parameter,
    /// Terrain flatness axis.
    pub erosion: Parameter,
    /// Variant axis.
    pub weirdness: Parameter,
    /// Vertical axis; `0.0` is the surface.
    pub depth: Parameter,
    /// Distance penalty added by the distributor.
    pub offset: f64,
}

impl ClimateParameters {
    /// Parameters for a biome known only by temperature and moisture: those two
    /// are points, every other axis accepts its full range.
    pub fn from_climate(temperature: f64, moisture: f64) -> Self {
        Self {
            temperature: Parameter::point(temperature),
            humidity: Parameter::point(moisture),
            continentalness: Parameter::FULL,
            erosion: Parameter::FULL,
            weirdness: Parameter::FULL,
            depth: Parameter::point(0.0),
            offset: 0.0,
        }
    }
}

/// One biome offered to the region distributor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionEntry {
    /// Namespaced biome key.
    pub biome: BiomeKey,
    /// Climate target.
    pub parameters: ClimateParameters,
    /// Region weight scaled by the biome's pool weight.
    pub weight: u32,
}

/// Convert `pool` into distributor entries, in pool order.
///
/// Pool members missing from `index` are skipped.
pub fn export(pool: &CandidatePool, index: &BiomeMetadataIndex, weight: u32) -> Vec<RegionEntry> {
    let entries: Vec<RegionEntry> = pool
        .entries()
        .iter()
        .filter_map(|entry| {
            let Some(record) = index.get(entry.id) else {
                debug!(biome = entry.id.0, "Pool member missing from index; not exported");
                return None;
            };
            Some(RegionEntry {
                biome: record.key.clone(),
                parameters: ClimateParameters::from_climate(record.temperature, record.moisture),
                weight: weight.max(1).saturating_mul(entry.weight.max(1)),
            })
        })
        .collect();
    debug!(
        dimension = pool.dimension(),
        entries = entries.len(),
        "Region entries exported"
    );
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{BiomeCategory, BiomeId, RegisteredBiome};
    use strata_config::PoolRules;

    fn index() -> BiomeMetadataIndex {
        let (index, _) = BiomeMetadataIndex::from_registered(vec![
            RegisteredBiome::new("minecraft:desert", 2.0, 0.0, BiomeCategory::Desert),
            RegisteredBiome::new("minecraft:forest", 0.7, 0.8, BiomeCategory::Forest),
        ]);
        index
    }

    #[test]
    fn test_export_in_pool_order() {
        let index = index();
        let mut rules = PoolRules::default();
        rules.weights.insert("forest".into(), 3);
        let pool = CandidatePool::build("strata:region", &rules, &index).pool;
        let entries = export(&pool, &index, 10);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].biome.as_str(), "minecraft:desert");
        assert_eq!(entries[0].weight, 10);
        assert_eq!(entries[1].weight, 30);

        let desert = &entries[0].parameters;
        assert_eq!(desert.temperature, Parameter::point(1.0));
        assert_eq!(desert.humidity, Parameter::point(-1.0));
        assert_eq!(desert.continentalness, Parameter::FULL);
        assert_eq!(desert.erosion, Parameter::FULL);
        assert_eq!(desert.weirdness, Parameter::FULL);
        assert_eq!(desert.depth, Parameter::point(0.0));
        assert_eq!(desert.offset, 0.0);
    }

    #[test]
    fn test_missing_members_skipped() {
        let index = index();
        let pool = CandidatePool::from_ids("strata:region", [BiomeId(0), BiomeId(42)]);
        let entries = export(&pool, &index, 1);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_entries_serialize_to_ron() {
        let index = index();
        let pool = CandidatePool::from_ids("strata:region", [BiomeId(1)]);
        let entries = export(&pool, &index, 5);
        let text = ron::to_string(&entries).unwrap();
        assert!(text.contains("minecraft:forest"));
        let back: Vec<RegionEntry> = ron::from_str(&text).unwrap();
        assert_eq!(back, entries);
    }

    #[test]
    fn test_parameter_helpers() {
        let p = Parameter::new(0.5, -0.5);
        assert_eq!(p, Parameter { min: -0.5, max: 0.5 });
        assert!(p.contains(0.0));
        assert!(!p.contains(0.6));
    }
}
