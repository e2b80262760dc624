//! Biome metadata index: maps [`BiomeId`] and [`BiomeKey`] to [`BiomeRecord`].
//!
//! Built once per world start, after every content source has registered its
//! biomes and before any chunk is generated. Read-only afterwards, so it can be
//! shared across worker threads behind an `Arc` without locking.

use std::collections::BTreeSet;

use hashbrown::{HashMap, HashSet};
use tracing::{info, warn};

use super::record::{normalize_downfall, normalize_temperature};
use super::{BiomeId, BiomeKey, BiomeRecord, RegisteredBiome};
use crate::climate::ClimatePoint;
use crate::error::ConfigWarning;

/// Catalog of every known biome with O(1) lookup by id and by key.
#[derive(Debug, Default)]
pub struct BiomeMetadataIndex {
    /// Dense array where `index == BiomeId.0`.
    records: Vec<BiomeRecord>,
    /// Reverse lookup: key → id.
    by_key: HashMap<BiomeKey, BiomeId>,
    built: bool,
}

impl BiomeMetadataIndex {
    /// Creates an empty, unbuilt index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: create and build in one step.
    pub fn from_registered(
        registered: impl IntoIterator<Item = RegisteredBiome>,
    ) -> (Self, Vec<ConfigWarning>) {
        let mut index = Self::new();
        let warnings = index.build(registered).unwrap_or_default();
        (index, warnings)
    }

    /// Scan the full biome universe once and index every record.
    ///
    /// Returns `None` without touching the index if it was already built.
    /// Invalid or duplicate keys are skipped and reported as warnings; the
    /// first registration of a key wins.
    pub fn build(
        &mut self,
        registered: impl IntoIterator<Item = RegisteredBiome>,
    ) -> Option<Vec<ConfigWarning>> {
        if self.built {
            return None;
        }

        let mut warnings = Vec::new();
        for biome in registered {
            let key = match BiomeKey::parse(&biome.key) {
                Ok(key) => key,
                Err(err) => {
                    warnings.push(ConfigWarning::InvalidKey {
                        key: biome.key.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            if self.by_key.contains_key(&key) {
                warnings.push(ConfigWarning::DuplicateBiome {
                    key: key.to_string(),
                });
                continue;
            }
            if self.records.len() > u16::MAX as usize {
                warnings.push(ConfigWarning::IndexFull {
                    key: key.to_string(),
                });
                continue;
            }

            let id = BiomeId(self.records.len() as u16);
            let source = biome
                .source
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| key.namespace().to_string());
            self.by_key.insert(key.clone(), id);
            self.records.push(BiomeRecord {
                id,
                key,
                source,
                temperature: normalize_temperature(biome.temperature),
                moisture: normalize_downfall(biome.downfall),
                category: biome.category,
                tags: biome.tags.into_iter().collect::<HashSet<_>>(),
            });
        }

        for warning in &warnings {
            warn!(target: "strata_biome::index", "{warning}");
        }
        info!(
            biomes = self.records.len(),
            sources = self.sources().len(),
            "Biome metadata index built"
        );
        self.built = true;
        Some(warnings)
    }

    /// Returns `true` once [`build`](Self::build) has run.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Looks up a record by its id.
    pub fn get(&self, id: BiomeId) -> Option<&BiomeRecord> {
        self.records.get(id.0 as usize)
    }

    /// Looks up a record by key.
    pub fn lookup(&self, key: &BiomeKey) -> Option<&BiomeRecord> {
        self.by_key.get(key).and_then(|id| self.get(*id))
    }

    /// Looks up a record by raw key string; unparsable keys yield `None`.
    pub fn lookup_str(&self, key: &str) -> Option<&BiomeRecord> {
        BiomeKey::parse(key).ok().and_then(|key| self.lookup(&key))
    }

    /// All records within `tolerance` climate distance of the target, in id order.
    pub fn query_by_climate(
        &self,
        target_temperature: f64,
        target_moisture: f64,
        tolerance: f64,
    ) -> Vec<&BiomeRecord> {
        let target = ClimatePoint::new(target_temperature, target_moisture);
        self.records
            .iter()
            .filter(|record| target.distance(ClimatePoint::of(record)) <= tolerance)
            .collect()
    }

    /// Sorted distinct content sources.
    pub fn sources(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.source.as_str()).collect()
    }

    /// Records whose source equals `source`, in id order.
    pub fn by_source<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a BiomeRecord> + 'a {
        self.records.iter().filter(move |r| r.source == source)
    }

    /// Records carrying `tag`, in id order.
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a BiomeRecord> + 'a {
        self.records.iter().filter(move |r| r.has_tag(tag))
    }

    /// All records in id order.
    pub fn iter(&self) -> impl Iterator<Item = &BiomeRecord> {
        self.records.iter()
    }

    /// Returns the number of indexed biomes.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no biomes are indexed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::BiomeCategory;

    fn registered() -> Vec<RegisteredBiome> {
        vec![
            RegisteredBiome::new("minecraft:desert", 2.0, 0.0, BiomeCategory::Desert),
            RegisteredBiome::new("minecraft:forest", 0.7, 0.8, BiomeCategory::Forest),
            RegisteredBiome::new("minecraft:snowy_plains", -0.5, 0.5, BiomeCategory::Icy),
            RegisteredBiome {
                tags: vec!["is_mountain".into()],
                ..RegisteredBiome::new("terralith:alpine_grove", -0.2, 0.6, BiomeCategory::Mountain)
            },
        ]
    }

    #[test]
    fn test_build_indexes_every_biome() {
        let (index, warnings) = BiomeMetadataIndex::from_registered(registered());
        assert!(warnings.is_empty());
        assert!(index.is_built());
        assert_eq!(index.len(), 4);

        let desert = index.lookup_str("minecraft:desert").unwrap();
        assert_eq!(desert.id, BiomeId(0));
        assert_eq!(desert.temperature, 1.0);
        assert_eq!(desert.moisture, -1.0);
        assert_eq!(desert.source, "minecraft");
        assert_eq!(index.get(BiomeId(3)).unwrap().source, "terralith");
    }

    #[test]
    fn test_second_build_is_noop() {
        let mut index = BiomeMetadataIndex::new();
        assert!(index.build(registered()).is_some());
        let extra = vec![RegisteredBiome::new("pack:extra", 0.5, 0.5, BiomeCategory::None)];
        assert!(index.build(extra).is_none());
        assert_eq!(index.len(), 4);
        assert!(index.lookup_str("pack:extra").is_none());
    }

    #[test]
    fn test_duplicate_and_invalid_keys_warn() {
        let mut input = registered();
        input.push(RegisteredBiome::new("minecraft:desert", 0.0, 1.0, BiomeCategory::None));
        input.push(RegisteredBiome::new("Bad Key", 0.0, 0.0, BiomeCategory::None));
        let (index, warnings) = BiomeMetadataIndex::from_registered(input);

        assert_eq!(index.len(), 4);
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], ConfigWarning::DuplicateBiome { .. }));
        assert!(matches!(warnings[1], ConfigWarning::InvalidKey { .. }));
        // First registration wins.
        assert_eq!(index.lookup_str("desert").unwrap().temperature, 1.0);
    }

    #[test]
    fn test_query_by_climate() {
        let (index, _) = BiomeMetadataIndex::from_registered(registered());
        let hot_dry: Vec<&str> = index
            .query_by_climate(0.9, -0.9, 0.2)
            .into_iter()
            .map(|r| r.key.as_str())
            .collect();
        assert_eq!(hot_dry, vec!["minecraft:desert"]);

        assert_eq!(index.query_by_climate(0.0, 0.0, 3.0).len(), 4);
        assert!(index.query_by_climate(0.0, 0.0, 0.01).is_empty());
    }

    #[test]
    fn test_source_and_tag_queries() {
        let (index, _) = BiomeMetadataIndex::from_registered(registered());
        let sources: Vec<&str> = index.sources().into_iter().collect();
        assert_eq!(sources, vec!["minecraft", "terralith"]);
        assert_eq!(index.by_source("minecraft").count(), 3);
        let tagged: Vec<_> = index.with_tag("is_mountain").map(|r| r.id).collect();
        assert_eq!(tagged, vec![BiomeId(3)]);
    }

    #[test]
    fn test_source_override() {
        let biome = RegisteredBiome {
            source: Some("my_datapack".into()),
            ..RegisteredBiome::new("minecraft:custom_grove", 0.5, 0.5, BiomeCategory::Forest)
        };
        let (index, _) = BiomeMetadataIndex::from_registered([biome]);
        assert_eq!(index.lookup_str("custom_grove").unwrap().source, "my_datapack");
    }
}
