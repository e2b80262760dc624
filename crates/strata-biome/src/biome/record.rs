//! Biome records: the immutable, normalized description of one biome.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::BiomeKey;

/// Lowest raw temperature on the vanilla scale; maps to -1.
pub const RAW_TEMPERATURE_MIN: f64 = -0.5;
/// Highest raw temperature on the vanilla scale; maps to +1.
pub const RAW_TEMPERATURE_MAX: f64 = 2.0;

/// Compact identifier of an indexed biome, dense in registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeId(pub u16);

/// Broad biome category, mostly useful for filtering and display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomeCategory {
    /// No particular category.
    #[default]
    None,
    /// Open water.
    Ocean,
    /// Shorelines.
    Beach,
    /// Rivers and their banks.
    River,
    /// Open grassland.
    Plains,
    /// Temperate woodland.
    Forest,
    /// Hot, wet woodland.
    Jungle,
    /// Hot, dry grassland.
    Savanna,
    /// Sand deserts.
    Desert,
    /// Badlands and terracotta.
    Mesa,
    /// Cold conifer forest.
    Taiga,
    /// Snow and ice.
    Icy,
    /// Peaks and slopes.
    Mountain,
    /// Wetlands and mangroves.
    Swamp,
    /// Mushroom fields.
    Mushroom,
    /// Cave biomes.
    Underground,
    /// Nether biomes.
    Nether,
    /// End biomes.
    TheEnd,
}

/// A biome as supplied by the host's content registry, before normalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegisteredBiome {
    /// Namespaced id, e.g. `"minecraft:desert"`.
    pub key: String,
    /// Raw temperature on the vanilla scale (`-0.5` frozen .. `2.0` scorching).
    pub temperature: f64,
    /// Raw downfall in `[0.0, 1.0]`.
    pub downfall: f64,
    /// Owning content source. Defaults to the key's namespace.
    #[serde(default)]
    pub source: Option<String>,
    /// Broad category.
    #[serde(default)]
    pub category: BiomeCategory,
    /// Arbitrary tags (e.g. `"is_overworld"`, `"has_structure/village"`).
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RegisteredBiome {
    /// Convenience constructor for biomes without source override or tags.
    pub fn new(key: &str, temperature: f64, downfall: f64, category: BiomeCategory) -> Self {
        Self {
            key: key.to_string(),
            temperature,
            downfall,
            source: None,
            category,
            tags: Vec::new(),
        }
    }
}

/// Immutable metadata for one indexed biome.
#[derive(Clone, Debug)]
pub struct BiomeRecord {
    /// Dense id inside the owning index.
    pub id: BiomeId,
    /// Namespaced key.
    pub key: BiomeKey,
    /// Owning content source (mod or data pack name).
    pub source: String,
    /// Normalized temperature in `[-1.0, 1.0]`.
    pub temperature: f64,
    /// Normalized moisture in `[-1.0, 1.0]`.
    pub moisture: f64,
    /// Broad category.
    pub category: BiomeCategory,
    /// Arbitrary tags.
    pub tags: HashSet<String>,
}

impl BiomeRecord {
    /// Returns `true` if the record carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Map a raw vanilla temperature onto `[-1, 1]`.
pub fn normalize_temperature(raw: f64) -> f64 {
    let span = RAW_TEMPERATURE_MAX - RAW_TEMPERATURE_MIN;
    ((raw - RAW_TEMPERATURE_MIN) / span * 2.0 - 1.0).clamp(-1.0, 1.0)
}

/// Map a raw downfall in `[0, 1]` onto `[-1, 1]`.
pub fn normalize_downfall(raw: f64) -> f64 {
    (raw * 2.0 - 1.0).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_normalization_endpoints() {
        assert_eq!(normalize_temperature(-0.5), -1.0);
        assert_eq!(normalize_temperature(2.0), 1.0);
        assert!((normalize_temperature(0.75) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalization_clamps() {
        assert_eq!(normalize_temperature(5.0), 1.0);
        assert_eq!(normalize_temperature(-3.0), -1.0);
        assert_eq!(normalize_downfall(1.5), 1.0);
        assert_eq!(normalize_downfall(0.5), 0.0);
    }

    #[test]
    fn test_registered_biome_from_ron() {
        let src = r#"(key: "terralith:moonlight_grove", temperature: 0.6, downfall: 0.4, category: forest, tags: ["is_overworld"])"#;
        let biome: RegisteredBiome = ron::from_str(src).unwrap();
        assert_eq!(biome.category, BiomeCategory::Forest);
        assert_eq!(biome.source, None);
        assert_eq!(biome.tags, vec!["is_overworld".to_string()]);
    }
}
