//! Biome catalogs: the built-in vanilla-like set, or a RON file of `RegisteredBiome`s.

use std::path::Path;

use strata_biome::{BiomeCategory, RegisteredBiome};

/// Errors loading a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The file could not be read.
    #[error("failed to read catalog: {0}")]
    Read(#[from] std::io::Error),
    /// The file is not a valid RON list of biomes.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Load a catalog: a RON list of `RegisteredBiome`.
pub fn load(path: &Path) -> Result<Vec<RegisteredBiome>, CatalogError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(ron::from_str(&contents)?)
}

/// A representative slice of the base game's overworld and underground biomes,
/// with their raw temperature and downfall.
pub fn builtin() -> Vec<RegisteredBiome> {
    use BiomeCategory as C;

    let table: &[(&str, f64, f64, BiomeCategory)] = &[
        ("plains", 0.8, 0.4, C::Plains),
        ("sunflower_plains", 0.8, 0.4, C::Plains),
        ("snowy_plains", 0.0, 0.5, C::Icy),
        ("ice_spikes", 0.0, 0.5, C::Icy),
        ("desert", 2.0, 0.0, C::Desert),
        ("swamp", 0.8, 0.9, C::Swamp),
        ("mangrove_swamp", 0.8, 0.9, C::Swamp),
        ("forest", 0.7, 0.8, C::Forest),
        ("flower_forest", 0.7, 0.8, C::Forest),
        ("birch_forest", 0.6, 0.6, C::Forest),
        ("dark_forest", 0.7, 0.8, C::Forest),
        ("old_growth_pine_taiga", 0.3, 0.8, C::Taiga),
        ("taiga", 0.25, 0.8, C::Taiga),
        ("snowy_taiga", -0.5, 0.4, C::Taiga),
        ("savanna", 2.0, 0.0, C::Savanna),
        ("savanna_plateau", 2.0, 0.0, C::Savanna),
        ("windswept_hills", 0.2, 0.3, C::Mountain),
        ("jungle", 0.95, 0.9, C::Jungle),
        ("sparse_jungle", 0.95, 0.8, C::Jungle),
        ("bamboo_jungle", 0.95, 0.9, C::Jungle),
        ("badlands", 2.0, 0.0, C::Mesa),
        ("wooded_badlands", 2.0, 0.0, C::Mesa),
        ("meadow", 0.5, 0.8, C::Mountain),
        ("cherry_grove", 0.5, 0.8, C::Mountain),
        ("grove", -0.2, 0.8, C::Mountain),
        ("snowy_slopes", -0.3, 0.9, C::Mountain),
        ("frozen_peaks", -0.7, 0.9, C::Mountain),
        ("stony_peaks", 1.0, 0.3, C::Mountain),
        ("river", 0.5, 0.5, C::River),
        ("beach", 0.8, 0.4, C::Beach),
        ("mushroom_fields", 0.9, 1.0, C::Mushroom),
        ("dripstone_caves", 0.8, 0.4, C::Underground),
        ("lush_caves", 0.5, 0.5, C::Underground),
        ("deep_dark", 0.8, 0.4, C::Underground),
    ];

    table
        .iter()
        .map(|&(path, temperature, downfall, category)| RegisteredBiome {
            tags: if category == C::Underground {
                vec!["is_underground".to_string()]
            } else {
                vec!["is_overworld".to_string()]
            },
            ..RegisteredBiome::new(&format!("minecraft:{path}"), temperature, downfall, category)
        })
        .collect()
}
