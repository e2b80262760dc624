//! Vertical layer partitioning.
//!
//! A layered dimension stacks independent bands along Y. Each band resolves to
//! its single biome, or picks from a weighted list per chunk patch, and may
//! carve cave sub-regions that use a separate cave biome. No climate matching
//! happens here.

use noise::Simplex;
use strata_config::{LayerBiomes, LayerSpec, LayeredSettings};
use tracing::{debug, trace, warn};

use crate::biome::{BiomeId, BiomeMetadataIndex};
use crate::error::ConfigWarning;
use crate::seed::{self, fbm_3d, salt};

/// Cave noise frequency in blocks.
const CAVE_FREQUENCY: f64 = 1.0 / 48.0;
/// Octaves of the cave noise.
const CAVE_OCTAVES: u32 = 2;

/// Position of a Y level relative to the shape of its layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerZone {
    /// A filled layer; the host places terrain normally.
    Solid,
    /// Bottom shell of a hollow layer.
    Floor,
    /// Open space of a hollow layer.
    Interior,
    /// Top shell of a hollow layer.
    Ceiling,
}

#[derive(Clone, Debug)]
enum LayerChoice {
    Single(BiomeId),
    List { entries: Vec<(BiomeId, u32)>, total: u64 },
}

/// A layer with every biome reference resolved to an id.
#[derive(Clone, Debug)]
pub struct Layer {
    name: String,
    y_min: i32,
    y_max: i32,
    choice: LayerChoice,
    cave: Option<(BiomeId, f64)>,
    patch_size: i32,
    hollow: bool,
    floor_thickness: i64,
    ceiling_thickness: i64,
}

impl Layer {
    /// Operator-facing label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Covered `[y_min, y_max)` range.
    pub fn y_range(&self) -> std::ops::Range<i32> {
        self.y_min..self.y_max
    }

    /// Returns `true` for hollow (fill 0) layers.
    pub fn is_hollow(&self) -> bool {
        self.hollow
    }

    /// Every biome this layer can produce, cave biome included.
    pub fn biomes(&self) -> Vec<BiomeId> {
        let mut ids = match &self.choice {
            LayerChoice::Single(id) => vec![*id],
            LayerChoice::List { entries, .. } => entries.iter().map(|(id, _)| *id).collect(),
        };
        if let Some((cave, _)) = self.cave
            && !ids.contains(&cave)
        {
            ids.push(cave);
        }
        ids
    }
}

/// Maps a world Y (plus chunk position) to a biome for layered dimensions.
pub struct LayerPartitioner {
    world_seed: u64,
    layers: Vec<Layer>,
    cave_noise: Simplex,
    fallback: BiomeId,
}

impl LayerPartitioner {
    /// Resolve `settings` against the index.
    ///
    /// Unknown biome ids are reported and replaced: a single-biome layer uses the
    /// fallback, list entries are dropped, and an unknown cave biome disables
    /// caves for that layer.
    pub fn build(
        world_seed: u64,
        settings: &LayeredSettings,
        index: &BiomeMetadataIndex,
        fallback: BiomeId,
    ) -> (Self, Vec<ConfigWarning>) {
        let mut warnings = Vec::new();
        let mut layers: Vec<Layer> = settings
            .layers
            .iter()
            .map(|spec| resolve_layer(spec, index, fallback, &mut warnings))
            .collect();
        layers.sort_by_key(|layer| layer.y_min);

        for warning in &warnings {
            warn!("{warning}");
        }
        debug!(layers = layers.len(), "Layer partitioner built");

        let partitioner = Self {
            world_seed,
            layers,
            cave_noise: Simplex::new(seed::noise_seed(world_seed, salt::CAVE)),
            fallback,
        };
        (partitioner, warnings)
    }

    /// Layers in ascending Y order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer containing `world_y`, if any.
    pub fn layer_at(&self, world_y: i32) -> Option<&Layer> {
        self.position_of(world_y).map(|i| &self.layers[i])
    }

    /// Shape of the layer at `world_y`; `None` in gaps and outside every layer.
    pub fn zone_at(&self, world_y: i32) -> Option<LayerZone> {
        let layer = self.layer_at(world_y)?;
        if !layer.hollow {
            return Some(LayerZone::Solid);
        }
        let y = i64::from(world_y);
        let zone = if y < i64::from(layer.y_min) + layer.floor_thickness {
            LayerZone::Floor
        } else if y >= i64::from(layer.y_max) - layer.ceiling_thickness {
            LayerZone::Ceiling
        } else {
            LayerZone::Interior
        };
        Some(zone)
    }

    /// Biome at a world Y and chunk column. Total: misses yield the fallback.
    pub fn resolve(&self, world_y: i32, chunk_x: i32, chunk_z: i32) -> BiomeId {
        let Some(position) = self.position_of(world_y) else {
            trace!(world_y, "No layer at this height; using fallback");
            return self.fallback;
        };
        let layer = &self.layers[position];

        if let Some((cave_biome, threshold)) = layer.cave {
            let p = [
                f64::from(chunk_x) * 16.0 + 8.0,
                f64::from(world_y),
                f64::from(chunk_z) * 16.0 + 8.0,
            ];
            if fbm_3d(&self.cave_noise, p, CAVE_FREQUENCY, CAVE_OCTAVES) < threshold {
                return cave_biome;
            }
        }

        match &layer.choice {
            LayerChoice::Single(id) => *id,
            LayerChoice::List { entries, total } => {
                let patch_x = chunk_x.div_euclid(layer.patch_size);
                let patch_z = chunk_z.div_euclid(layer.patch_size);
                let hash = seed::derive_seed(
                    self.world_seed,
                    salt::LAYER_LIST ^ position as u64,
                    patch_x,
                    patch_z,
                );
                let mut roll = hash % total;
                for (id, weight) in entries {
                    let weight = u64::from(*weight);
                    if roll < weight {
                        return *id;
                    }
                    roll -= weight;
                }
                self.fallback
            }
        }
    }

    fn position_of(&self, world_y: i32) -> Option<usize> {
        let after = self.layers.partition_point(|layer| layer.y_min <= world_y);
        let candidate = after.checked_sub(1)?;
        let layer = &self.layers[candidate];
        (world_y < layer.y_max).then_some(candidate)
    }
}

fn resolve_layer(
    spec: &LayerSpec,
    index: &BiomeMetadataIndex,
    fallback: BiomeId,
    warnings: &mut Vec<ConfigWarning>,
) -> Layer {
    let referenced_by = format!("layer `{}`", spec.name);
    let mut lookup = |raw: &str| match index.lookup_str(raw) {
        Some(record) => Some(record.id),
        None => {
            warnings.push(ConfigWarning::UnknownBiome {
                key: raw.to_string(),
                referenced_by: referenced_by.clone(),
            });
            None
        }
    };

    let choice = match &spec.biomes {
        LayerBiomes::Single(raw) => LayerChoice::Single(lookup(raw).unwrap_or(fallback)),
        LayerBiomes::List(list) => {
            let entries: Vec<(BiomeId, u32)> = list
                .iter()
                .filter_map(|entry| lookup(&entry.biome).map(|id| (id, entry.weight.max(1))))
                .collect();
            let total: u64 = entries.iter().map(|(_, w)| u64::from(*w)).sum();
            if total == 0 {
                LayerChoice::Single(fallback)
            } else {
                LayerChoice::List { entries, total }
            }
        }
    };

    let cave = match (&spec.cave_biome, spec.cave_percent) {
        (Some(raw), percent) if percent > 0 => {
            lookup(raw).map(|id| (id, f64::from(percent.min(100)) / 50.0 - 1.0))
        }
        _ => None,
    };

    Layer {
        name: spec.name.clone(),
        y_min: spec.y_min,
        y_max: spec.y_max,
        choice,
        cave,
        patch_size: spec.patch_size_chunks.clamp(1, i32::MAX as u32) as i32,
        hollow: spec.is_hollow(),
        floor_thickness: i64::from(spec.floor_thickness),
        ceiling_thickness: i64::from(spec.ceiling_thickness),
    }
}
