//! Dimension descriptors: which biomes a dimension may use and how they are placed.
//!
//! One descriptor per `<name>.ron` file. Descriptors are validated before a
//! dimension is registered for generation; a descriptor that fails validation
//! is reported and skipped, never fatal to the host.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Complete description of one custom dimension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DimensionConfig {
    /// Namespaced dimension id (e.g. `"strata:frostlands"`).
    pub id: String,
    /// Name shown to players.
    pub display_name: String,
    /// Free-form description for operators.
    pub description: String,
    /// Biome used whenever placement cannot resolve anything better.
    pub fallback_biome: String,
    /// Candidate pool rules.
    pub biomes: PoolRules,
    /// Placement strategy.
    pub mode: BiomeMode,
}

/// Inclusion and exclusion rules for a dimension's candidate pool.
///
/// Rules are applied in field order; `exclude` always wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PoolRules {
    /// Include every biome from the base content namespace.
    pub include_base: bool,
    /// Source patterns, e.g. `"terralith:*"` (prefix) or `"terralith"` (exact).
    pub include_sources: Vec<String>,
    /// Individual biome ids to include.
    pub include: Vec<String>,
    /// Individual biome ids to remove after all inclusions.
    pub exclude: Vec<String>,
    /// Relative weight per biome id. Unlisted biomes weigh 1.
    pub weights: BTreeMap<String, u32>,
}

/// Biome placement strategy for a dimension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum BiomeMode {
    /// Hand the pool to an external weighted-region distributor.
    Region(RegionSettings),
    /// Horizontal climate grid with organic blobs.
    ClimateGrid(ClimateGridSettings),
    /// Vertically stratified layers.
    Layered(LayeredSettings),
}

/// Settings passed through to the external region distributor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegionSettings {
    /// Competition weight of this dimension's region.
    pub weight: u32,
}

/// Geographic pattern the climate field follows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ClimatePattern {
    /// Linear gradients along two orthogonal axes, reversing at the boundary.
    #[default]
    Gradient,
    /// Temperature falls off with distance from the origin.
    Radial,
}

/// Horizontal world axis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Axis {
    /// East-west.
    #[default]
    X,
    /// North-south.
    Z,
}

impl Axis {
    /// The orthogonal horizontal axis.
    pub fn orthogonal(self) -> Self {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }
}

/// Parameters of the climate grid placement mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClimateGridSettings {
    /// Distance in chunks from the origin to the point where a climate
    /// gradient peaks and reverses.
    pub boundary_chunks: u32,
    /// Side length of a biome blob cell, in chunks.
    pub min_biome_size_chunks: u32,
    /// 0 = rectangular blobs, 1 = maximally irregular outlines.
    pub blob_irregularity: f64,
    /// Weight of the coherent noise added on top of the gradient.
    pub blob_coherence: f64,
    /// Maximum climate distance for a biome to match.
    pub climate_tolerance: f64,
    /// Geographic pattern of the base signal.
    pub pattern: ClimatePattern,
    /// Axis along which temperature varies; moisture uses the other one.
    pub temperature_axis: Axis,
    /// Flip the temperature gradient (hot where it would be cold).
    pub invert_temperature: bool,
    /// Flip the moisture gradient.
    pub invert_moisture: bool,
}

/// Parameters of the layered placement mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayeredSettings {
    /// Layers ordered bottom to top.
    pub layers: Vec<LayerSpec>,
    /// Permit vertical gaps between layers. Gaps resolve to the fallback biome.
    pub allow_gaps: bool,
}

/// One vertical band of a layered dimension, covering `[y_min, y_max)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayerSpec {
    /// Operator-facing label.
    pub name: String,
    /// Lowest block Y (inclusive).
    pub y_min: i32,
    /// Highest block Y (exclusive).
    pub y_max: i32,
    /// Percentage of the band filled with terrain; 0 makes a hollow cavern.
    pub fill_percent: u8,
    /// Biome selection for the band.
    pub biomes: LayerBiomes,
    /// Biome used inside cave sub-regions.
    pub cave_biome: Option<String>,
    /// Approximate share of the band carved into cave sub-regions.
    pub cave_percent: u8,
    /// Solid ceiling thickness of a hollow layer, in blocks.
    pub ceiling_thickness: u32,
    /// Solid floor thickness of a hollow layer, in blocks.
    pub floor_thickness: u32,
    /// Side of the square chunk patch that shares one list-mode pick.
    pub patch_size_chunks: u32,
}

/// Biome selection within a layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LayerBiomes {
    /// Exactly one biome.
    Single(String),
    /// A weighted list indexed by position.
    List(Vec<WeightedBiome>),
}

/// A biome id with a relative weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightedBiome {
    /// Biome id.
    pub biome: String,
    /// Relative weight; must be positive.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

// --- Default implementations ---

impl Default for DimensionConfig {
    fn default() -> Self {
        Self {
            id: "strata:custom".to_string(),
            display_name: "Custom Dimension".to_string(),
            description: String::new(),
            fallback_biome: "minecraft:plains".to_string(),
            biomes: PoolRules::default(),
            mode: BiomeMode::default(),
        }
    }
}

impl Default for PoolRules {
    fn default() -> Self {
        Self {
            include_base: true,
            include_sources: Vec::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            weights: BTreeMap::new(),
        }
    }
}

impl Default for BiomeMode {
    fn default() -> Self {
        BiomeMode::ClimateGrid(ClimateGridSettings::default())
    }
}

impl Default for RegionSettings {
    fn default() -> Self {
        Self { weight: 10 }
    }
}

impl Default for ClimateGridSettings {
    fn default() -> Self {
        Self {
            boundary_chunks: 1024,
            min_biome_size_chunks: 8,
            blob_irregularity: 0.6,
            blob_coherence: 0.3,
            climate_tolerance: 0.25,
            pattern: ClimatePattern::Gradient,
            temperature_axis: Axis::X,
            invert_temperature: false,
            invert_moisture: false,
        }
    }
}

impl Default for LayerSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            y_min: 0,
            y_max: 64,
            fill_percent: 100,
            biomes: LayerBiomes::Single("minecraft:plains".to_string()),
            cave_biome: None,
            cave_percent: 0,
            ceiling_thickness: 0,
            floor_thickness: 0,
            patch_size_chunks: 4,
        }
    }
}

impl LayerSpec {
    /// Band height in blocks. Zero or negative for malformed bands.
    pub fn height(&self) -> i64 {
        i64::from(self.y_max) - i64::from(self.y_min)
    }

    /// Returns `true` if `y` lies within `[y_min, y_max)`.
    pub fn contains(&self, y: i32) -> bool {
        y >= self.y_min && y < self.y_max
    }

    /// Hollow layers are carved into a single cavern.
    pub fn is_hollow(&self) -> bool {
        self.fill_percent == 0
    }
}

// --- Validation ---

impl DimensionConfig {
    /// Check every structural constraint. Returns the first problem found.
    ///
    /// Unknown biome ids are *not* checked here; they depend on the runtime
    /// biome universe and are reported as warnings when the pool is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dim = self.id.as_str();
        if self.id.trim().is_empty() {
            return Err(ConfigError::invalid(dim, "id must not be empty"));
        }
        if self.fallback_biome.trim().is_empty() {
            return Err(ConfigError::invalid(dim, "fallback_biome must not be empty"));
        }
        if let Some((biome, _)) = self.biomes.weights.iter().find(|(_, w)| **w == 0) {
            return Err(ConfigError::invalid(
                dim,
                format!("weight of `{biome}` must be positive"),
            ));
        }

        match &self.mode {
            BiomeMode::Region(region) => {
                if region.weight == 0 {
                    return Err(ConfigError::invalid(dim, "region weight must be positive"));
                }
                Ok(())
            }
            BiomeMode::ClimateGrid(grid) => grid.validate(dim),
            BiomeMode::Layered(layered) => layered.validate(dim),
        }
    }

    /// Load a descriptor from a RON file. Does not validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }

    /// Write the descriptor as pretty RON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::WriteError)?;
        }
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;
        std::fs::write(path, serialized).map_err(ConfigError::WriteError)
    }
}

impl ClimateGridSettings {
    fn validate(&self, dim: &str) -> Result<(), ConfigError> {
        if self.boundary_chunks == 0 {
            return Err(ConfigError::invalid(dim, "boundary_chunks must be > 0"));
        }
        if self.min_biome_size_chunks == 0 {
            return Err(ConfigError::invalid(dim, "min_biome_size_chunks must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.blob_irregularity) {
            return Err(ConfigError::invalid(
                dim,
                format!("blob_irregularity {} outside [0, 1]", self.blob_irregularity),
            ));
        }
        if !(0.0..=1.0).contains(&self.blob_coherence) {
            return Err(ConfigError::invalid(
                dim,
                format!("blob_coherence {} outside [0, 1]", self.blob_coherence),
            ));
        }
        if !self.climate_tolerance.is_finite() || self.climate_tolerance <= 0.0 {
            return Err(ConfigError::invalid(
                dim,
                format!("climate_tolerance {} must be > 0", self.climate_tolerance),
            ));
        }
        Ok(())
    }
}

impl LayeredSettings {
    fn validate(&self, dim: &str) -> Result<(), ConfigError> {
        if self.layers.is_empty() {
            return Err(ConfigError::invalid(dim, "layered mode needs at least one layer"));
        }

        for (i, layer) in self.layers.iter().enumerate() {
            let label = layer_label(i, layer);
            if layer.height() <= 0 {
                return Err(ConfigError::invalid(
                    dim,
                    format!("{label}: y_min {} must be below y_max {}", layer.y_min, layer.y_max),
                ));
            }
            if layer.fill_percent > 100 || layer.cave_percent > 100 {
                return Err(ConfigError::invalid(
                    dim,
                    format!("{label}: percentages must be within 0..=100"),
                ));
            }
            if layer.cave_percent > 0 && layer.cave_biome.is_none() {
                return Err(ConfigError::invalid(
                    dim,
                    format!("{label}: cave_percent set without a cave_biome"),
                ));
            }
            if layer.patch_size_chunks == 0 {
                return Err(ConfigError::invalid(
                    dim,
                    format!("{label}: patch_size_chunks must be > 0"),
                ));
            }
            match &layer.biomes {
                LayerBiomes::Single(biome) if biome.trim().is_empty() => {
                    return Err(ConfigError::invalid(dim, format!("{label}: empty biome id")));
                }
                LayerBiomes::List(list) => {
                    if layer.is_hollow() {
                        return Err(ConfigError::invalid(
                            dim,
                            format!("{label}: hollow layers require a single biome"),
                        ));
                    }
                    if list.is_empty() {
                        return Err(ConfigError::invalid(dim, format!("{label}: empty biome list")));
                    }
                    if list.iter().any(|entry| entry.weight == 0) {
                        return Err(ConfigError::invalid(
                            dim,
                            format!("{label}: list weights must be positive"),
                        ));
                    }
                }
                LayerBiomes::Single(_) => {}
            }
            if layer.is_hollow() {
                let shell = i64::from(layer.ceiling_thickness) + i64::from(layer.floor_thickness);
                if shell >= layer.height() {
                    return Err(ConfigError::invalid(
                        dim,
                        format!(
                            "{label}: ceiling + floor thickness ({shell}) must be less than layer height ({})",
                            layer.height()
                        ),
                    ));
                }
            }
        }

        for (i, pair) in self.layers.windows(2).enumerate() {
            let (lower, upper) = (&pair[0], &pair[1]);
            if upper.y_min < lower.y_max {
                return Err(ConfigError::invalid(
                    dim,
                    format!(
                        "{} overlaps or is out of order with {}",
                        layer_label(i + 1, upper),
                        layer_label(i, lower)
                    ),
                ));
            }
            if upper.y_min > lower.y_max && !self.allow_gaps {
                return Err(ConfigError::invalid(
                    dim,
                    format!(
                        "gap between y={} and y={} (set allow_gaps to permit)",
                        lower.y_max, upper.y_min
                    ),
                ));
            }
        }
        Ok(())
    }
}

fn layer_label(index: usize, layer: &LayerSpec) -> String {
    if layer.name.is_empty() {
        format!("layer #{index}")
    } else {
        format!("layer `{}`", layer.name)
    }
}

/// Load every `*.ron` descriptor in `dir`, sorted by file name.
///
/// Each file gets its own result so one broken descriptor never prevents the
/// others from loading. Loaded descriptors are validated as well.
pub fn load_dimensions(dir: &Path) -> Result<Vec<(PathBuf, Result<DimensionConfig, ConfigError>)>, ConfigError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(ConfigError::ReadError)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    paths.sort();

    let results = paths
        .into_iter()
        .map(|path| {
            let result = DimensionConfig::load(&path)
                .and_then(|config| config.validate().map(|()| config))
                .map_err(|source| ConfigError::InFile {
                    path: path.clone(),
                    source: Box::new(source),
                });
            if let Err(err) = &result {
                log::warn!("Skipping dimension: {err}");
            }
            (path, result)
        })
        .collect();
    Ok(results)
}
