//! Biome sources and the per-world generation context.
//!
//! Each dimension picks one [`BiomeSource`] variant when its context is built.
//! [`GenerationContext`] owns everything a query needs (the shared index, the
//! dimension's pool and source) and exposes the total `biome_at` entry point.
//! It is immutable after construction and can be shared across worker threads
//! behind an `Arc`.

use std::fmt;
use std::sync::Arc;

use strata_config::{BiomeMode, ClimateGridSettings, DimensionConfig};
use tracing::{info, trace, warn};

use crate::biome::{BiomeId, BiomeMetadataIndex};
use crate::blob::{BlobPartitioner, ChunkPos};
use crate::climate::{ClimateField, ClimatePoint};
use crate::error::{ConfigWarning, ContextError};
use crate::layer::LayerPartitioner;
use crate::pool::CandidatePool;
use crate::region::{self, RegionEntry};
use crate::selector::ClimateSelector;

/// Host-supplied region distributor, called with block coordinates.
pub type RegionDistributor = Arc<dyn Fn(i32, i32, i32) -> Option<BiomeId> + Send + Sync>;

/// Region mode: placement is delegated to the host's distributor.
#[derive(Clone)]
pub struct RegionSource {
    entries: Vec<RegionEntry>,
    distributor: Option<RegionDistributor>,
    fallback: BiomeId,
}

impl RegionSource {
    /// A region source without a distributor; every query yields `fallback`
    /// until one is attached.
    pub fn new(entries: Vec<RegionEntry>, fallback: BiomeId) -> Self {
        Self {
            entries,
            distributor: None,
            fallback,
        }
    }

    /// Attach the host distributor.
    pub fn with_distributor(mut self, distributor: RegionDistributor) -> Self {
        self.distributor = Some(distributor);
        self
    }

    /// Entries handed to the distributor at registration.
    pub fn entries(&self) -> &[RegionEntry] {
        &self.entries
    }

    /// Returns `true` once a distributor is attached.
    pub fn has_distributor(&self) -> bool {
        self.distributor.is_some()
    }

    fn biome_at(&self, x: i32, y: i32, z: i32) -> BiomeId {
        match &self.distributor {
            Some(distribute) => distribute(x, y, z).unwrap_or_else(|| {
                trace!(x, y, z, "Distributor returned nothing; using fallback");
                self.fallback
            }),
            None => self.fallback,
        }
    }
}

impl fmt::Debug for RegionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionSource")
            .field("entries", &self.entries.len())
            .field("distributor", &self.distributor.is_some())
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Climate-grid mode: blob snap, climate field, selector.
pub struct ClimateGridSource {
    blobs: BlobPartitioner,
    field: ClimateField,
    selector: ClimateSelector,
}

impl ClimateGridSource {
    /// Build the blob partitioner, climate field and selector for one world.
    pub fn new(world_seed: u64, settings: &ClimateGridSettings, fallback: BiomeId) -> Self {
        Self {
            blobs: BlobPartitioner::new(
                world_seed,
                settings.min_biome_size_chunks,
                settings.blob_irregularity,
            ),
            field: ClimateField::new(world_seed, settings),
            selector: ClimateSelector::new(world_seed, settings.climate_tolerance, fallback),
        }
    }

    /// Blob representative of a chunk.
    pub fn snap(&self, chunk_x: i32, chunk_z: i32) -> ChunkPos {
        self.blobs.snap_to_blob(chunk_x, chunk_z)
    }

    /// Climate shared by the whole blob containing the chunk.
    pub fn climate_at(&self, chunk_x: i32, chunk_z: i32) -> ClimatePoint {
        let rep = self.snap(chunk_x, chunk_z);
        self.field.climate_at(rep.x, rep.z)
    }

    /// Biome of a chunk column.
    pub fn biome_at_chunk(
        &self,
        chunk_x: i32,
        chunk_z: i32,
        pool: &CandidatePool,
        index: &BiomeMetadataIndex,
    ) -> BiomeId {
        let rep = self.snap(chunk_x, chunk_z);
        let climate = self.field.climate_at(rep.x, rep.z);
        self.selector.select(climate, rep.x, rep.z, pool, index)
    }
}

/// How a dimension places biomes, fixed when its context is built.
pub enum BiomeSource {
    /// Delegated to the host distributor.
    Region(RegionSource),
    /// Climate field plus organic blobs. Boxed: the noise tables are large.
    ClimateGrid(Box<ClimateGridSource>),
    /// Vertical bands.
    Layered(LayerPartitioner),
}

impl BiomeSource {
    /// Mode name for logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            BiomeSource::Region(_) => "region",
            BiomeSource::ClimateGrid(_) => "climate_grid",
            BiomeSource::Layered(_) => "layered",
        }
    }
}

/// Everything needed to answer biome queries for one dimension of one world.
pub struct GenerationContext {
    dimension: String,
    world_seed: u64,
    index: Arc<BiomeMetadataIndex>,
    pool: CandidatePool,
    source: BiomeSource,
    fallback: BiomeId,
}

impl GenerationContext {
    /// Validate `config` and build the dimension's pool and source.
    ///
    /// Non-fatal problems come back as warnings. Errors mean the dimension must
    /// not be registered.
    pub fn from_config(
        config: &DimensionConfig,
        index: Arc<BiomeMetadataIndex>,
        world_seed: u64,
    ) -> Result<(Self, Vec<ConfigWarning>), ContextError> {
        config.validate()?;
        if !index.is_built() {
            return Err(ContextError::IndexNotBuilt);
        }

        let mut warnings = Vec::new();
        let fallback = match index.lookup_str(&config.fallback_biome) {
            Some(record) => record.id,
            None => {
                let first = index.iter().next().ok_or_else(|| ContextError::NoFallbackBiome {
                    dimension: config.id.clone(),
                })?;
                let warning = ConfigWarning::UnknownBiome {
                    key: config.fallback_biome.clone(),
                    referenced_by: "fallback_biome".to_string(),
                };
                warn!(dimension = %config.id, substitute = %first.key, "{warning}");
                warnings.push(warning);
                first.id
            }
        };

        // Layered dimensions take their biomes from the layers; pool rules
        // only apply to the other modes.
        let (pool, source) = match &config.mode {
            BiomeMode::Layered(settings) => {
                let (layers, layer_warnings) =
                    LayerPartitioner::build(world_seed, settings, &index, fallback);
                warnings.extend(layer_warnings);
                let ids = layers.layers().iter().flat_map(|layer| layer.biomes());
                let pool = CandidatePool::from_ids(&config.id, ids);
                (pool, BiomeSource::Layered(layers))
            }
            BiomeMode::Region(settings) => {
                let pool = rule_pool(config, &index, &mut warnings);
                let entries = region::export(&pool, &index, settings.weight);
                (pool, BiomeSource::Region(RegionSource::new(entries, fallback)))
            }
            BiomeMode::ClimateGrid(settings) => {
                let pool = rule_pool(config, &index, &mut warnings);
                let grid = ClimateGridSource::new(world_seed, settings, fallback);
                (pool, BiomeSource::ClimateGrid(Box::new(grid)))
            }
        };

        info!(
            dimension = %config.id,
            mode = source.kind(),
            pool = pool.len(),
            warnings = warnings.len(),
            "Generation context ready"
        );

        let context = Self {
            dimension: config.id.clone(),
            world_seed,
            index,
            pool,
            source,
            fallback,
        };
        Ok((context, warnings))
    }

    /// Attach the host's region distributor. Returns `false` for other modes.
    pub fn attach_distributor(&mut self, distributor: RegionDistributor) -> bool {
        match &mut self.source {
            BiomeSource::Region(region) => {
                region.distributor = Some(distributor);
                true
            }
            _ => false,
        }
    }

    /// Biome at a block position. Total and deterministic.
    pub fn biome_at(&self, world_x: i32, world_y: i32, world_z: i32) -> BiomeId {
        let chunk = ChunkPos::from_block(world_x, world_z);
        match &self.source {
            BiomeSource::Region(region) => region.biome_at(world_x, world_y, world_z),
            BiomeSource::ClimateGrid(grid) => {
                grid.biome_at_chunk(chunk.x, chunk.z, &self.pool, &self.index)
            }
            BiomeSource::Layered(layers) => layers.resolve(world_y, chunk.x, chunk.z),
        }
    }

    /// Biome at a quart position (4×4×4 block cell).
    pub fn biome_at_quart(&self, quart_x: i32, quart_y: i32, quart_z: i32) -> BiomeId {
        self.biome_at(quart_x << 2, quart_y << 2, quart_z << 2)
    }

    /// Dimension id.
    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    /// World seed the context was built with.
    pub fn world_seed(&self) -> u64 {
        self.world_seed
    }

    /// Shared metadata index.
    pub fn index(&self) -> &BiomeMetadataIndex {
        &self.index
    }

    /// The dimension's candidate pool.
    pub fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    /// Placement source for the dimension's mode.
    pub fn source(&self) -> &BiomeSource {
        &self.source
    }

    /// Resolved fallback biome.
    pub fn fallback(&self) -> BiomeId {
        self.fallback
    }
}

fn rule_pool(
    config: &DimensionConfig,
    index: &BiomeMetadataIndex,
    warnings: &mut Vec<ConfigWarning>,
) -> CandidatePool {
    let build = CandidatePool::build(&config.id, &config.biomes, index);
    warnings.extend(build.warnings);
    build.pool
}

static_assertions::assert_impl_all!(GenerationContext: Send, Sync);
